// ==========================================
// 车间工单排产系统 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod db_utils;
pub mod dependency_repo;
pub mod error;
pub mod job_repo;
pub mod method_repo;
pub mod operation_repo;
pub mod resource_repo;
pub mod schedule_log_repo;

// 重导出核心仓储
pub use dependency_repo::{DependencyEdge, DependencyRepository};
pub use error::{RepositoryError, RepositoryResult};
pub use job_repo::JobRepository;
pub use method_repo::MakeMethodRepository;
pub use operation_repo::OperationRepository;
pub use resource_repo::ResourceRepository;
pub use schedule_log_repo::{ScheduleLogEntry, ScheduleLogRepository};
