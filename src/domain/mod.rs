// ==========================================
// 车间工单排产系统 - 领域层
// ==========================================
// 职责: 实体与类型定义,不含业务规则与数据访问
// ==========================================

pub mod job;
pub mod method;
pub mod operation;
pub mod resource;
pub mod types;

// 重导出核心实体
pub use job::Job;
pub use method::{AssemblyNode, JobMaterial, MakeMethod};
pub use operation::{JobOperation, ScheduledOperation};
pub use resource::{Process, WorkCenter};
pub use types::{
    DeadlineType, OperationOrderKind, OperationStatus, OperationType, RateUnit,
};
