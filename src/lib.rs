// ==========================================
// 车间工单排产系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 单工单排产引擎 (装配树/依赖图/双向关键路径)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施 (连接初始化/PRAGMA 统一)
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    DeadlineType, OperationOrderKind, OperationStatus, OperationType, RateUnit,
};

// 领域实体
pub use domain::{AssemblyNode, Job, JobMaterial, JobOperation, MakeMethod, ScheduledOperation};

// 引擎
pub use engine::{
    AssemblyHandler, DependencyBuilder, DependencyGraph, DurationCalculator, PriorityAssigner,
    ScheduleDirection, ScheduleMode, ScheduleOrchestrator, ScheduleRepositories, ScheduleRequest,
    ScheduleSummary, SchedulingStrategy, WorkCenterSelector,
};

// API
pub use api::{ScheduleApi, ScheduleRequestDto, ScheduleResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "车间工单排产系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
