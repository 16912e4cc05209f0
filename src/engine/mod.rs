// ==========================================
// 车间工单排产系统 - 引擎层
// ==========================================
// 职责: 实现排产业务规则,不拼 SQL
// 红线: Engine 不拼 SQL;冲突是数据不是错误,必须输出 reason
// ==========================================

pub mod assembly;
pub mod calendar;
pub mod dependency_builder;
pub mod dependency_graph;
pub mod duration;
pub mod error;
pub mod orchestrator;
pub mod priority;
pub mod repositories;
pub mod strategy;
pub mod work_center;

// 重导出核心引擎
pub use assembly::AssemblyHandler;
pub use calendar::{
    add_business_days, format_iso, subtract_business_days, CalendarProvider, WeekdayCalendar,
};
pub use dependency_builder::DependencyBuilder;
pub use dependency_graph::{DependencyGraph, DependencyNode, SortDirection};
pub use duration::DurationCalculator;
pub use error::{EngineResult, ScheduleError};
pub use orchestrator::{ScheduleOrchestrator, ScheduleRequest, ScheduleSummary};
pub use priority::PriorityAssigner;
pub use repositories::ScheduleRepositories;
pub use strategy::{ScheduleDirection, ScheduleMode, SchedulingStrategy};
pub use work_center::{WorkCenterLoadTally, WorkCenterSelector};
