// ==========================================
// 车间工单排产系统 - API 层
// ==========================================
// 职责: 对外业务接口 (载荷校验 + 引擎调用)
// ==========================================

pub mod error;
pub mod schedule_api;

// 重导出核心接口
pub use error::{ApiError, ApiResult};
pub use schedule_api::{ScheduleApi, ScheduleRequestDto, ScheduleResponse};
