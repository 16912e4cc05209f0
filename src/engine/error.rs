// ==========================================
// 车间工单排产系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 冲突是数据不是错误;这里只收敛会中止本次调用的类别
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("依赖图存在环路,未能排序的工序: [{}]", .remaining.join(", "))]
    CycleDetected { remaining: Vec<String> },

    #[error("装配树错误: {0}")]
    AssemblyError(String),

    #[error("未知工艺: process_id={process_id}")]
    UnknownProcess { process_id: String },

    #[error("工艺 {process_id} 在目标地点无可用机台")]
    NoEligibleWorkCenter { process_id: String },

    #[error("配置读取失败: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, ScheduleError>;
