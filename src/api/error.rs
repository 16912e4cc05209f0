// ==========================================
// 车间工单排产系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,把引擎/仓储错误转换为对外友好的消息
// 口径: InvalidInput 对应 400 类失败;其余为 500 类失败
// ==========================================

use crate::engine::error::ScheduleError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 业务规则错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("依赖环路: {0}")]
    CycleDetected(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ===== 数据访问错误 =====
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 是否属于 400 类 (调用方错误)
    pub fn is_client_error(&self) -> bool {
        matches!(self, ApiError::InvalidInput(_) | ApiError::NotFound(_))
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseTransactionError(msg)
            | RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ScheduleError 转换
// ==========================================
impl From<ScheduleError> for ApiError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            ScheduleError::CycleDetected { .. } => ApiError::CycleDetected(err.to_string()),
            ScheduleError::AssemblyError(msg) => ApiError::BusinessRuleViolation(msg),
            ScheduleError::UnknownProcess { .. } | ScheduleError::NoEligibleWorkCenter { .. } => {
                ApiError::BusinessRuleViolation(err.to_string())
            }
            ScheduleError::ConfigError(msg) => ApiError::InternalError(msg),
            ScheduleError::Storage(repo_err) => repo_err.into(),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
