// ==========================================
// 车间工单排产系统 - 数据库工具模块
// ==========================================
// 职责: 仓储层共用的字段转换函数
// 约定: 日期以 ISO TEXT (YYYY-MM-DD) 存储
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;

/// 日期转数据库字符串
pub fn date_to_db(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 可空日期转数据库字符串
pub fn opt_date_to_db(date: Option<NaiveDate>) -> Option<String> {
    date.map(date_to_db)
}

/// 解析可空日期字段
///
/// # 参数
/// - `value`: 数据库原始值
/// - `field`: 字段名 (用于错误信息)
pub fn parse_opt_date(value: Option<String>, field: &str) -> RepositoryResult<Option<NaiveDate>> {
    match value {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|e| RepositoryError::FieldValueError {
                field: field.to_string(),
                message: format!("无法解析日期 '{}': {}", s, e),
            }),
    }
}

/// 解析必填枚举字段;解析函数返回 None 即报字段值错误
pub fn parse_enum_field<T>(
    value: &str,
    field: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> RepositoryResult<T> {
    parse(value).ok_or_else(|| RepositoryError::FieldValueError {
        field: field.to_string(),
        message: format!("未知取值 '{}'", value),
    })
}

/// 解析可空枚举字段;空值/空串返回 None,未知取值报错
pub fn parse_opt_enum_field<T>(
    value: Option<String>,
    field: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> RepositoryResult<Option<T>> {
    match value {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_enum_field(&s, field, parse).map(Some),
    }
}
