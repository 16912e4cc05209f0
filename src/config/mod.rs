// ==========================================
// 车间工单排产系统 - 配置层
// ==========================================
// 职责: 系统配置管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod schedule_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, DEFAULT_HOURS_PER_DAY};
pub use schedule_config_trait::ScheduleConfigReader;
