// ==========================================
// 车间工单排产系统 - 排程配置读取接口
// ==========================================
// 用途: 引擎通过该接口读取配置,测试可注入 Mock
// ==========================================

use async_trait::async_trait;
use std::error::Error;

/// 排程配置读取接口
#[async_trait]
pub trait ScheduleConfigReader: Send + Sync {
    /// 单个工作日折算的工时数 (默认 8)
    async fn get_hours_per_day(&self) -> Result<f64, Box<dyn Error>>;
}
