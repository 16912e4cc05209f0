// ==========================================
// 车间工单排产系统 - 工单头领域模型
// ==========================================

use crate::domain::types::DeadlineType;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Job - 工单头
// ==========================================
// 锚点日期来源: 倒排取 due_date, 顺排取 start_date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,                // 工单ID
    pub company_id: String,            // 公司范围
    pub location_id: Option<String>,   // 生产地点 (机台过滤口径)
    pub job_priority: Option<i64>,     // 工单优先级 (小者优先)
    pub deadline_type: DeadlineType,   // 交期类型
    pub start_date: Option<NaiveDate>, // 计划开工日期 (顺排锚点)
    pub due_date: Option<NaiveDate>,   // 交期 (倒排锚点)
}
