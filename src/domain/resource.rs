// ==========================================
// 车间工单排产系统 - 工艺与机台领域模型
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// Process - 工艺能力
// ==========================================
// work_center_ids 为声明顺序的候选机台列表;
// 该顺序即负荷均衡同分时的决胜顺序
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    pub process_id: String,           // 工艺ID
    pub company_id: String,           // 公司范围
    pub process_name: String,         // 工艺名称
    pub work_center_ids: Vec<String>, // 候选机台 (声明顺序)
}

// ==========================================
// WorkCenter - 机台
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkCenter {
    pub work_center_id: String,   // 机台ID
    pub company_id: String,       // 公司范围
    pub location_id: String,      // 所在地点
    pub work_center_name: String, // 机台名称
    pub active: bool,             // 是否启用
}
