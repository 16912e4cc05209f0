// ==========================================
// 车间工单排产系统 - 工序领域模型
// ==========================================
// JobOperation: 来自数据库的工序行 (排产输入)
// ScheduledOperation: 引擎产出的已排工序 (排产输出快照)
// ==========================================

use crate::domain::types::{
    DeadlineType, OperationOrderKind, OperationStatus, OperationType, RateUnit,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// JobOperation - 工单工序
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOperation {
    pub operation_id: String,                 // 工序ID
    pub job_id: String,                       // 所属工单
    pub method_id: String,                    // 所属制造方法 (装配树节点)
    pub company_id: String,                   // 公司范围
    pub op_order: f64,                        // 方法内序号
    pub operation_order: OperationOrderKind,  // 衔接方式
    pub operation_type: OperationType,        // 厂内/委外
    pub status: OperationStatus,              // 工序状态
    pub process_id: String,                   // 工艺能力 (决定可用机台)
    pub work_center_id: Option<String>,       // 已指派机台 (可空)

    // ===== 工时三元组 (时间值 + 量纲) =====
    pub setup_time: Option<f64>,              // 准备时间
    pub setup_unit: Option<RateUnit>,         // 准备时间量纲
    pub labor_time: Option<f64>,              // 人工时间
    pub labor_unit: Option<RateUnit>,         // 人工时间量纲
    pub machine_time: Option<f64>,            // 机时
    pub machine_unit: Option<RateUnit>,       // 机时量纲
    pub operation_quantity: Option<f64>,      // 工序数量 (缺省按 1)

    // ===== 排程字段 =====
    pub lead_time_days: i64,                  // 前置期 (工作日)
    pub start_date: Option<NaiveDate>,        // 已有开工日期
    pub due_date: Option<NaiveDate>,          // 已有完工日期
    pub priority: Option<i64>,                // 已有优先级
}

impl JobOperation {
    /// 工序数量,缺省按 1
    pub fn quantity(&self) -> f64 {
        self.operation_quantity.unwrap_or(1.0)
    }
}

// ==========================================
// ScheduledOperation - 已排工序
// ==========================================
// 生命周期: Strategy 创建 → Selector 补机台 → PriorityAssigner 补优先级 → 落库后销毁
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledOperation {
    pub operation_id: String,
    pub job_id: String,
    pub method_id: String,
    pub process_id: String,
    pub operation_order: OperationOrderKind,
    pub operation_type: OperationType,
    pub status: OperationStatus,

    // ===== 排程结果 =====
    pub start_date: Option<NaiveDate>,        // 开工日期 (ISO, 闭区间)
    pub due_date: Option<NaiveDate>,          // 完工日期 (ISO, 闭区间)
    pub work_center_id: Option<String>,       // 指派机台
    pub priority: i64,                        // 机台内优先级 (正整数)
    pub duration_hours: f64,                  // 总工时
    pub duration_days: i64,                   // 总工作日
    pub lead_time_days: i64,                  // 前置期 (工作日)

    // ===== 冲突标记 (冲突是数据,不是错误) =====
    pub has_conflict: bool,
    pub conflict_reason: Option<String>,

    // ===== 工单头快照 (供机台内排序使用) =====
    pub job_priority: Option<i64>,            // 工单优先级 (小者优先, 空按 0)
    pub deadline_type: DeadlineType,          // 交期类型
}

impl ScheduledOperation {
    /// 记录一条冲突;已有冲突时保留最先的原因
    pub fn mark_conflict(&mut self, reason: String) {
        if !self.has_conflict {
            self.has_conflict = true;
            self.conflict_reason = Some(reason);
        }
    }
}
