// ==========================================
// 车间工单排产系统 - 优先级指派引擎
// ==========================================
// 职责: 按机台分桶,桶内三键排序后指派 1..n 整数优先级
// 排序键: 开工日期升序 (空值最后) → 工单优先级升序 (空按 0)
//         → 交期类型秩 (ASAP < 硬交期 < 软交期 < 无交期)
// ==========================================

use crate::domain::operation::ScheduledOperation;
use std::cmp::Ordering;
use std::collections::BTreeMap;

// ==========================================
// PriorityAssigner - 优先级指派引擎
// ==========================================
// 无状态引擎,不需要注入依赖
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityAssigner;

impl PriorityAssigner {
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 分桶指派优先级 (未指派机台的工序归入独立空桶)
    pub fn assign(&self, operations: &mut [ScheduledOperation]) {
        let mut buckets: BTreeMap<Option<String>, Vec<usize>> = BTreeMap::new();
        for (i, op) in operations.iter().enumerate() {
            buckets.entry(op.work_center_id.clone()).or_default().push(i);
        }

        for indexes in buckets.values_mut() {
            indexes.sort_by(|&a, &b| Self::compare(&operations[a], &operations[b]));
            for (rank, &i) in indexes.iter().enumerate() {
                operations[i].priority = rank as i64 + 1;
            }
        }
    }

    /// 中位插入的分数优先级 (批量流程之外使用)
    pub fn fractional_priority(&self, before: f64, after: f64) -> f64 {
        (before + after) / 2.0
    }

    // ==========================================
    // 比较方法
    // ==========================================

    fn compare(a: &ScheduledOperation, b: &ScheduledOperation) -> Ordering {
        // 1. 开工日期升序,空值最后
        let by_start = match (a.start_date, b.start_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if by_start != Ordering::Equal {
            return by_start;
        }

        // 2. 工单优先级升序 (空按 0)
        let by_job = a
            .job_priority
            .unwrap_or(0)
            .cmp(&b.job_priority.unwrap_or(0));
        if by_job != Ordering::Equal {
            return by_job;
        }

        // 3. 交期类型秩
        a.deadline_type.rank().cmp(&b.deadline_type.rank())
    }
}
