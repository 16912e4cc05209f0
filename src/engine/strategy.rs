// ==========================================
// 车间工单排产系统 - 排程策略
// ==========================================
// 两个具体策略共用一个签名,按方向枚举分派:
// - 倒排: 锚点取工单交期,逆拓扑走图 (末道先排)
// - 顺排: 锚点取工单开工日期,正拓扑走图 (首道先排)
// 日期区间为闭区间: 1 天的工序当日开工当日完工
// 红线: 冲突是数据不是错误;顺排不做冲突检测 (保持既有行为)
// ==========================================

use crate::domain::job::Job;
use crate::domain::operation::{JobOperation, ScheduledOperation};
use crate::domain::types::OperationOrderKind;
use crate::engine::calendar::{
    add_business_days, format_iso, subtract_business_days, CalendarProvider, WeekdayCalendar,
};
use crate::engine::dependency_graph::{DependencyGraph, SortDirection};
use crate::engine::duration::DurationCalculator;
use crate::engine::error::EngineResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 倒排模式下的占位优先级 (低);随后由 PriorityAssigner 覆写
const BACKWARD_DEFAULT_PRIORITY: i64 = 99;
/// 顺排模式下的占位优先级 (高);随后由 PriorityAssigner 覆写
const FORWARD_DEFAULT_PRIORITY: i64 = 1;

// ==========================================
// ScheduleDirection - 排程方向
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleDirection {
    Backward,
    Forward,
}

impl ScheduleDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleDirection::Backward => "backward",
            ScheduleDirection::Forward => "forward",
        }
    }

    /// 对应的拓扑排序方向
    pub fn sort_direction(&self) -> SortDirection {
        match self {
            ScheduleDirection::Backward => SortDirection::Reverse,
            ScheduleDirection::Forward => SortDirection::Forward,
        }
    }
}

impl Default for ScheduleDirection {
    fn default() -> Self {
        ScheduleDirection::Backward
    }
}

impl std::fmt::Display for ScheduleDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ScheduleDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "backward" => Ok(ScheduleDirection::Backward),
            "forward" => Ok(ScheduleDirection::Forward),
            other => Err(format!("未知排程方向: {}", other)),
        }
    }
}

// ==========================================
// ScheduleMode - 排程模式
// ==========================================
// initial 无条件覆写;reschedule 钉住进行中/暂停的工序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleMode {
    Initial,
    Reschedule,
}

impl ScheduleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleMode::Initial => "initial",
            ScheduleMode::Reschedule => "reschedule",
        }
    }
}

impl Default for ScheduleMode {
    fn default() -> Self {
        ScheduleMode::Initial
    }
}

impl std::fmt::Display for ScheduleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ScheduleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "initial" => Ok(ScheduleMode::Initial),
            "reschedule" => Ok(ScheduleMode::Reschedule),
            other => Err(format!("未知排程模式: {}", other)),
        }
    }
}

// ==========================================
// SchedulingStrategy - 排程策略
// ==========================================
pub struct SchedulingStrategy<C: CalendarProvider = WeekdayCalendar> {
    direction: ScheduleDirection,
    mode: ScheduleMode,
    duration: DurationCalculator,
    calendar: C,
}

impl SchedulingStrategy<WeekdayCalendar> {
    /// 构造函数 (默认周一至周五日历)
    pub fn new(
        direction: ScheduleDirection,
        mode: ScheduleMode,
        duration: DurationCalculator,
    ) -> Self {
        Self::with_calendar(direction, mode, duration, WeekdayCalendar)
    }
}

impl<C: CalendarProvider> SchedulingStrategy<C> {
    /// 注入自定义日历的构造函数
    pub fn with_calendar(
        direction: ScheduleDirection,
        mode: ScheduleMode,
        duration: DurationCalculator,
        calendar: C,
    ) -> Self {
        Self {
            direction,
            mode,
            duration,
            calendar,
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 对工序集合做日期推算
    ///
    /// # 参数
    /// - `operations`: 遍历序工序列表
    /// - `graph`: 工序依赖图 (必须已包含全部工序)
    /// - `job`: 工单头 (锚点来源)
    /// - `today`: 当前日期 (冲突判定与锚点兜底)
    ///
    /// # 返回
    /// 工序ID → 已排工序 的映射
    pub fn schedule(
        &self,
        operations: &[JobOperation],
        graph: &DependencyGraph,
        job: &Job,
        today: NaiveDate,
    ) -> EngineResult<HashMap<String, ScheduledOperation>> {
        match self.direction {
            ScheduleDirection::Backward => self.schedule_backward(operations, graph, job, today),
            ScheduleDirection::Forward => self.schedule_forward(operations, graph, job, today),
        }
    }

    // ==========================================
    // 倒排策略
    // ==========================================

    fn schedule_backward(
        &self,
        operations: &[JobOperation],
        graph: &DependencyGraph,
        job: &Job,
        today: NaiveDate,
    ) -> EngineResult<HashMap<String, ScheduledOperation>> {
        let anchor = job.due_date.unwrap_or(today);
        let op_map = Self::index_operations(operations);
        let order = graph.topological_sort(SortDirection::Reverse)?;

        let mut scheduled: HashMap<String, ScheduledOperation> = HashMap::new();
        for operation_id in &order {
            let Some(op) = op_map.get(operation_id.as_str()) else {
                continue;
            };

            let hours = self.duration.operation_hours(op);
            let days = self.duration.operation_days(hours);

            // 钉住态: 保留既有日期与机台,不做冲突判定
            if self.is_pinned(op) {
                scheduled.insert(
                    op.operation_id.clone(),
                    self.pinned(op, job, hours, days, BACKWARD_DEFAULT_PRIORITY),
                );
                continue;
            }

            let Some(node) = graph.node(operation_id) else {
                continue;
            };

            // 并行工序: 首个前驱已排时直接拷贝其日期与冲突标记
            if op.operation_order == OperationOrderKind::WithPrevious {
                if let Some(prev) = node.depends_on.first().and_then(|id| scheduled.get(id)) {
                    let copy = self.copy_of(op, job, prev, hours, days, BACKWARD_DEFAULT_PRIORITY);
                    scheduled.insert(op.operation_id.clone(), copy);
                    continue;
                }
            }

            // 完工日期: 末道取锚点;否则取已排后继的最早约束
            // 约束口径: 后继开工日的前一工作日,再让出后继的前置期
            let due = node
                .required_by
                .iter()
                .filter_map(|id| scheduled.get(id))
                .filter_map(|dep| {
                    dep.start_date.map(|start| {
                        subtract_business_days(&self.calendar, start, dep.lead_time_days + 1)
                    })
                })
                .min()
                .unwrap_or(anchor);

            let start = subtract_business_days(&self.calendar, due, days - 1);

            let mut sched = self.fresh(op, job, start, due, hours, days, BACKWARD_DEFAULT_PRIORITY);
            if start < today {
                sched.mark_conflict(format!(
                    "开工日期 {} 早于当前日期 {}",
                    format_iso(start),
                    format_iso(today)
                ));
            }
            scheduled.insert(op.operation_id.clone(), sched);
        }

        Ok(scheduled)
    }

    // ==========================================
    // 顺排策略
    // ==========================================
    // 顺排不做冲突检测: 由构造方式保证不会排到过去

    fn schedule_forward(
        &self,
        operations: &[JobOperation],
        graph: &DependencyGraph,
        job: &Job,
        today: NaiveDate,
    ) -> EngineResult<HashMap<String, ScheduledOperation>> {
        let anchor = job.start_date.unwrap_or(today);
        let op_map = Self::index_operations(operations);
        let order = graph.topological_sort(SortDirection::Forward)?;

        let mut scheduled: HashMap<String, ScheduledOperation> = HashMap::new();
        for operation_id in &order {
            let Some(op) = op_map.get(operation_id.as_str()) else {
                continue;
            };

            let hours = self.duration.operation_hours(op);
            let days = self.duration.operation_days(hours);

            if self.is_pinned(op) {
                scheduled.insert(
                    op.operation_id.clone(),
                    self.pinned(op, job, hours, days, FORWARD_DEFAULT_PRIORITY),
                );
                continue;
            }

            let Some(node) = graph.node(operation_id) else {
                continue;
            };

            if op.operation_order == OperationOrderKind::WithPrevious {
                if let Some(prev) = node.depends_on.first().and_then(|id| scheduled.get(id)) {
                    let copy = self.copy_of(op, job, prev, hours, days, FORWARD_DEFAULT_PRIORITY);
                    scheduled.insert(op.operation_id.clone(), copy);
                    continue;
                }
            }

            // 开工日期: 首道取锚点;否则取已排前驱的最晚完工,
            // 顺延一个工作日再加上自身前置期
            let start = node
                .depends_on
                .iter()
                .filter_map(|id| scheduled.get(id))
                .filter_map(|dep| dep.due_date)
                .max()
                .map(|due| add_business_days(&self.calendar, due, op.lead_time_days + 1))
                .unwrap_or(anchor);

            let due = add_business_days(&self.calendar, start, days - 1);

            let sched = self.fresh(op, job, start, due, hours, days, FORWARD_DEFAULT_PRIORITY);
            scheduled.insert(op.operation_id.clone(), sched);
        }

        Ok(scheduled)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn index_operations(operations: &[JobOperation]) -> HashMap<&str, &JobOperation> {
        operations
            .iter()
            .map(|op| (op.operation_id.as_str(), op))
            .collect()
    }

    /// reschedule 模式下带既有开工日期的进行中/暂停工序被钉住
    fn is_pinned(&self, op: &JobOperation) -> bool {
        self.mode == ScheduleMode::Reschedule
            && op.status.is_pinned()
            && op.start_date.is_some()
    }

    /// 新排工序快照
    #[allow(clippy::too_many_arguments)]
    fn fresh(
        &self,
        op: &JobOperation,
        job: &Job,
        start: NaiveDate,
        due: NaiveDate,
        hours: f64,
        days: i64,
        default_priority: i64,
    ) -> ScheduledOperation {
        ScheduledOperation {
            operation_id: op.operation_id.clone(),
            job_id: op.job_id.clone(),
            method_id: op.method_id.clone(),
            process_id: op.process_id.clone(),
            operation_order: op.operation_order,
            operation_type: op.operation_type,
            status: op.status,
            start_date: Some(start),
            due_date: Some(due),
            work_center_id: None,
            priority: op.priority.unwrap_or(default_priority),
            duration_hours: hours,
            duration_days: days,
            lead_time_days: op.lead_time_days,
            has_conflict: false,
            conflict_reason: None,
            job_priority: job.job_priority,
            deadline_type: job.deadline_type,
        }
    }

    /// 钉住工序快照: 保留既有日期与机台
    ///
    /// 完工日期缺失时按工期闭区间补齐,保证后继约束可传播
    fn pinned(
        &self,
        op: &JobOperation,
        job: &Job,
        hours: f64,
        days: i64,
        default_priority: i64,
    ) -> ScheduledOperation {
        let start = op.start_date;
        let due = op.due_date.or_else(|| {
            start.map(|s| add_business_days(&self.calendar, s, days - 1))
        });

        ScheduledOperation {
            operation_id: op.operation_id.clone(),
            job_id: op.job_id.clone(),
            method_id: op.method_id.clone(),
            process_id: op.process_id.clone(),
            operation_order: op.operation_order,
            operation_type: op.operation_type,
            status: op.status,
            start_date: start,
            due_date: due,
            work_center_id: op.work_center_id.clone(),
            priority: op.priority.unwrap_or(default_priority),
            duration_hours: hours,
            duration_days: days,
            lead_time_days: op.lead_time_days,
            has_conflict: false,
            conflict_reason: None,
            job_priority: job.job_priority,
            deadline_type: job.deadline_type,
        }
    }

    /// 并行工序拷贝: 与首个前驱同日期同冲突标记
    #[allow(clippy::too_many_arguments)]
    fn copy_of(
        &self,
        op: &JobOperation,
        job: &Job,
        prev: &ScheduledOperation,
        hours: f64,
        days: i64,
        default_priority: i64,
    ) -> ScheduledOperation {
        ScheduledOperation {
            operation_id: op.operation_id.clone(),
            job_id: op.job_id.clone(),
            method_id: op.method_id.clone(),
            process_id: op.process_id.clone(),
            operation_order: op.operation_order,
            operation_type: op.operation_type,
            status: op.status,
            start_date: prev.start_date,
            due_date: prev.due_date,
            work_center_id: None,
            priority: op.priority.unwrap_or(default_priority),
            duration_hours: hours,
            duration_days: days,
            lead_time_days: op.lead_time_days,
            has_conflict: prev.has_conflict,
            conflict_reason: prev.conflict_reason.clone(),
            job_priority: job.job_priority,
            deadline_type: job.deadline_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{DeadlineType, OperationStatus, OperationType, RateUnit};
    use crate::engine::dependency_builder::DependencyBuilder;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn one_day_op(id: &str, order: f64, kind: OperationOrderKind) -> JobOperation {
        JobOperation {
            operation_id: id.to_string(),
            job_id: "J1".to_string(),
            method_id: "M1".to_string(),
            company_id: "C1".to_string(),
            op_order: order,
            operation_order: kind,
            operation_type: OperationType::Inside,
            status: OperationStatus::Ready,
            process_id: "P1".to_string(),
            work_center_id: None,
            setup_time: None,
            setup_unit: None,
            labor_time: Some(1.0),
            labor_unit: Some(RateUnit::TotalHours),
            machine_time: None,
            machine_unit: None,
            operation_quantity: None,
            lead_time_days: 0,
            start_date: None,
            due_date: None,
            priority: None,
        }
    }

    fn job_due(due: NaiveDate) -> Job {
        Job {
            job_id: "J1".to_string(),
            company_id: "C1".to_string(),
            location_id: Some("L1".to_string()),
            job_priority: None,
            deadline_type: DeadlineType::NoDeadline,
            start_date: None,
            due_date: Some(due),
        }
    }

    fn graph_for(ops: &[JobOperation]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        DependencyBuilder::new().build_same_method_edges(ops, &mut graph);
        graph
    }

    fn backward() -> SchedulingStrategy {
        SchedulingStrategy::new(
            ScheduleDirection::Backward,
            ScheduleMode::Initial,
            DurationCalculator::new(8.0),
        )
    }

    #[test]
    fn test_backward_linear_chain() {
        // 三道 1 天工序, 交期 2025-01-17 (周五)
        let ops = vec![
            one_day_op("A", 1.0, OperationOrderKind::AfterPrevious),
            one_day_op("B", 2.0, OperationOrderKind::AfterPrevious),
            one_day_op("C", 3.0, OperationOrderKind::AfterPrevious),
        ];
        let graph = graph_for(&ops);
        let job = job_due(d(2025, 1, 17));

        let scheduled = backward()
            .schedule(&ops, &graph, &job, d(2025, 1, 10))
            .unwrap();

        assert_eq!(scheduled["C"].start_date, Some(d(2025, 1, 17)));
        assert_eq!(scheduled["C"].due_date, Some(d(2025, 1, 17)));
        assert_eq!(scheduled["B"].start_date, Some(d(2025, 1, 16)));
        assert_eq!(scheduled["B"].due_date, Some(d(2025, 1, 16)));
        assert_eq!(scheduled["A"].start_date, Some(d(2025, 1, 15)));
        assert_eq!(scheduled["A"].due_date, Some(d(2025, 1, 15)));
        assert!(scheduled.values().all(|s| !s.has_conflict));
    }

    #[test]
    fn test_backward_with_previous_group_shares_dates() {
        let ops = vec![
            one_day_op("A", 1.0, OperationOrderKind::AfterPrevious),
            one_day_op("B", 2.0, OperationOrderKind::WithPrevious),
            one_day_op("C", 3.0, OperationOrderKind::AfterPrevious),
        ];
        let graph = graph_for(&ops);
        let job = job_due(d(2025, 1, 17));

        let scheduled = backward()
            .schedule(&ops, &graph, &job, d(2025, 1, 10))
            .unwrap();

        assert_eq!(scheduled["C"].start_date, Some(d(2025, 1, 17)));
        assert_eq!(scheduled["A"].start_date, Some(d(2025, 1, 16)));
        assert_eq!(scheduled["A"].due_date, Some(d(2025, 1, 16)));
        assert_eq!(scheduled["B"].start_date, Some(d(2025, 1, 16)));
        assert_eq!(scheduled["B"].due_date, Some(d(2025, 1, 16)));
    }

    #[test]
    fn test_backward_conflict_when_start_in_past() {
        // 单道 3 天工序, 交期 = 今日 → 开工落在过去
        let mut op = one_day_op("A", 1.0, OperationOrderKind::AfterPrevious);
        op.labor_time = Some(24.0); // 3 个工作日
        let ops = vec![op];
        let graph = graph_for(&ops);

        let today = d(2025, 1, 17); // 周五
        let job = job_due(today);

        let scheduled = backward().schedule(&ops, &graph, &job, today).unwrap();
        let a = &scheduled["A"];

        assert_eq!(a.due_date, Some(today));
        assert_eq!(a.start_date, Some(d(2025, 1, 15))); // 往前两个工作日
        assert!(a.has_conflict);
        let reason = a.conflict_reason.as_deref().unwrap();
        assert!(reason.contains("2025-01-15"));
        assert!(reason.contains("2025-01-17"));
    }

    #[test]
    fn test_backward_lead_time_pushes_predecessor_earlier() {
        // B 带 2 天前置期: A 须在 B 开工前 3 个工作日完工
        let mut b = one_day_op("B", 2.0, OperationOrderKind::AfterPrevious);
        b.lead_time_days = 2;
        let ops = vec![one_day_op("A", 1.0, OperationOrderKind::AfterPrevious), b];
        let graph = graph_for(&ops);
        let job = job_due(d(2025, 1, 17));

        let scheduled = backward()
            .schedule(&ops, &graph, &job, d(2025, 1, 6))
            .unwrap();

        assert_eq!(scheduled["B"].start_date, Some(d(2025, 1, 17)));
        // 01-17 往前 (2 + 1) 个工作日 = 01-14
        assert_eq!(scheduled["A"].due_date, Some(d(2025, 1, 14)));
        assert_eq!(scheduled["A"].start_date, Some(d(2025, 1, 14)));
    }

    #[test]
    fn test_backward_anchor_defaults_to_today() {
        let ops = vec![one_day_op("A", 1.0, OperationOrderKind::AfterPrevious)];
        let graph = graph_for(&ops);
        let mut job = job_due(d(2025, 1, 17));
        job.due_date = None;

        let today = d(2025, 1, 15);
        let scheduled = backward().schedule(&ops, &graph, &job, today).unwrap();
        assert_eq!(scheduled["A"].due_date, Some(today));
    }

    #[test]
    fn test_forward_linear_chain() {
        let ops = vec![
            one_day_op("A", 1.0, OperationOrderKind::AfterPrevious),
            one_day_op("B", 2.0, OperationOrderKind::AfterPrevious),
            one_day_op("C", 3.0, OperationOrderKind::AfterPrevious),
        ];
        let graph = graph_for(&ops);
        let mut job = job_due(d(2025, 1, 17));
        job.start_date = Some(d(2025, 1, 15)); // 周三

        let strategy = SchedulingStrategy::new(
            ScheduleDirection::Forward,
            ScheduleMode::Initial,
            DurationCalculator::new(8.0),
        );
        let scheduled = strategy
            .schedule(&ops, &graph, &job, d(2025, 1, 10))
            .unwrap();

        assert_eq!(scheduled["A"].start_date, Some(d(2025, 1, 15)));
        assert_eq!(scheduled["A"].due_date, Some(d(2025, 1, 15)));
        assert_eq!(scheduled["B"].start_date, Some(d(2025, 1, 16)));
        assert_eq!(scheduled["C"].start_date, Some(d(2025, 1, 17)));
        assert_eq!(scheduled["C"].due_date, Some(d(2025, 1, 17)));
        // 顺排不做冲突检测
        assert!(scheduled.values().all(|s| !s.has_conflict));
    }

    #[test]
    fn test_forward_skips_weekend() {
        let ops = vec![
            one_day_op("A", 1.0, OperationOrderKind::AfterPrevious),
            one_day_op("B", 2.0, OperationOrderKind::AfterPrevious),
        ];
        let graph = graph_for(&ops);
        let mut job = job_due(d(2025, 1, 24));
        job.start_date = Some(d(2025, 1, 17)); // 周五

        let strategy = SchedulingStrategy::new(
            ScheduleDirection::Forward,
            ScheduleMode::Initial,
            DurationCalculator::new(8.0),
        );
        let scheduled = strategy
            .schedule(&ops, &graph, &job, d(2025, 1, 10))
            .unwrap();

        assert_eq!(scheduled["A"].due_date, Some(d(2025, 1, 17)));
        assert_eq!(scheduled["B"].start_date, Some(d(2025, 1, 20))); // 跳过周末
    }

    #[test]
    fn test_forward_with_previous_copies_first_predecessor() {
        // 两道根工序 A/B 汇入并行对 C/D:
        // C 正常推算,D (并行) 的首个前驱为 C,应整体拷贝 C 的日期与冲突标记
        let ops = vec![
            one_day_op("A", 1.0, OperationOrderKind::AfterPrevious),
            one_day_op("B", 2.0, OperationOrderKind::AfterPrevious),
            one_day_op("C", 3.0, OperationOrderKind::AfterPrevious),
            {
                // D 工期 2 天: 若拷贝分支失效,独立推算必然偏离 C
                let mut op_d = one_day_op("D", 4.0, OperationOrderKind::WithPrevious);
                op_d.labor_time = Some(16.0);
                op_d
            },
        ];

        let mut graph = DependencyGraph::new();
        for op in &ops {
            graph.ensure_node(&op.operation_id);
        }
        graph.add_dependency("C", "A");
        graph.add_dependency("C", "B");
        // D 的前驱列表以组友 C 打头 (首个前驱即列表首位)
        graph.add_dependency("D", "C");
        graph.add_dependency("D", "A");
        graph.add_dependency("D", "B");

        let mut job = job_due(d(2025, 1, 17));
        job.start_date = Some(d(2025, 1, 13)); // 周一

        let strategy = SchedulingStrategy::new(
            ScheduleDirection::Forward,
            ScheduleMode::Initial,
            DurationCalculator::new(8.0),
        );
        let scheduled = strategy
            .schedule(&ops, &graph, &job, d(2025, 1, 10))
            .unwrap();

        // 根工序落锚点,C 顺延一个工作日
        assert_eq!(scheduled["A"].start_date, Some(d(2025, 1, 13)));
        assert_eq!(scheduled["B"].start_date, Some(d(2025, 1, 13)));
        assert_eq!(scheduled["C"].start_date, Some(d(2025, 1, 14)));
        assert_eq!(scheduled["C"].due_date, Some(d(2025, 1, 14)));

        // D 与 C 同日期同冲突标记 (2 天工期被拷贝覆盖,不再独立推算)
        assert_eq!(scheduled["D"].start_date, scheduled["C"].start_date);
        assert_eq!(scheduled["D"].due_date, scheduled["C"].due_date);
        assert_eq!(scheduled["D"].has_conflict, scheduled["C"].has_conflict);
        assert_eq!(
            scheduled["D"].conflict_reason,
            scheduled["C"].conflict_reason
        );
        assert_eq!(scheduled["D"].due_date, Some(d(2025, 1, 14)));
    }

    #[test]
    fn test_reschedule_pins_in_progress_dates() {
        let mut a = one_day_op("A", 1.0, OperationOrderKind::AfterPrevious);
        a.status = OperationStatus::InProgress;
        a.start_date = Some(d(2025, 1, 6));
        a.due_date = Some(d(2025, 1, 6));
        a.work_center_id = Some("W9".to_string());
        let ops = vec![a, one_day_op("B", 2.0, OperationOrderKind::AfterPrevious)];
        let graph = graph_for(&ops);
        let job = job_due(d(2025, 1, 17));

        let strategy = SchedulingStrategy::new(
            ScheduleDirection::Backward,
            ScheduleMode::Reschedule,
            DurationCalculator::new(8.0),
        );
        let scheduled = strategy
            .schedule(&ops, &graph, &job, d(2025, 1, 10))
            .unwrap();

        // A 保留既有日期与机台,且不报冲突 (尽管开工在过去)
        assert_eq!(scheduled["A"].start_date, Some(d(2025, 1, 6)));
        assert_eq!(scheduled["A"].work_center_id, Some("W9".to_string()));
        assert!(!scheduled["A"].has_conflict);
        // B 正常按锚点倒排
        assert_eq!(scheduled["B"].due_date, Some(d(2025, 1, 17)));
    }

    #[test]
    fn test_direction_and_mode_parsing() {
        assert_eq!(
            "backward".parse::<ScheduleDirection>().unwrap(),
            ScheduleDirection::Backward
        );
        assert_eq!(
            "FORWARD".parse::<ScheduleDirection>().unwrap(),
            ScheduleDirection::Forward
        );
        assert!("sideways".parse::<ScheduleDirection>().is_err());
        assert_eq!(
            "reschedule".parse::<ScheduleMode>().unwrap(),
            ScheduleMode::Reschedule
        );
        assert!("redo".parse::<ScheduleMode>().is_err());
    }
}
