// ==========================================
// 车间工单排产系统 - 机台选择引擎
// ==========================================
// 职责: 工艺 → 可用机台映射 + 负荷均衡指派
// 负荷口径: 库内在途负荷 (实时读取) + 本轮内存累计
// 决胜口径: 工艺声明的机台顺序,首个最低负荷者胜 (确定性)
// 红线: 无可用机台记为工序冲突,批次继续;存储错误才中止
// ==========================================

use crate::domain::operation::ScheduledOperation;
use crate::domain::types::OperationType;
use crate::engine::error::{EngineResult, ScheduleError};
use crate::engine::strategy::ScheduleMode;
use crate::repository::operation_repo::OperationRepository;
use crate::repository::resource_repo::ResourceRepository;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

// ==========================================
// WorkCenterLoadTally - 本轮负荷累计
// ==========================================
// 生命周期: 每轮批量指派开始时清零,引擎退出即丢弃
#[derive(Debug, Clone, Default)]
pub struct WorkCenterLoadTally {
    hours: HashMap<String, f64>,
}

impl WorkCenterLoadTally {
    pub fn reset(&mut self) {
        self.hours.clear();
    }

    pub fn add(&mut self, work_center_id: &str, hours: f64) {
        *self.hours.entry(work_center_id.to_string()).or_insert(0.0) += hours;
    }

    pub fn get(&self, work_center_id: &str) -> f64 {
        self.hours.get(work_center_id).copied().unwrap_or(0.0)
    }
}

// ==========================================
// WorkCenterSelector - 机台选择引擎
// ==========================================
pub struct WorkCenterSelector {
    operation_repo: Arc<OperationRepository>,
    resource_repo: Arc<ResourceRepository>,
    company_id: String,
    process_work_centers: HashMap<String, Vec<String>>,
    tally: WorkCenterLoadTally,
}

impl WorkCenterSelector {
    pub fn new(
        operation_repo: Arc<OperationRepository>,
        resource_repo: Arc<ResourceRepository>,
        company_id: &str,
    ) -> Self {
        Self {
            operation_repo,
            resource_repo,
            company_id: company_id.to_string(),
            process_work_centers: HashMap::new(),
            tally: WorkCenterLoadTally::default(),
        }
    }

    // ==========================================
    // 初始化
    // ==========================================

    /// 加载工艺与目标地点的启用机台,建立映射
    ///
    /// 映射保持工艺声明的机台顺序,过滤为"启用且同地点"
    pub fn initialize(&mut self, location_id: &str) -> EngineResult<()> {
        let processes = self.resource_repo.find_processes(&self.company_id)?;
        let active = self
            .resource_repo
            .find_active_work_centers(&self.company_id, location_id)?;

        let active_ids: HashSet<&str> =
            active.iter().map(|wc| wc.work_center_id.as_str()).collect();

        self.process_work_centers = processes
            .into_iter()
            .map(|p| {
                let eligible: Vec<String> = p
                    .work_center_ids
                    .iter()
                    .filter(|id| active_ids.contains(id.as_str()))
                    .cloned()
                    .collect();
                (p.process_id, eligible)
            })
            .collect();

        debug!(
            processes = self.process_work_centers.len(),
            active_work_centers = active_ids.len(),
            location_id,
            "机台映射初始化完成"
        );
        Ok(())
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 为工艺挑选负荷最低的机台
    ///
    /// # 参数
    /// - `before_date`: 负荷统计截止日期,缺省取今日
    ///
    /// # 返回
    /// 机台ID;工艺未知或无可用机台时报错
    pub fn select_work_center(
        &self,
        process_id: &str,
        before_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> EngineResult<String> {
        let cutoff = before_date.unwrap_or(today);

        let candidates = self
            .process_work_centers
            .get(process_id)
            .ok_or_else(|| ScheduleError::UnknownProcess {
                process_id: process_id.to_string(),
            })?;

        if candidates.is_empty() {
            return Err(ScheduleError::NoEligibleWorkCenter {
                process_id: process_id.to_string(),
            });
        }

        let mut best: Option<(&str, f64)> = None;
        for work_center_id in candidates {
            let persisted =
                self.operation_repo
                    .aggregate_load_hours(work_center_id, cutoff, &self.company_id)?;
            let load = persisted + self.tally.get(work_center_id);

            // 严格小于才替换: 同分时首个候选胜出
            match best {
                Some((_, best_load)) if load >= best_load => {}
                _ => best = Some((work_center_id, load)),
            }
        }

        best.map(|(id, _)| id.to_string())
            .ok_or_else(|| ScheduleError::NoEligibleWorkCenter {
                process_id: process_id.to_string(),
            })
    }

    /// 批量指派机台
    ///
    /// 流程:
    /// 1) 清零本轮累计
    /// 2) 按开工日期升序处理 (空值最后),先排的工序先占负荷
    /// 3) 委外工序整体跳过;钉住工序保留机台但计入累计
    /// 4) 无可用机台记为该工序冲突,其余工序继续
    pub fn assign_work_centers(
        &mut self,
        operations: &mut [ScheduledOperation],
        mode: ScheduleMode,
        today: NaiveDate,
    ) -> EngineResult<()> {
        self.tally.reset();

        let mut indexes: Vec<usize> = (0..operations.len()).collect();
        indexes.sort_by(|&a, &b| match (operations[a].start_date, operations[b].start_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        for i in indexes {
            if operations[i].operation_type == OperationType::Outside {
                continue;
            }

            // 钉住工序: 机台不变,负荷照计
            if mode == ScheduleMode::Reschedule && operations[i].status.is_pinned() {
                if let Some(wc) = operations[i].work_center_id.clone() {
                    self.tally.add(&wc, operations[i].duration_hours);
                    continue;
                }
            }

            let process_id = operations[i].process_id.clone();
            match self.select_work_center(&process_id, operations[i].start_date, today) {
                Ok(work_center_id) => {
                    self.tally.add(&work_center_id, operations[i].duration_hours);
                    operations[i].work_center_id = Some(work_center_id);
                }
                Err(err @ ScheduleError::UnknownProcess { .. })
                | Err(err @ ScheduleError::NoEligibleWorkCenter { .. }) => {
                    debug!(
                        operation_id = %operations[i].operation_id,
                        %err,
                        "机台指派失败,记为冲突"
                    );
                    operations[i].work_center_id = None;
                    operations[i].mark_conflict(err.to_string());
                }
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}
