// ==========================================
// 车间工单排产系统 - 引擎编排器
// ==========================================
// 用途: 协调装配树 → 依赖图 → 排程策略 → 机台指派 → 优先级 → 落库
// 红线: 环检测先于任何写入;落库是唯一提交点,按类别各一事务
// ==========================================

use crate::config::ScheduleConfigReader;
use crate::domain::job::Job;
use crate::domain::method::JobMaterial;
use crate::domain::operation::ScheduledOperation;
use crate::engine::assembly::AssemblyHandler;
use crate::engine::dependency_builder::DependencyBuilder;
use crate::engine::dependency_graph::DependencyGraph;
use crate::engine::duration::DurationCalculator;
use crate::engine::error::{EngineResult, ScheduleError};
use crate::engine::priority::PriorityAssigner;
use crate::engine::repositories::ScheduleRepositories;
use crate::engine::strategy::{ScheduleDirection, ScheduleMode, SchedulingStrategy};
use crate::engine::work_center::WorkCenterSelector;
use crate::repository::schedule_log_repo::ScheduleLogEntry;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

// ==========================================
// ScheduleRequest - 排产请求
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub job_id: String,
    pub company_id: String,
    pub user_id: String,
    pub mode: ScheduleMode,
    pub direction: ScheduleDirection,
}

// ==========================================
// ScheduleSummary - 排产结果汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub success: bool,
    pub operations_scheduled: i64,
    pub conflicts_detected: i64,
    pub work_centers_affected: Vec<String>,
    pub assembly_depth: i64,
}

impl ScheduleSummary {
    /// 空结果 (工单无根方法或无可排工序)
    fn empty(assembly_depth: i64) -> Self {
        Self {
            success: true,
            operations_scheduled: 0,
            conflicts_detected: 0,
            work_centers_affected: Vec::new(),
            assembly_depth,
        }
    }
}

// ==========================================
// ScheduleOrchestrator - 引擎编排器
// ==========================================
pub struct ScheduleOrchestrator<C>
where
    C: ScheduleConfigReader,
{
    config: Arc<C>,
    repos: ScheduleRepositories,
    assembly: AssemblyHandler,
    builder: DependencyBuilder,
    priority: PriorityAssigner,
}

impl<C> ScheduleOrchestrator<C>
where
    C: ScheduleConfigReader,
{
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 配置读取器
    /// - repos: 仓储集束
    pub fn new(config: Arc<C>, repos: ScheduleRepositories) -> Self {
        Self {
            config,
            repos,
            assembly: AssemblyHandler::new(),
            builder: DependencyBuilder::new(),
            priority: PriorityAssigner::new(),
        }
    }

    /// 执行完整排产流程 (单工单)
    ///
    /// # 参数
    /// - request: 排产请求 (已通过 API 层校验)
    /// - today: 当前日期 (注入以保证可测性)
    ///
    /// # 返回
    /// 排产结果汇总
    #[instrument(skip(self, request), fields(
        job_id = %request.job_id,
        mode = %request.mode,
        direction = %request.direction
    ))]
    pub async fn execute(
        &self,
        request: &ScheduleRequest,
        today: NaiveDate,
    ) -> EngineResult<ScheduleSummary> {
        self.validate(request)?;

        // ==========================================
        // 步骤1: 读取工单头与装配树
        // ==========================================
        debug!("步骤1: 读取工单头与装配树");

        let Some(job) = self
            .repos
            .jobs
            .find_by_id(&request.job_id, &request.company_id)?
        else {
            info!(job_id = %request.job_id, "工单不存在,返回空结果");
            return Ok(ScheduleSummary::empty(0));
        };

        let methods = self
            .repos
            .methods
            .find_by_job(&request.job_id, &request.company_id)?;
        let materials: HashMap<String, JobMaterial> = self
            .repos
            .methods
            .find_materials_by_job(&request.job_id, &request.company_id)?
            .into_iter()
            .map(|m| (m.material_id.clone(), m))
            .collect();

        let Some(tree) = self.assembly.build_tree(&methods, &materials)? else {
            info!(job_id = %request.job_id, "工单无根方法,返回空结果");
            return Ok(ScheduleSummary::empty(0));
        };
        let assembly_depth = tree.depth();

        // ==========================================
        // 步骤2: 按方向收集遍历序工序流
        // ==========================================
        debug!("步骤2: 收集遍历序工序流");

        let operations = self
            .repos
            .operations
            .find_schedulable_by_job(&request.job_id, &request.company_id)?;
        if operations.is_empty() {
            info!(job_id = %request.job_id, "工单无可排工序,返回空结果");
            return Ok(ScheduleSummary::empty(assembly_depth));
        }

        let method_order = match request.direction {
            ScheduleDirection::Backward => self.assembly.post_order(&tree),
            ScheduleDirection::Forward => self.assembly.pre_order(&tree),
        };
        let ordered_ops = self.assembly.operations_in_order(&method_order, &operations);
        let ops_by_method = self.assembly.group_by_method(&ordered_ops);

        // ==========================================
        // 步骤3: 建图 (同方法边 + 跨方法边),环检测先于落库
        // ==========================================
        debug!("步骤3: 构建依赖图");

        let mut graph = DependencyGraph::new();
        for op in &ordered_ops {
            graph.ensure_node(&op.operation_id);
        }
        for method_id in &method_order {
            if let Some(ops) = ops_by_method.get(method_id) {
                self.builder.build_same_method_edges(ops, &mut graph);
            }
        }
        self.assembly.build_cross_method_edges(
            &tree,
            &ops_by_method,
            &materials,
            &self.builder,
            &mut graph,
        );

        // 有环即中止,此时尚无任何写入
        graph.topological_sort(request.direction.sort_direction())?;

        let edges = graph.edges();
        self.repos
            .dependencies
            .replace_for_job(&request.job_id, &request.company_id, &edges)?;

        info!(
            operations = ordered_ops.len(),
            edges = edges.len(),
            assembly_depth,
            "依赖图构建完成"
        );

        // ==========================================
        // 步骤4: 排程策略 (锚点: 倒排取交期,顺排取开工日期)
        // ==========================================
        debug!("步骤4: 执行排程策略");

        let hours_per_day = self
            .config
            .get_hours_per_day()
            .await
            .map_err(|e| ScheduleError::ConfigError(e.to_string()))?;
        let strategy = SchedulingStrategy::new(
            request.direction,
            request.mode,
            DurationCalculator::new(hours_per_day),
        );
        let scheduled_map = strategy.schedule(&ordered_ops, &graph, &job, today)?;

        // 回到遍历序,保证后续批处理与落库顺序可复现
        let mut scheduled: Vec<ScheduledOperation> = ordered_ops
            .iter()
            .filter_map(|op| scheduled_map.get(&op.operation_id).cloned())
            .collect();

        // ==========================================
        // 步骤5: 机台指派 (负荷均衡)
        // ==========================================
        debug!("步骤5: 执行机台指派");

        let location_id = job.location_id.clone().unwrap_or_default();
        let mut selector = WorkCenterSelector::new(
            self.repos.operations.clone(),
            self.repos.resources.clone(),
            &request.company_id,
        );
        selector.initialize(&location_id)?;
        selector.assign_work_centers(&mut scheduled, request.mode, today)?;

        // ==========================================
        // 步骤6: 机台内优先级
        // ==========================================
        debug!("步骤6: 指派机台内优先级");

        self.priority.assign(&mut scheduled);

        // ==========================================
        // 步骤7: 落库 (单事务) 与汇总
        // ==========================================
        debug!("步骤7: 回写排程结果");

        let updated = self
            .repos
            .operations
            .batch_update_schedule(&scheduled, &request.company_id)?;

        let conflicts_detected = scheduled.iter().filter(|op| op.has_conflict).count() as i64;
        let mut work_centers_affected: Vec<String> = scheduled
            .iter()
            .filter_map(|op| op.work_center_id.clone())
            .collect();
        work_centers_affected.sort();
        work_centers_affected.dedup();

        let summary = ScheduleSummary {
            success: true,
            operations_scheduled: updated as i64,
            conflicts_detected,
            work_centers_affected,
            assembly_depth,
        };

        self.append_log(request, &job, &summary)?;

        info!(
            operations_scheduled = summary.operations_scheduled,
            conflicts_detected = summary.conflicts_detected,
            work_centers = summary.work_centers_affected.len(),
            "排产流程完成"
        );
        Ok(summary)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn validate(&self, request: &ScheduleRequest) -> EngineResult<()> {
        if request.job_id.trim().is_empty() {
            return Err(ScheduleError::InvalidInput("job_id 不能为空".to_string()));
        }
        if request.company_id.trim().is_empty() {
            return Err(ScheduleError::InvalidInput(
                "company_id 不能为空".to_string(),
            ));
        }
        if request.user_id.trim().is_empty() {
            return Err(ScheduleError::InvalidInput("user_id 不能为空".to_string()));
        }
        Ok(())
    }

    /// 追加排产动作日志 (审计)
    fn append_log(
        &self,
        request: &ScheduleRequest,
        job: &Job,
        summary: &ScheduleSummary,
    ) -> EngineResult<()> {
        let detail = serde_json::json!({
            "location_id": job.location_id,
            "anchor_due_date": job.due_date.map(|d| d.to_string()),
            "anchor_start_date": job.start_date.map(|d| d.to_string()),
            "assembly_depth": summary.assembly_depth,
            "work_centers_affected": summary.work_centers_affected,
        });

        let entry = ScheduleLogEntry::new(
            &request.job_id,
            &request.company_id,
            &request.user_id,
            request.mode.as_str(),
            request.direction.as_str(),
            summary.operations_scheduled,
            summary.conflicts_detected,
            Some(detail.to_string()),
        );
        self.repos.logs.insert(&entry)?;
        Ok(())
    }
}
