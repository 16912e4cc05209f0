// ==========================================
// 车间工单排产系统 - 方法内依赖构建器
// ==========================================
// 职责: 从工序序号与 WITH_PREVIOUS 标记推导同方法依赖边
// 算法: 调整秩分组 — 并行工序继承最近一道非并行工序的秩,
//       相邻秩组之间两两连边,组内互不连边
// ==========================================

use crate::domain::operation::JobOperation;
use crate::domain::types::OperationOrderKind;
use crate::engine::dependency_graph::DependencyGraph;
use std::collections::BTreeMap;

// ==========================================
// DependencyBuilder - 方法内依赖构建器
// ==========================================
// 无状态引擎,不需要注入依赖
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyBuilder;

impl DependencyBuilder {
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 按调整秩分组 (组按秩升序,组内保持序号顺序)
    ///
    /// 规则:
    /// 1) 按 op_order 升序 (同序号按工序ID决胜,保证可复现)
    /// 2) WITH_PREVIOUS 继承往前最近一道非 WITH_PREVIOUS 工序的秩;
    ///    无此前驱时取 1
    /// 3) 其余工序取自身序列位置 (1 起)
    pub fn adjusted_rank_groups(&self, operations: &[JobOperation]) -> Vec<Vec<String>> {
        if operations.is_empty() {
            return Vec::new();
        }

        let mut ordered: Vec<&JobOperation> = operations.iter().collect();
        ordered.sort_by(|a, b| {
            a.op_order
                .total_cmp(&b.op_order)
                .then_with(|| a.operation_id.cmp(&b.operation_id))
        });

        let mut ranks: Vec<usize> = Vec::with_capacity(ordered.len());
        for (i, op) in ordered.iter().enumerate() {
            let rank = if op.operation_order == OperationOrderKind::WithPrevious {
                // 向后回溯最近一道非并行工序
                (0..i)
                    .rev()
                    .find(|&j| {
                        ordered[j].operation_order != OperationOrderKind::WithPrevious
                    })
                    .map(|j| ranks[j])
                    .unwrap_or(1)
            } else {
                i + 1
            };
            ranks.push(rank);
        }

        let mut groups: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for (op, rank) in ordered.iter().zip(ranks.iter()) {
            groups
                .entry(*rank)
                .or_default()
                .push(op.operation_id.clone());
        }

        groups.into_values().collect()
    }

    /// 推导同方法依赖边并写入图
    ///
    /// 相邻秩组之间: 后组每道工序依赖前组每道工序
    pub fn build_same_method_edges(
        &self,
        operations: &[JobOperation],
        graph: &mut DependencyGraph,
    ) {
        for op in operations {
            graph.ensure_node(&op.operation_id);
        }

        let groups = self.adjusted_rank_groups(operations);
        for window in groups.windows(2) {
            let (previous, current) = (&window[0], &window[1]);
            for op_id in current {
                for dep_id in previous {
                    graph.add_dependency(op_id, dep_id);
                }
            }
        }
    }

    /// 方法内的根工序 (无同方法前驱,即第一秩组)
    pub fn root_operations(&self, operations: &[JobOperation]) -> Vec<String> {
        self.adjusted_rank_groups(operations)
            .into_iter()
            .next()
            .unwrap_or_default()
    }
}
