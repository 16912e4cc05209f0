// ==========================================
// 车间工单排产系统 - 工序依赖图
// ==========================================
// 结构: 工序ID → {depends_on, required_by} 的平铺邻接映射
// 红线: 边对称 (a ∈ depends_on(b) ⇔ b ∈ required_by(a));有环即致命输入错误
// 确定性: 节点按插入顺序参与排序与决胜,结果可复现
// ==========================================

use crate::engine::error::{EngineResult, ScheduleError};
use std::collections::{HashMap, HashSet, VecDeque};

/// 拓扑排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// 正向: 从无前驱节点 (depends_on 为空) 出发
    Forward,
    /// 逆向: 从无后继节点 (required_by 为空) 出发
    Reverse,
}

// ==========================================
// DependencyNode - 依赖图节点
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct DependencyNode {
    pub operation_id: String,
    pub depends_on: Vec<String>,  // 前驱 (去重,保持加入顺序)
    pub required_by: Vec<String>, // 后继 (去重,保持加入顺序)
}

// ==========================================
// DependencyGraph - 工序依赖图
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: HashMap<String, DependencyNode>,
    insertion_order: Vec<String>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 确保节点存在 (孤立工序也要入图)
    pub fn ensure_node(&mut self, operation_id: &str) {
        if !self.nodes.contains_key(operation_id) {
            self.nodes.insert(
                operation_id.to_string(),
                DependencyNode {
                    operation_id: operation_id.to_string(),
                    ..Default::default()
                },
            );
            self.insertion_order.push(operation_id.to_string());
        }
    }

    /// 添加依赖边: operation 依赖 depends_on
    ///
    /// 双侧去重维护,保证边对称
    pub fn add_dependency(&mut self, operation_id: &str, depends_on_id: &str) {
        self.ensure_node(operation_id);
        self.ensure_node(depends_on_id);

        if let Some(node) = self.nodes.get_mut(operation_id) {
            if !node.depends_on.iter().any(|id| id == depends_on_id) {
                node.depends_on.push(depends_on_id.to_string());
            }
        }

        if let Some(dep) = self.nodes.get_mut(depends_on_id) {
            if !dep.required_by.iter().any(|id| id == operation_id) {
                dep.required_by.push(operation_id.to_string());
            }
        }
    }

    pub fn node(&self, operation_id: &str) -> Option<&DependencyNode> {
        self.nodes.get(operation_id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 全部节点ID (插入顺序)
    pub fn operation_ids(&self) -> &[String] {
        &self.insertion_order
    }

    /// 导出全部边 (operation_id, depends_on_id),按插入顺序
    pub fn edges(&self) -> Vec<(String, String)> {
        let mut edges = Vec::new();
        for id in &self.insertion_order {
            if let Some(node) = self.nodes.get(id) {
                for dep in &node.depends_on {
                    edges.push((id.clone(), dep.clone()));
                }
            }
        }
        edges
    }

    /// Kahn 拓扑排序
    ///
    /// # 参数
    /// - `direction`: Forward 从无前驱出发;Reverse 从无后继出发
    ///
    /// # 返回
    /// 线性化的工序ID;输出短于节点数即判环,报告残余集合
    pub fn topological_sort(&self, direction: SortDirection) -> EngineResult<Vec<String>> {
        let mut degree: HashMap<&str, usize> = HashMap::with_capacity(self.nodes.len());
        for id in &self.insertion_order {
            let node = &self.nodes[id];
            let d = match direction {
                SortDirection::Forward => node.depends_on.len(),
                SortDirection::Reverse => node.required_by.len(),
            };
            degree.insert(id.as_str(), d);
        }

        let mut queue: VecDeque<&str> = self
            .insertion_order
            .iter()
            .filter(|id| degree[id.as_str()] == 0)
            .map(|id| id.as_str())
            .collect();

        let mut sorted = Vec::with_capacity(self.nodes.len());
        while let Some(id) = queue.pop_front() {
            sorted.push(id.to_string());

            let node = &self.nodes[id];
            let neighbors = match direction {
                SortDirection::Forward => &node.required_by,
                SortDirection::Reverse => &node.depends_on,
            };
            for next in neighbors {
                if let Some(d) = degree.get_mut(next.as_str()) {
                    *d -= 1;
                    if *d == 0 {
                        queue.push_back(next.as_str());
                    }
                }
            }
        }

        if sorted.len() < self.nodes.len() {
            let emitted: HashSet<&str> = sorted.iter().map(|s| s.as_str()).collect();
            let remaining: Vec<String> = self
                .insertion_order
                .iter()
                .filter(|id| !emitted.contains(id.as_str()))
                .cloned()
                .collect();
            return Err(ScheduleError::CycleDetected { remaining });
        }

        Ok(sorted)
    }
}
