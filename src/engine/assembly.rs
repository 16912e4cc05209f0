// ==========================================
// 车间工单排产系统 - 装配处理器
// ==========================================
// 职责: 组装制造方法树、产生遍历序、推导跨方法依赖边
// 红线: 树只是依赖边的来源;排程只在平铺依赖图上进行
// ==========================================

use crate::domain::method::{AssemblyNode, JobMaterial, MakeMethod};
use crate::domain::operation::JobOperation;
use crate::engine::dependency_builder::DependencyBuilder;
use crate::engine::dependency_graph::DependencyGraph;
use crate::engine::error::{EngineResult, ScheduleError};
use std::collections::{HashMap, HashSet};

// ==========================================
// AssemblyHandler - 装配处理器
// ==========================================
// 无状态引擎,不需要注入依赖
#[derive(Debug, Clone, Copy, Default)]
pub struct AssemblyHandler;

impl AssemblyHandler {
    pub fn new() -> Self {
        Self
    }

    // ==========================================
    // 树组装
    // ==========================================

    /// 组装装配树
    ///
    /// 根 = parent_material_id 为空的方法;
    /// 子方法经由父方法中的物料行挂接 (parent_material_id → 物料行 → 所属方法)。
    ///
    /// # 返回
    /// - `Ok(None)`: 工单没有根方法 (上层按"未找到"处理,计数为 0)
    /// - `Err`: 多根 / 物料链接缺失 / 树中出现环等数据错误
    pub fn build_tree(
        &self,
        methods: &[MakeMethod],
        materials: &HashMap<String, JobMaterial>,
    ) -> EngineResult<Option<AssemblyNode>> {
        let roots: Vec<&MakeMethod> = methods.iter().filter(|m| m.is_root()).collect();
        if roots.is_empty() {
            return Ok(None);
        }
        if roots.len() > 1 {
            return Err(ScheduleError::AssemblyError(format!(
                "工单 {} 存在 {} 个根方法,要求有且仅有一个",
                roots[0].job_id,
                roots.len()
            )));
        }

        // 子方法按父方法分桶 (保持输入顺序)
        let mut children_of: HashMap<String, Vec<&MakeMethod>> = HashMap::new();
        for method in methods.iter().filter(|m| !m.is_root()) {
            let Some(material_id) = method.parent_material_id.as_deref() else {
                continue;
            };
            let material = materials.get(material_id).ok_or_else(|| {
                ScheduleError::AssemblyError(format!(
                    "方法 {} 的父物料链接 {} 不存在",
                    method.method_id, material_id
                ))
            })?;
            children_of
                .entry(material.method_id.clone())
                .or_default()
                .push(method);
        }

        let mut visited = HashSet::new();
        let root = self.attach_children(roots[0], &children_of, &mut visited)?;
        Ok(Some(root))
    }

    fn attach_children(
        &self,
        method: &MakeMethod,
        children_of: &HashMap<String, Vec<&MakeMethod>>,
        visited: &mut HashSet<String>,
    ) -> EngineResult<AssemblyNode> {
        if !visited.insert(method.method_id.clone()) {
            return Err(ScheduleError::AssemblyError(format!(
                "装配树中方法 {} 被重复挂接 (存在环)",
                method.method_id
            )));
        }

        let mut node = AssemblyNode::leaf(method.clone());
        if let Some(children) = children_of.get(&method.method_id) {
            for child in children {
                node.children
                    .push(self.attach_children(child, children_of, visited)?);
            }
        }
        Ok(node)
    }

    // ==========================================
    // 遍历序
    // ==========================================

    /// 后序遍历 (子先父后,供倒排使用)
    pub fn post_order(&self, root: &AssemblyNode) -> Vec<String> {
        let mut order = Vec::new();
        self.walk_post(root, &mut order);
        order
    }

    fn walk_post(&self, node: &AssemblyNode, order: &mut Vec<String>) {
        for child in &node.children {
            self.walk_post(child, order);
        }
        order.push(node.method.method_id.clone());
    }

    /// 前序遍历 (父先子后,供顺排使用)
    pub fn pre_order(&self, root: &AssemblyNode) -> Vec<String> {
        let mut order = Vec::new();
        self.walk_pre(root, &mut order);
        order
    }

    fn walk_pre(&self, node: &AssemblyNode, order: &mut Vec<String>) {
        order.push(node.method.method_id.clone());
        for child in &node.children {
            self.walk_pre(child, order);
        }
    }

    // ==========================================
    // 跨方法依赖边
    // ==========================================

    /// 推导跨方法依赖边并写入图
    ///
    /// 规则: 子方法的每道根工序必须先于"父物料的消耗工序"完成。
    /// 消耗工序取物料行上的 operation_id;无显式链接时,
    /// 子方法改为门控父方法的全部第一秩组工序。
    pub fn build_cross_method_edges(
        &self,
        root: &AssemblyNode,
        ops_by_method: &HashMap<String, Vec<JobOperation>>,
        materials: &HashMap<String, JobMaterial>,
        builder: &DependencyBuilder,
        graph: &mut DependencyGraph,
    ) {
        self.link_node(root, ops_by_method, materials, builder, graph);
    }

    fn link_node(
        &self,
        node: &AssemblyNode,
        ops_by_method: &HashMap<String, Vec<JobOperation>>,
        materials: &HashMap<String, JobMaterial>,
        builder: &DependencyBuilder,
        graph: &mut DependencyGraph,
    ) {
        let empty: Vec<JobOperation> = Vec::new();
        let parent_ops = ops_by_method
            .get(&node.method.method_id)
            .unwrap_or(&empty);

        for child in &node.children {
            let child_ops = ops_by_method
                .get(&child.method.method_id)
                .unwrap_or(&empty);
            let child_roots = builder.root_operations(child_ops);
            if child_roots.is_empty() {
                self.link_node(child, ops_by_method, materials, builder, graph);
                continue;
            }

            // 消耗工序: 物料行上的显式链接,且必须是父方法的可排产工序
            let consuming = child
                .method
                .parent_material_id
                .as_deref()
                .and_then(|material_id| materials.get(material_id))
                .and_then(|material| material.operation_id.as_deref())
                .filter(|op_id| parent_ops.iter().any(|op| op.operation_id == *op_id));

            let targets: Vec<String> = match consuming {
                Some(op_id) => vec![op_id.to_string()],
                None => builder.root_operations(parent_ops),
            };

            for target in &targets {
                for child_root in &child_roots {
                    graph.add_dependency(target, child_root);
                }
            }

            self.link_node(child, ops_by_method, materials, builder, graph);
        }
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    /// 按方法分组工序 (保持输入顺序)
    pub fn group_by_method(
        &self,
        operations: &[JobOperation],
    ) -> HashMap<String, Vec<JobOperation>> {
        let mut grouped: HashMap<String, Vec<JobOperation>> = HashMap::new();
        for op in operations {
            grouped
                .entry(op.method_id.clone())
                .or_default()
                .push(op.clone());
        }
        grouped
    }

    /// 按方法遍历序拼接工序流
    ///
    /// 不在树上的方法 (数据异常) 附加在末尾,保证工序不丢失
    pub fn operations_in_order(
        &self,
        method_order: &[String],
        operations: &[JobOperation],
    ) -> Vec<JobOperation> {
        let on_tree: HashSet<&str> = method_order.iter().map(|s| s.as_str()).collect();
        let grouped = self.group_by_method(operations);

        let mut ordered = Vec::with_capacity(operations.len());
        for method_id in method_order {
            if let Some(ops) = grouped.get(method_id) {
                ordered.extend(ops.iter().cloned());
            }
        }
        for op in operations {
            if !on_tree.contains(op.method_id.as_str()) {
                ordered.push(op.clone());
            }
        }
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{OperationOrderKind, OperationStatus, OperationType};

    fn method(id: &str, parent_material: Option<&str>) -> MakeMethod {
        MakeMethod {
            method_id: id.to_string(),
            job_id: "J1".to_string(),
            company_id: "C1".to_string(),
            parent_material_id: parent_material.map(|s| s.to_string()),
            item_id: format!("ITEM_{}", id),
        }
    }

    fn material(id: &str, method_id: &str, operation_id: Option<&str>) -> JobMaterial {
        JobMaterial {
            material_id: id.to_string(),
            job_id: "J1".to_string(),
            method_id: method_id.to_string(),
            company_id: "C1".to_string(),
            item_id: format!("ITEM_{}", id),
            operation_id: operation_id.map(|s| s.to_string()),
        }
    }

    fn op(id: &str, method_id: &str, order: f64) -> JobOperation {
        JobOperation {
            operation_id: id.to_string(),
            job_id: "J1".to_string(),
            method_id: method_id.to_string(),
            company_id: "C1".to_string(),
            op_order: order,
            operation_order: OperationOrderKind::AfterPrevious,
            operation_type: OperationType::Inside,
            status: OperationStatus::Ready,
            process_id: "P1".to_string(),
            work_center_id: None,
            setup_time: None,
            setup_unit: None,
            labor_time: None,
            labor_unit: None,
            machine_time: None,
            machine_unit: None,
            operation_quantity: None,
            lead_time_days: 0,
            start_date: None,
            due_date: None,
            priority: None,
        }
    }

    fn two_level_fixture() -> (
        Vec<MakeMethod>,
        HashMap<String, JobMaterial>,
        HashMap<String, Vec<JobOperation>>,
    ) {
        // ROOT 消耗 MAT1 (由 CHILD 生产), 消耗工序为 P2
        let methods = vec![method("ROOT", None), method("CHILD", Some("MAT1"))];
        let mut materials = HashMap::new();
        materials.insert("MAT1".to_string(), material("MAT1", "ROOT", Some("P2")));

        let mut ops_by_method = HashMap::new();
        ops_by_method.insert(
            "ROOT".to_string(),
            vec![op("P1", "ROOT", 1.0), op("P2", "ROOT", 2.0)],
        );
        ops_by_method.insert(
            "CHILD".to_string(),
            vec![op("K1", "CHILD", 1.0), op("K2", "CHILD", 2.0)],
        );
        (methods, materials, ops_by_method)
    }

    #[test]
    fn test_build_tree_single_root() {
        let handler = AssemblyHandler::new();
        let (methods, materials, _) = two_level_fixture();

        let tree = handler.build_tree(&methods, &materials).unwrap().unwrap();
        assert_eq!(tree.method.method_id, "ROOT");
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].method.method_id, "CHILD");
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn test_build_tree_no_root() {
        let handler = AssemblyHandler::new();
        let methods = vec![method("A", Some("MAT_X"))];
        let mut materials = HashMap::new();
        materials.insert("MAT_X".to_string(), material("MAT_X", "A", None));

        let tree = handler.build_tree(&methods, &materials).unwrap();
        assert!(tree.is_none());
    }

    #[test]
    fn test_build_tree_multiple_roots_rejected() {
        let handler = AssemblyHandler::new();
        let methods = vec![method("A", None), method("B", None)];
        let err = handler.build_tree(&methods, &HashMap::new()).unwrap_err();
        assert!(matches!(err, ScheduleError::AssemblyError(_)));
    }

    #[test]
    fn test_traversal_orders() {
        let handler = AssemblyHandler::new();
        let (methods, materials, _) = two_level_fixture();
        let tree = handler.build_tree(&methods, &materials).unwrap().unwrap();

        assert_eq!(handler.post_order(&tree), vec!["CHILD", "ROOT"]);
        assert_eq!(handler.pre_order(&tree), vec!["ROOT", "CHILD"]);
    }

    #[test]
    fn test_cross_method_edges_explicit_consuming_operation() {
        let handler = AssemblyHandler::new();
        let builder = DependencyBuilder::new();
        let (methods, materials, ops_by_method) = two_level_fixture();
        let tree = handler.build_tree(&methods, &materials).unwrap().unwrap();

        let mut graph = DependencyGraph::new();
        for ops in [&ops_by_method["CHILD"], &ops_by_method["ROOT"]] {
            builder.build_same_method_edges(ops, &mut graph);
        }
        handler.build_cross_method_edges(&tree, &ops_by_method, &materials, &builder, &mut graph);

        // 子方法根工序 K1 门控消耗工序 P2;K2 不直接门控父方法
        assert!(graph.node("P2").unwrap().depends_on.contains(&"K1".to_string()));
        assert!(!graph.node("P2").unwrap().depends_on.contains(&"K2".to_string()));
        assert!(!graph.node("P1").unwrap().depends_on.contains(&"K1".to_string()));
    }

    #[test]
    fn test_cross_method_edges_fallback_to_rank_one() {
        let handler = AssemblyHandler::new();
        let builder = DependencyBuilder::new();

        // 物料行无显式消耗工序 → 门控父方法第一秩组
        let methods = vec![method("ROOT", None), method("CHILD", Some("MAT1"))];
        let mut materials = HashMap::new();
        materials.insert("MAT1".to_string(), material("MAT1", "ROOT", None));

        let mut ops_by_method = HashMap::new();
        ops_by_method.insert(
            "ROOT".to_string(),
            vec![op("P1", "ROOT", 1.0), op("P2", "ROOT", 2.0)],
        );
        ops_by_method.insert("CHILD".to_string(), vec![op("K1", "CHILD", 1.0)]);

        let tree = handler.build_tree(&methods, &materials).unwrap().unwrap();
        let mut graph = DependencyGraph::new();
        for ops in ops_by_method.values() {
            builder.build_same_method_edges(ops, &mut graph);
        }
        handler.build_cross_method_edges(&tree, &ops_by_method, &materials, &builder, &mut graph);

        assert!(graph.node("P1").unwrap().depends_on.contains(&"K1".to_string()));
        assert!(!graph.node("P2").unwrap().depends_on.contains(&"K1".to_string()));
    }

    #[test]
    fn test_operations_in_order_appends_off_tree() {
        let handler = AssemblyHandler::new();
        let ops = vec![op("A", "M1", 1.0), op("X", "GHOST", 1.0), op("B", "M2", 1.0)];
        let ordered = handler.operations_in_order(
            &["M2".to_string(), "M1".to_string()],
            &ops,
        );
        let ids: Vec<&str> = ordered.iter().map(|o| o.operation_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "X"]);
    }
}
