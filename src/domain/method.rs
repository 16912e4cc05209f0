// ==========================================
// 车间工单排产系统 - 制造方法与装配树
// ==========================================
// MakeMethod: 装配树节点行 (parent_material_id 为空即根)
// JobMaterial: 父方法消耗子装配的物料链接
// AssemblyNode: 内存值类型装配树 (仅子指针,无回指)
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// MakeMethod - 制造方法
// ==========================================
// 红线: 每张工单有且仅有一个根方法
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MakeMethod {
    pub method_id: String,                   // 方法ID
    pub job_id: String,                      // 所属工单
    pub company_id: String,                  // 公司范围
    pub parent_material_id: Option<String>,  // 父物料链接 (空为根)
    pub item_id: String,                     // 产出物料
}

impl MakeMethod {
    pub fn is_root(&self) -> bool {
        self.parent_material_id.is_none()
    }
}

// ==========================================
// JobMaterial - 工单物料链接
// ==========================================
// 子方法经由父方法中的物料行挂接;
// operation_id 标记消耗该物料的工序 (可空)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMaterial {
    pub material_id: String,          // 物料行ID
    pub job_id: String,               // 所属工单
    pub method_id: String,            // 所属(消耗方)制造方法
    pub company_id: String,           // 公司范围
    pub item_id: String,              // 物料
    pub operation_id: Option<String>, // 消耗工序 (可空)
}

// ==========================================
// AssemblyNode - 装配树节点 (值类型)
// ==========================================
// 树只是依赖边的来源;排程只在平铺的依赖图上进行
#[derive(Debug, Clone)]
pub struct AssemblyNode {
    pub method: MakeMethod,
    pub children: Vec<AssemblyNode>,
}

impl AssemblyNode {
    pub fn leaf(method: MakeMethod) -> Self {
        Self {
            method,
            children: Vec::new(),
        }
    }

    /// 装配深度: 叶子为 1,父节点为 1 + max(子深度)
    pub fn depth(&self) -> i64 {
        1 + self
            .children
            .iter()
            .map(|c| c.depth())
            .max()
            .unwrap_or(0)
    }
}
