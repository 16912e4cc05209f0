// ==========================================
// 车间工单排产系统 - 制造方法仓储
// ==========================================
// 职责: 装配树节点与物料链接的读取
// 红线: Repository 不含业务逻辑,树的组装在引擎层完成
// ==========================================

use crate::domain::method::{JobMaterial, MakeMethod};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// MakeMethodRepository - 制造方法仓储
// ==========================================
pub struct MakeMethodRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MakeMethodRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询工单的全部制造方法
    ///
    /// 按 method_id 排序,保证树组装顺序可复现
    pub fn find_by_job(&self, job_id: &str, company_id: &str) -> RepositoryResult<Vec<MakeMethod>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT method_id, job_id, company_id, parent_material_id, item_id
               FROM make_method
               WHERE job_id = ?1 AND company_id = ?2
               ORDER BY method_id"#,
        )?;

        let rows = stmt.query_map(params![job_id, company_id], |row| {
            Ok(MakeMethod {
                method_id: row.get(0)?,
                job_id: row.get(1)?,
                company_id: row.get(2)?,
                parent_material_id: row.get(3)?,
                item_id: row.get(4)?,
            })
        })?;

        let mut methods = Vec::new();
        for row in rows {
            methods.push(row?);
        }
        Ok(methods)
    }

    /// 查询工单的全部物料链接
    pub fn find_materials_by_job(
        &self,
        job_id: &str,
        company_id: &str,
    ) -> RepositoryResult<Vec<JobMaterial>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT material_id, job_id, method_id, company_id, item_id, operation_id
               FROM job_material
               WHERE job_id = ?1 AND company_id = ?2
               ORDER BY material_id"#,
        )?;

        let rows = stmt.query_map(params![job_id, company_id], |row| {
            Ok(JobMaterial {
                material_id: row.get(0)?,
                job_id: row.get(1)?,
                method_id: row.get(2)?,
                company_id: row.get(3)?,
                item_id: row.get(4)?,
                operation_id: row.get(5)?,
            })
        })?;

        let mut materials = Vec::new();
        for row in rows {
            materials.push(row?);
        }
        Ok(materials)
    }
}
