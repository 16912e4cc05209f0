// ==========================================
// 车间工单排产系统 - 工序依赖仓储
// ==========================================
// 职责: 按工单整组替换依赖边集合
// 红线: 替换必须在单个事务中完成 (先删后插,全有或全无)
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// 依赖边: (后道工序, 被依赖的前道工序)
pub type DependencyEdge = (String, String);

// ==========================================
// DependencyRepository - 工序依赖仓储
// ==========================================
pub struct DependencyRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DependencyRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 整组替换工单的依赖边
    ///
    /// # 参数
    /// - `edges`: (operation_id, depends_on_id) 列表
    ///
    /// # 返回
    /// 插入的边数
    pub fn replace_for_job(
        &self,
        job_id: &str,
        company_id: &str,
        edges: &[DependencyEdge],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            "DELETE FROM job_operation_dependency WHERE job_id = ?1 AND company_id = ?2",
            params![job_id, company_id],
        )?;

        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO job_operation_dependency (
                        dependency_id, job_id, company_id, operation_id, depends_on_id,
                        created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, datetime('now'))"#,
            )?;

            for (operation_id, depends_on_id) in edges {
                stmt.execute(params![
                    Uuid::new_v4().to_string(),
                    job_id,
                    company_id,
                    operation_id,
                    depends_on_id,
                ])?;
            }
        }

        tx.commit()?;
        Ok(edges.len())
    }

    /// 查询工单的依赖边 (主要供测试与诊断使用)
    pub fn find_by_job(
        &self,
        job_id: &str,
        company_id: &str,
    ) -> RepositoryResult<Vec<DependencyEdge>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT operation_id, depends_on_id
               FROM job_operation_dependency
               WHERE job_id = ?1 AND company_id = ?2
               ORDER BY operation_id, depends_on_id"#,
        )?;

        let rows = stmt.query_map(params![job_id, company_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut edges = Vec::new();
        for row in rows {
            edges.push(row?);
        }
        Ok(edges)
    }
}
