// ==========================================
// 车间工单排产系统 - 工艺与机台仓储
// ==========================================
// 职责: 工艺能力 (含候选机台 JSON 数组) 与启用机台的读取
// ==========================================

use crate::domain::resource::{Process, WorkCenter};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// ResourceRepository - 工艺与机台仓储
// ==========================================
pub struct ResourceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ResourceRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询公司的全部工艺能力
    ///
    /// work_center_ids 列为 JSON 数组文本,保持声明顺序
    pub fn find_processes(&self, company_id: &str) -> RepositoryResult<Vec<Process>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT process_id, company_id, process_name, work_center_ids
               FROM process
               WHERE company_id = ?1
               ORDER BY process_id"#,
        )?;

        let rows = stmt.query_map(params![company_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut processes = Vec::new();
        for row in rows {
            let (process_id, company_id, process_name, raw_ids) = row?;
            let work_center_ids: Vec<String> =
                serde_json::from_str(&raw_ids).map_err(|e| RepositoryError::FieldValueError {
                    field: "process.work_center_ids".to_string(),
                    message: format!("JSON 解析失败 (process_id={}): {}", process_id, e),
                })?;
            processes.push(Process {
                process_id,
                company_id,
                process_name,
                work_center_ids,
            });
        }
        Ok(processes)
    }

    /// 查询指定地点的启用机台
    pub fn find_active_work_centers(
        &self,
        company_id: &str,
        location_id: &str,
    ) -> RepositoryResult<Vec<WorkCenter>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT work_center_id, company_id, location_id, work_center_name, active
               FROM work_center
               WHERE company_id = ?1 AND location_id = ?2 AND active = 1
               ORDER BY work_center_id"#,
        )?;

        let rows = stmt.query_map(params![company_id, location_id], |row| {
            Ok(WorkCenter {
                work_center_id: row.get(0)?,
                company_id: row.get(1)?,
                location_id: row.get(2)?,
                work_center_name: row.get(3)?,
                active: row.get::<_, i64>(4)? != 0,
            })
        })?;

        let mut centers = Vec::new();
        for row in rows {
            centers.push(row?);
        }
        Ok(centers)
    }
}
