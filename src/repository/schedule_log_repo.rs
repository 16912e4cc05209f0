// ==========================================
// 车间工单排产系统 - 排产动作日志仓储
// ==========================================
// 职责: 每次成功的排产调用追加一条审计记录
// 红线: 日志只追加,不修改
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// 排产动作日志条目
#[derive(Debug, Clone)]
pub struct ScheduleLogEntry {
    pub log_id: String,
    pub job_id: String,
    pub company_id: String,
    pub user_id: String,
    pub mode: String,
    pub direction: String,
    pub operations_scheduled: i64,
    pub conflicts_detected: i64,
    pub detail_json: Option<String>,
}

impl ScheduleLogEntry {
    /// 生成带新ID的日志条目
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        job_id: &str,
        company_id: &str,
        user_id: &str,
        mode: &str,
        direction: &str,
        operations_scheduled: i64,
        conflicts_detected: i64,
        detail_json: Option<String>,
    ) -> Self {
        Self {
            log_id: Uuid::new_v4().to_string(),
            job_id: job_id.to_string(),
            company_id: company_id.to_string(),
            user_id: user_id.to_string(),
            mode: mode.to_string(),
            direction: direction.to_string(),
            operations_scheduled,
            conflicts_detected,
            detail_json,
        }
    }
}

// ==========================================
// ScheduleLogRepository - 排产动作日志仓储
// ==========================================
pub struct ScheduleLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ScheduleLogRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 追加日志条目
    pub fn insert(&self, entry: &ScheduleLogEntry) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO schedule_log (
                    log_id, job_id, company_id, user_id, mode, direction,
                    operations_scheduled, conflicts_detected, detail_json, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, datetime('now'))"#,
            params![
                &entry.log_id,
                &entry.job_id,
                &entry.company_id,
                &entry.user_id,
                &entry.mode,
                &entry.direction,
                entry.operations_scheduled,
                entry.conflicts_detected,
                &entry.detail_json,
            ],
        )?;

        Ok(())
    }

    /// 查询工单的日志条数 (测试与诊断用)
    pub fn count_by_job(&self, job_id: &str, company_id: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM schedule_log WHERE job_id = ?1 AND company_id = ?2",
            params![job_id, company_id],
            |row| row.get(0),
        )?;

        Ok(count)
    }
}
