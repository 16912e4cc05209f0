// ==========================================
// 车间工单排产系统 - 工单头仓储
// ==========================================

use crate::domain::job::Job;
use crate::domain::types::DeadlineType;
use crate::repository::db_utils::parse_opt_date;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

// ==========================================
// JobRepository - 工单头仓储
// ==========================================
pub struct JobRepository {
    conn: Arc<Mutex<Connection>>,
}

/// 工单头原始行 (枚举/日期在闭包外转换)
struct JobRow {
    job_id: String,
    company_id: String,
    location_id: Option<String>,
    job_priority: Option<i64>,
    deadline_type: Option<String>,
    start_date: Option<String>,
    due_date: Option<String>,
}

impl JobRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询工单头 (公司范围内)
    pub fn find_by_id(&self, job_id: &str, company_id: &str) -> RepositoryResult<Option<Job>> {
        let conn = self.get_conn()?;

        let row = conn
            .query_row(
                r#"SELECT job_id, company_id, location_id, job_priority,
                          deadline_type, start_date, due_date
                   FROM job
                   WHERE job_id = ?1 AND company_id = ?2"#,
                params![job_id, company_id],
                |row| {
                    Ok(JobRow {
                        job_id: row.get(0)?,
                        company_id: row.get(1)?,
                        location_id: row.get(2)?,
                        job_priority: row.get(3)?,
                        deadline_type: row.get(4)?,
                        start_date: row.get(5)?,
                        due_date: row.get(6)?,
                    })
                },
            )
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(Job {
            start_date: parse_opt_date(row.start_date, "job.start_date")?,
            due_date: parse_opt_date(row.due_date, "job.due_date")?,
            deadline_type: row
                .deadline_type
                .map(|s| DeadlineType::from_str(&s))
                .unwrap_or(DeadlineType::NoDeadline),
            job_id: row.job_id,
            company_id: row.company_id,
            location_id: row.location_id,
            job_priority: row.job_priority,
        }))
    }
}
