// ==========================================
// 车间工单排产系统 - 工序仓储
// ==========================================
// 职责: 工序行读取 / 排程结果批量回写 / 机台负荷聚合
// 红线: DONE / CANCELED 行在读取与回写两侧都被排除
// ==========================================

use crate::domain::operation::{JobOperation, ScheduledOperation};
use crate::domain::types::{
    OperationOrderKind, OperationStatus, OperationType, RateUnit,
};
use crate::repository::db_utils::{
    date_to_db, opt_date_to_db, parse_enum_field, parse_opt_date, parse_opt_enum_field,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// OperationRepository - 工序仓储
// ==========================================
pub struct OperationRepository {
    conn: Arc<Mutex<Connection>>,
}

/// 工序原始行 (枚举/日期在闭包外转换)
struct OperationRow {
    operation_id: String,
    job_id: String,
    method_id: String,
    company_id: String,
    op_order: f64,
    operation_order: String,
    operation_type: String,
    status: String,
    process_id: String,
    work_center_id: Option<String>,
    setup_time: Option<f64>,
    setup_unit: Option<String>,
    labor_time: Option<f64>,
    labor_unit: Option<String>,
    machine_time: Option<f64>,
    machine_unit: Option<String>,
    operation_quantity: Option<f64>,
    lead_time_days: Option<i64>,
    start_date: Option<String>,
    due_date: Option<String>,
    priority: Option<i64>,
}

impl OperationRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询工单的可排产工序 (排除终态)
    ///
    /// 排序: 方法 → 方法内序号 → 工序ID,保证建图顺序可复现
    pub fn find_schedulable_by_job(
        &self,
        job_id: &str,
        company_id: &str,
    ) -> RepositoryResult<Vec<JobOperation>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT operation_id, job_id, method_id, company_id, op_order,
                      operation_order, operation_type, status, process_id, work_center_id,
                      setup_time, setup_unit, labor_time, labor_unit,
                      machine_time, machine_unit, operation_quantity,
                      lead_time_days, start_date, due_date, priority
               FROM job_operation
               WHERE job_id = ?1 AND company_id = ?2
                 AND status NOT IN ('DONE', 'CANCELED')
               ORDER BY method_id, op_order, operation_id"#,
        )?;

        let rows = stmt.query_map(params![job_id, company_id], |row| {
            Ok(OperationRow {
                operation_id: row.get(0)?,
                job_id: row.get(1)?,
                method_id: row.get(2)?,
                company_id: row.get(3)?,
                op_order: row.get(4)?,
                operation_order: row.get(5)?,
                operation_type: row.get(6)?,
                status: row.get(7)?,
                process_id: row.get(8)?,
                work_center_id: row.get(9)?,
                setup_time: row.get(10)?,
                setup_unit: row.get(11)?,
                labor_time: row.get(12)?,
                labor_unit: row.get(13)?,
                machine_time: row.get(14)?,
                machine_unit: row.get(15)?,
                operation_quantity: row.get(16)?,
                lead_time_days: row.get(17)?,
                start_date: row.get(18)?,
                due_date: row.get(19)?,
                priority: row.get(20)?,
            })
        })?;

        let mut operations = Vec::new();
        for row in rows {
            operations.push(Self::convert_row(row?)?);
        }
        Ok(operations)
    }

    /// 批量回写排程结果
    ///
    /// # 红线
    /// - 必须在单个事务中完成 (全有或全无)
    /// - 终态工序即使混入也不会被改写 (WHERE 再次过滤)
    pub fn batch_update_schedule(
        &self,
        operations: &[ScheduledOperation],
        company_id: &str,
    ) -> RepositoryResult<usize> {
        if operations.is_empty() {
            return Ok(0);
        }

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let mut updated = 0usize;

        {
            let mut stmt = tx.prepare(
                r#"UPDATE job_operation
                   SET start_date = ?1, due_date = ?2, work_center_id = ?3,
                       priority = ?4, duration_hours = ?5, duration_days = ?6,
                       has_conflict = ?7, conflict_reason = ?8,
                       updated_at = datetime('now')
                   WHERE operation_id = ?9 AND company_id = ?10
                     AND status NOT IN ('DONE', 'CANCELED')"#,
            )?;

            for op in operations {
                updated += stmt.execute(params![
                    opt_date_to_db(op.start_date),
                    opt_date_to_db(op.due_date),
                    &op.work_center_id,
                    op.priority,
                    op.duration_hours,
                    op.duration_days,
                    if op.has_conflict { 1 } else { 0 },
                    &op.conflict_reason,
                    &op.operation_id,
                    company_id,
                ])?;
            }
        }

        tx.commit()?;
        Ok(updated)
    }

    /// 机台在途负荷聚合 (小时)
    ///
    /// 口径: 非终态工序,开工日期为空或不晚于 cutoff
    pub fn aggregate_load_hours(
        &self,
        work_center_id: &str,
        cutoff: NaiveDate,
        company_id: &str,
    ) -> RepositoryResult<f64> {
        let conn = self.get_conn()?;

        let load: f64 = conn.query_row(
            r#"SELECT COALESCE(SUM(duration_hours), 0.0)
               FROM job_operation
               WHERE work_center_id = ?1 AND company_id = ?2
                 AND status NOT IN ('DONE', 'CANCELED')
                 AND (start_date IS NULL OR start_date <= ?3)"#,
            params![work_center_id, company_id, date_to_db(cutoff)],
            |row| row.get(0),
        )?;

        Ok(load)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn convert_row(row: OperationRow) -> RepositoryResult<JobOperation> {
        Ok(JobOperation {
            operation_order: parse_enum_field(
                &row.operation_order,
                "job_operation.operation_order",
                OperationOrderKind::from_str,
            )?,
            operation_type: parse_enum_field(
                &row.operation_type,
                "job_operation.operation_type",
                OperationType::from_str,
            )?,
            status: parse_enum_field(
                &row.status,
                "job_operation.status",
                OperationStatus::from_str,
            )?,
            setup_unit: parse_opt_enum_field(
                row.setup_unit,
                "job_operation.setup_unit",
                RateUnit::from_str,
            )?,
            labor_unit: parse_opt_enum_field(
                row.labor_unit,
                "job_operation.labor_unit",
                RateUnit::from_str,
            )?,
            machine_unit: parse_opt_enum_field(
                row.machine_unit,
                "job_operation.machine_unit",
                RateUnit::from_str,
            )?,
            start_date: parse_opt_date(row.start_date, "job_operation.start_date")?,
            due_date: parse_opt_date(row.due_date, "job_operation.due_date")?,
            operation_id: row.operation_id,
            job_id: row.job_id,
            method_id: row.method_id,
            company_id: row.company_id,
            op_order: row.op_order,
            process_id: row.process_id,
            work_center_id: row.work_center_id,
            setup_time: row.setup_time,
            labor_time: row.labor_time,
            machine_time: row.machine_time,
            operation_quantity: row.operation_quantity,
            lead_time_days: row.lead_time_days.unwrap_or(0),
            priority: row.priority,
        })
    }
}
