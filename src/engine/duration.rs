// ==========================================
// 车间工单排产系统 - 工时换算引擎
// ==========================================
// 职责: (时间值, 量纲, 数量) → 小时 / 工作日
// 口径: 人工与机时重叠,取大者;准备时间另计
// ==========================================

use crate::domain::operation::JobOperation;
use crate::domain::types::RateUnit;

// ==========================================
// DurationCalculator - 工时换算引擎
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct DurationCalculator {
    hours_per_day: f64,
}

impl DurationCalculator {
    /// 构造函数
    ///
    /// # 参数
    /// - `hours_per_day`: 单个工作日折算的工时数 (必须为正)
    pub fn new(hours_per_day: f64) -> Self {
        debug_assert!(hours_per_day > 0.0);
        Self { hours_per_day }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 按量纲把时间值换算为小时
    ///
    /// 规则:
    /// - 时间值或量纲缺失 → 0
    /// - 件/小时、件/分钟 在 time <= 0 时 → 0 (避免除零)
    pub fn rate_to_hours(time: Option<f64>, unit: Option<RateUnit>, quantity: f64) -> f64 {
        let (Some(time), Some(unit)) = (time, unit) else {
            return 0.0;
        };

        match unit {
            RateUnit::TotalHours => time,
            RateUnit::TotalMinutes => time / 60.0,
            RateUnit::HoursPerPiece => time * quantity,
            RateUnit::HoursPer100Pieces => time * quantity / 100.0,
            RateUnit::HoursPer1000Pieces => time * quantity / 1000.0,
            RateUnit::MinutesPerPiece => time * quantity / 60.0,
            RateUnit::MinutesPer100Pieces => time * quantity / 6000.0,
            RateUnit::MinutesPer1000Pieces => time * quantity / 60_000.0,
            RateUnit::SecondsPerPiece => time * quantity / 3600.0,
            RateUnit::PiecesPerHour => {
                if time <= 0.0 {
                    0.0
                } else {
                    quantity / time
                }
            }
            RateUnit::PiecesPerMinute => {
                if time <= 0.0 {
                    0.0
                } else {
                    quantity / (time * 60.0)
                }
            }
        }
    }

    /// 工序总工时 (小时)
    ///
    /// 口径: 准备 + max(人工, 机时)
    pub fn operation_hours(&self, op: &JobOperation) -> f64 {
        let quantity = op.quantity();
        let setup = Self::rate_to_hours(op.setup_time, op.setup_unit, quantity);
        let labor = Self::rate_to_hours(op.labor_time, op.labor_unit, quantity);
        let machine = Self::rate_to_hours(op.machine_time, op.machine_unit, quantity);
        setup + labor.max(machine)
    }

    /// 工时折算为工作日,向上取整,至少 1 天
    pub fn operation_days(&self, hours: f64) -> i64 {
        let days = (hours / self.hours_per_day).ceil() as i64;
        days.max(1)
    }
}

impl Default for DurationCalculator {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_HOURS_PER_DAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{
        OperationOrderKind, OperationStatus, OperationType,
    };

    fn op_with_times(
        setup: Option<(f64, RateUnit)>,
        labor: Option<(f64, RateUnit)>,
        machine: Option<(f64, RateUnit)>,
        quantity: Option<f64>,
    ) -> JobOperation {
        JobOperation {
            operation_id: "OP1".to_string(),
            job_id: "J1".to_string(),
            method_id: "M1".to_string(),
            company_id: "C1".to_string(),
            op_order: 1.0,
            operation_order: OperationOrderKind::AfterPrevious,
            operation_type: OperationType::Inside,
            status: OperationStatus::Ready,
            process_id: "P1".to_string(),
            work_center_id: None,
            setup_time: setup.map(|(t, _)| t),
            setup_unit: setup.map(|(_, u)| u),
            labor_time: labor.map(|(t, _)| t),
            labor_unit: labor.map(|(_, u)| u),
            machine_time: machine.map(|(t, _)| t),
            machine_unit: machine.map(|(_, u)| u),
            operation_quantity: quantity,
            lead_time_days: 0,
            start_date: None,
            due_date: None,
            priority: None,
        }
    }

    #[test]
    fn test_rate_to_hours_all_units() {
        let q = 120.0;
        assert_eq!(
            DurationCalculator::rate_to_hours(Some(3.0), Some(RateUnit::TotalHours), q),
            3.0
        );
        assert_eq!(
            DurationCalculator::rate_to_hours(Some(30.0), Some(RateUnit::TotalMinutes), q),
            0.5
        );
        assert_eq!(
            DurationCalculator::rate_to_hours(Some(0.5), Some(RateUnit::HoursPerPiece), q),
            60.0
        );
        assert_eq!(
            DurationCalculator::rate_to_hours(Some(2.0), Some(RateUnit::HoursPer100Pieces), q),
            2.4
        );
        assert_eq!(
            DurationCalculator::rate_to_hours(Some(5.0), Some(RateUnit::HoursPer1000Pieces), q),
            0.6
        );
        assert_eq!(
            DurationCalculator::rate_to_hours(Some(3.0), Some(RateUnit::MinutesPerPiece), q),
            6.0
        );
        assert_eq!(
            DurationCalculator::rate_to_hours(Some(30.0), Some(RateUnit::MinutesPer100Pieces), q),
            0.6
        );
        assert_eq!(
            DurationCalculator::rate_to_hours(Some(300.0), Some(RateUnit::MinutesPer1000Pieces), q),
            0.6
        );
        assert_eq!(
            DurationCalculator::rate_to_hours(Some(30.0), Some(RateUnit::SecondsPerPiece), q),
            1.0
        );
        assert_eq!(
            DurationCalculator::rate_to_hours(Some(60.0), Some(RateUnit::PiecesPerHour), q),
            2.0
        );
        assert_eq!(
            DurationCalculator::rate_to_hours(Some(2.0), Some(RateUnit::PiecesPerMinute), q),
            1.0
        );
    }

    #[test]
    fn test_rate_to_hours_missing_inputs() {
        // 时间或量纲缺失 → 0
        assert_eq!(
            DurationCalculator::rate_to_hours(None, Some(RateUnit::TotalHours), 1.0),
            0.0
        );
        assert_eq!(DurationCalculator::rate_to_hours(Some(2.0), None, 1.0), 0.0);
    }

    #[test]
    fn test_rate_to_hours_zero_time_piece_rates() {
        // 件/小时、件/分钟 在 time <= 0 时避免除零
        assert_eq!(
            DurationCalculator::rate_to_hours(Some(0.0), Some(RateUnit::PiecesPerHour), 10.0),
            0.0
        );
        assert_eq!(
            DurationCalculator::rate_to_hours(Some(-1.0), Some(RateUnit::PiecesPerMinute), 10.0),
            0.0
        );
    }

    #[test]
    fn test_operation_hours_setup_plus_max() {
        // 准备 30 分钟 + max(人工 2h/件, 机时 1h/件) × 3 件
        let calc = DurationCalculator::new(8.0);
        let op = op_with_times(
            Some((30.0, RateUnit::TotalMinutes)),
            Some((2.0, RateUnit::HoursPerPiece)),
            Some((1.0, RateUnit::HoursPerPiece)),
            Some(3.0),
        );
        let hours = calc.operation_hours(&op);
        assert!((hours - 6.5).abs() < 1e-9);
        assert_eq!(calc.operation_days(hours), 1);
    }

    #[test]
    fn test_operation_quantity_defaults_to_one() {
        let calc = DurationCalculator::new(8.0);
        let op = op_with_times(None, Some((2.0, RateUnit::HoursPerPiece)), None, None);
        assert_eq!(calc.operation_hours(&op), 2.0);
    }

    #[test]
    fn test_operation_days_rounding() {
        let calc = DurationCalculator::new(8.0);
        assert_eq!(calc.operation_days(0.0), 1); // 至少 1 天
        assert_eq!(calc.operation_days(8.0), 1);
        assert_eq!(calc.operation_days(8.1), 2);
        assert_eq!(calc.operation_days(24.0), 3);
    }
}
