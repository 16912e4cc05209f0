// ==========================================
// 车间工单排产系统 - 工作日历
// ==========================================
// 默认口径: 周一至周五,无节假日
// 零天位移原样返回 (即使落在周末也不挪动)
// ==========================================

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// 工作日判定接口 (可注入自定义日历)
pub trait CalendarProvider: Send + Sync {
    fn is_working_day(&self, date: NaiveDate) -> bool;
}

// ==========================================
// WeekdayCalendar - 周一至周五默认日历
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekdayCalendar;

impl CalendarProvider for WeekdayCalendar {
    fn is_working_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

/// 向后加 N 个工作日
///
/// days <= 0 时原样返回输入日期
pub fn add_business_days<C: CalendarProvider>(
    calendar: &C,
    date: NaiveDate,
    days: i64,
) -> NaiveDate {
    if days <= 0 {
        return date;
    }

    let mut current = date;
    let mut remaining = days;
    while remaining > 0 {
        current = current + Duration::days(1);
        if calendar.is_working_day(current) {
            remaining -= 1;
        }
    }
    current
}

/// 向前减 N 个工作日
///
/// days <= 0 时原样返回输入日期
pub fn subtract_business_days<C: CalendarProvider>(
    calendar: &C,
    date: NaiveDate,
    days: i64,
) -> NaiveDate {
    if days <= 0 {
        return date;
    }

    let mut current = date;
    let mut remaining = days;
    while remaining > 0 {
        current = current - Duration::days(1);
        if calendar.is_working_day(current) {
            remaining -= 1;
        }
    }
    current
}

/// ISO 日期格式化 (YYYY-MM-DD)
pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
