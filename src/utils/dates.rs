use crate::error::{AppError, AppResult};
use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, TimeZone, Utc};

/// 把日历日钉在当天 12:00 UTC
///
/// 所有课程日期入库前都走这一步：固定正午使日历日在任何客户端时区下都不会漂移。
pub fn midday_utc(date: NaiveDate) -> DateTime<Utc> {
    let noon = date
        .and_hms_opt(12, 0, 0)
        .expect("12:00:00 exists on every calendar day");
    Utc.from_utc_datetime(&noon)
}

/// 取时间戳自带时区下的挂钟日历日，再钉到 12:00 UTC
pub fn normalize_midday<Tz: TimeZone>(dt: DateTime<Tz>) -> DateTime<Utc> {
    midday_utc(dt.date_naive())
}

/// 解析课程日期：裸 `YYYY-MM-DD` 或 RFC 3339 时间戳
///
/// 裸日期直接按 NaiveDate 解析后钉正午 UTC——绝不先构造本地时间再平移，
/// 那个顺序在不同宿主时区下会把日历日挪走一天。
pub fn parse_lesson_date(input: &str) -> AppResult<DateTime<Utc>> {
    let trimmed = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(midday_utc(date));
    }

    let dt = DateTime::parse_from_rfc3339(trimmed).map_err(|_| {
        AppError::ValidationError(format!(
            "Invalid date '{trimmed}' (expected YYYY-MM-DD or RFC 3339)"
        ))
    })?;
    Ok(normalize_midday(dt))
}

/// UTC 日历日粒度比较
pub fn same_calendar_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}

pub fn start_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// 给定时刻所在 UTC 月份的 [起, 止) 区间，供统计查询使用
pub fn month_bounds_utc(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let today = now.date_naive();
    let first = today - Days::new(today.day0() as u64);
    let next = first + Months::new(1);
    (start_of_day_utc(first), start_of_day_utc(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_bare_date_pins_to_midday_utc() {
        // 宿主时区无关：解析过程不经过本地时间
        let dt = parse_lesson_date("2025-07-03").unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 7, 3).unwrap());
        assert_eq!(dt.hour(), 12);
        assert_eq!(dt.minute(), 0);
        assert_eq!(dt.second(), 0);
        assert_eq!(dt.to_rfc3339(), "2025-07-03T12:00:00+00:00");
    }

    #[test]
    fn test_timestamp_keeps_wall_clock_day_negative_offset() {
        // UTC-8 的深夜，UTC 瞬时已是 7 月 4 日，但挂钟日仍是 7 月 3 日
        let dt = parse_lesson_date("2025-07-03T23:30:00-08:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-07-03T12:00:00+00:00");
    }

    #[test]
    fn test_timestamp_keeps_wall_clock_day_positive_offset() {
        // UTC+14 的凌晨，UTC 瞬时还在 7 月 3 日，挂钟日已是 7 月 4 日
        let dt = parse_lesson_date("2025-07-04T00:30:00+14:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-07-04T12:00:00+00:00");
    }

    #[test]
    fn test_utc_12_boundary() {
        let dt = parse_lesson_date("2025-07-03T00:10:00-12:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-07-03T12:00:00+00:00");
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(parse_lesson_date("").is_err());
        assert!(parse_lesson_date("03/07/2025").is_err());
        assert!(parse_lesson_date("2025-13-40").is_err());
        assert!(parse_lesson_date("not a date").is_err());
    }

    #[test]
    fn test_month_bounds_utc() {
        let now = Utc.with_ymd_and_hms(2025, 7, 15, 8, 30, 0).unwrap();
        let (start, end) = month_bounds_utc(now);
        assert_eq!(start.to_rfc3339(), "2025-07-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-08-01T00:00:00+00:00");

        // 跨年
        let december = Utc.with_ymd_and_hms(2025, 12, 31, 23, 0, 0).unwrap();
        let (start, end) = month_bounds_utc(december);
        assert_eq!(start.to_rfc3339(), "2025-12-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2026-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_same_calendar_day() {
        let a = midday_utc(NaiveDate::from_ymd_opt(2025, 7, 3).unwrap());
        let b = Utc.with_ymd_and_hms(2025, 7, 3, 23, 59, 59).unwrap();
        let c = midday_utc(NaiveDate::from_ymd_opt(2025, 7, 4).unwrap());
        assert!(same_calendar_day(a, b));
        assert!(!same_calendar_day(a, c));
    }
}
