use crate::entities::ClassStatus;
use crate::utils::dates::same_calendar_day;
use chrono::{DateTime, Duration, Utc};

/// 付款与课程的排期/对账核心
///
/// 规则:
/// 1. 账期 [start, end] 自 start 起按 7 天一步生成课程日，超过 end 即停
/// 2. 账期变更时只删 not_started 的课程；其余状态视为已处理，原样保留
/// 3. 新日期序列剔除与保留课程同日历日的日期，避免同一天出现重复课程
/// 4. 显式日期列表是独立对账模式：删光 not_started，按列表整批重建
///
/// 这里只做纯计算；真正的删除/插入由 PaymentService 按先删后插的顺序执行。

/// 对账所需的现有课程快照
#[derive(Debug, Clone)]
pub struct ExistingClass {
    pub id: i64,
    pub date: DateTime<Utc>,
    pub status: ClassStatus,
}

/// 对账计划：待物理删除的课程 id 与待批量插入的课程日
#[derive(Debug, Clone, Default)]
pub struct ReconcilePlan {
    pub delete_ids: Vec<i64>,
    pub insert_dates: Vec<DateTime<Utc>>,
}

impl ReconcilePlan {
    pub fn is_noop(&self) -> bool {
        self.delete_ids.is_empty() && self.insert_dates.is_empty()
    }
}

/// 自 start 起每 7 天一节课，含头，超过 end 为止；start > end 时为空
pub fn weekly_dates(start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        current += Duration::days(7);
    }
    dates
}

/// 课程日期来源选择：显式列表优先，其次按账期每周生成，二者皆缺为空
///
/// 结果为空时调用方必须拒绝创建缴费，不允许存在没有课程的缴费。
pub fn resolve_class_dates(
    explicit: Option<&[DateTime<Utc>]>,
    billing_start: Option<DateTime<Utc>>,
    billing_end: Option<DateTime<Utc>>,
) -> Vec<DateTime<Utc>> {
    match explicit {
        Some(dates) => dates.to_vec(),
        None => match (billing_start, billing_end) {
            (Some(start), Some(end)) => weekly_dates(start, end),
            _ => Vec::new(),
        },
    }
}

/// 账期是否变化，按日历日粒度比较，None 感知
pub fn billing_period_changed(
    prev_start: Option<DateTime<Utc>>,
    prev_end: Option<DateTime<Utc>>,
    next_start: Option<DateTime<Utc>>,
    next_end: Option<DateTime<Utc>>,
) -> bool {
    fn day(d: Option<DateTime<Utc>>) -> Option<chrono::NaiveDate> {
        d.map(|d| d.date_naive())
    }
    day(prev_start) != day(next_start) || day(prev_end) != day(next_end)
}

/// 账期变更后的对账计划
///
/// not_started 的课程全部列入删除；其余保留。新序列中与任一保留课程
/// 同日历日的日期被剔除——那一天已经有被处理过的课程了。
pub fn plan_period_change(
    existing: &[ExistingClass],
    new_start: DateTime<Utc>,
    new_end: DateTime<Utc>,
) -> ReconcilePlan {
    let delete_ids = existing
        .iter()
        .filter(|c| c.status == ClassStatus::NotStarted)
        .map(|c| c.id)
        .collect();

    let untouched: Vec<&ExistingClass> = existing
        .iter()
        .filter(|c| c.status != ClassStatus::NotStarted)
        .collect();

    let insert_dates = weekly_dates(new_start, new_end)
        .into_iter()
        .filter(|candidate| {
            !untouched
                .iter()
                .any(|kept| same_calendar_day(kept.date, *candidate))
        })
        .collect();

    ReconcilePlan {
        delete_ids,
        insert_dates,
    }
}

/// 显式日期列表模式：与账期是否变化无关
pub fn plan_explicit_dates(existing: &[ExistingClass], dates: &[DateTime<Utc>]) -> ReconcilePlan {
    ReconcilePlan {
        delete_ids: existing
            .iter()
            .filter(|c| c.status == ClassStatus::NotStarted)
            .map(|c| c.id)
            .collect(),
        insert_dates: dates.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::dates::midday_utc;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        midday_utc(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_weekly_count_formula() {
        // 生成数恒等于 floor((end-start)/7天) + 1
        let cases = [
            (day(2025, 6, 20), day(2025, 6, 20), 1),
            (day(2025, 6, 20), day(2025, 6, 26), 1),
            (day(2025, 6, 20), day(2025, 6, 27), 2),
            (day(2025, 6, 20), day(2025, 7, 11), 4),
            (day(2025, 1, 1), day(2025, 12, 31), 53),
        ];
        for (start, end, expected) in cases {
            let dates = weekly_dates(start, end);
            assert_eq!(dates.len(), expected, "{start} ~ {end}");
            let formula = (end - start).num_days() / 7 + 1;
            assert_eq!(dates.len() as i64, formula);
            assert_eq!(dates[0], start);
            for pair in dates.windows(2) {
                assert_eq!((pair[1] - pair[0]).num_days(), 7);
            }
        }
    }

    #[test]
    fn test_weekly_empty_when_start_after_end() {
        assert!(weekly_dates(day(2025, 7, 12), day(2025, 7, 11)).is_empty());
    }

    #[test]
    fn test_four_weekly_classes_scenario() {
        let dates = weekly_dates(day(2025, 6, 20), day(2025, 7, 11));
        assert_eq!(
            dates,
            vec![
                day(2025, 6, 20),
                day(2025, 6, 27),
                day(2025, 7, 4),
                day(2025, 7, 11),
            ]
        );
    }

    #[test]
    fn test_resolve_class_dates_prefers_explicit_list() {
        let supplied = vec![day(2025, 8, 1), day(2025, 8, 15)];
        let dates = resolve_class_dates(
            Some(&supplied),
            Some(day(2025, 6, 20)),
            Some(day(2025, 7, 11)),
        );
        assert_eq!(dates, supplied);
    }

    #[test]
    fn test_resolve_class_dates_zero_outcomes() {
        // 这些输入都得不到任何课程日
        assert!(resolve_class_dates(None, None, None).is_empty());
        assert!(resolve_class_dates(None, Some(day(2025, 6, 20)), None).is_empty());
        assert!(resolve_class_dates(None, None, Some(day(2025, 7, 11))).is_empty());
        assert!(resolve_class_dates(Some(&[]), Some(day(2025, 6, 20)), Some(day(2025, 7, 11))).is_empty());
        assert!(resolve_class_dates(None, Some(day(2025, 7, 12)), Some(day(2025, 7, 11))).is_empty());
    }

    #[test]
    fn test_period_unchanged_detection() {
        // 同一天不同钟点不算变化
        let noon = day(2025, 6, 20);
        let evening = noon + Duration::hours(9);
        assert!(!billing_period_changed(
            Some(noon),
            Some(day(2025, 7, 11)),
            Some(evening),
            Some(day(2025, 7, 11)),
        ));
        assert!(billing_period_changed(
            Some(noon),
            Some(day(2025, 7, 11)),
            Some(noon),
            Some(day(2025, 7, 25)),
        ));
        // None -> Some 属于变化
        assert!(billing_period_changed(None, None, Some(noon), Some(noon)));
        assert!(!billing_period_changed(None, None, None, None));
    }

    #[test]
    fn test_extend_period_keeps_existing_days() {
        // 账期从 07-11 延长到 07-25，没有任何课被上过:
        // 4 门旧课全删，重建 6 门，日期为原 4 天加 07-18、07-25
        let existing: Vec<ExistingClass> = weekly_dates(day(2025, 6, 20), day(2025, 7, 11))
            .into_iter()
            .enumerate()
            .map(|(i, date)| ExistingClass {
                id: i as i64 + 1,
                date,
                status: ClassStatus::NotStarted,
            })
            .collect();

        let plan = plan_period_change(&existing, day(2025, 6, 20), day(2025, 7, 25));
        assert_eq!(plan.delete_ids, vec![1, 2, 3, 4]);
        assert_eq!(
            plan.insert_dates,
            vec![
                day(2025, 6, 20),
                day(2025, 6, 27),
                day(2025, 7, 4),
                day(2025, 7, 11),
                day(2025, 7, 18),
                day(2025, 7, 25),
            ]
        );
    }

    #[test]
    fn test_taken_class_survives_period_shift() {
        // 07-04 已上课，账期起点右移一周:
        // taken 不删；新序列中与 07-04 同日的候选被剔除
        let mut existing: Vec<ExistingClass> = weekly_dates(day(2025, 6, 20), day(2025, 7, 11))
            .into_iter()
            .enumerate()
            .map(|(i, date)| ExistingClass {
                id: i as i64 + 1,
                date,
                status: ClassStatus::NotStarted,
            })
            .collect();
        existing[2].status = ClassStatus::Taken; // 2025-07-04

        let plan = plan_period_change(&existing, day(2025, 6, 27), day(2025, 7, 11));
        assert_eq!(plan.delete_ids, vec![1, 2, 4]);
        assert_eq!(plan.insert_dates, vec![day(2025, 6, 27), day(2025, 7, 11)]);
        assert!(
            !plan
                .insert_dates
                .iter()
                .any(|d| d.date_naive() == day(2025, 7, 4).date_naive())
        );
    }

    #[test]
    fn test_every_non_not_started_status_is_untouched() {
        let statuses = [
            ClassStatus::Taken,
            ClassStatus::Absent,
            ClassStatus::ToBeRescheduled,
            ClassStatus::Recovered,
        ];
        for status in statuses {
            let existing = vec![ExistingClass {
                id: 7,
                // 远在新账期之外也不能删
                date: day(2024, 1, 5),
                status,
            }];
            let plan = plan_period_change(&existing, day(2025, 6, 20), day(2025, 7, 11));
            assert!(plan.delete_ids.is_empty(), "{status} must not be deleted");
            assert_eq!(plan.insert_dates.len(), 4);
        }
    }

    #[test]
    fn test_explicit_dates_mode() {
        let existing = vec![
            ExistingClass {
                id: 1,
                date: day(2025, 6, 20),
                status: ClassStatus::Taken,
            },
            ExistingClass {
                id: 2,
                date: day(2025, 6, 27),
                status: ClassStatus::NotStarted,
            },
        ];
        let supplied = vec![day(2025, 8, 1), day(2025, 8, 15)];
        let plan = plan_explicit_dates(&existing, &supplied);
        // 只删 not_started；提供的日期原样插入
        assert_eq!(plan.delete_ids, vec![2]);
        assert_eq!(plan.insert_dates, supplied);
    }

    #[test]
    fn test_noop_plan() {
        let plan = ReconcilePlan::default();
        assert!(plan.is_noop());
        let plan = plan_explicit_dates(&[], &[day(2025, 8, 1)]);
        assert!(!plan.is_noop());
    }
}
