use crate::model::day_status::DayStatus;
use chrono::{Datelike, Days, IsoWeek, NaiveDate};
use shared::error::{AppError, AppResult};
use std::collections::{BTreeMap, BTreeSet};

/// Minimum in-office days per ISO week.
#[derive(Debug, Clone, Copy)]
pub struct WeeklyPolicy {
    pub minimum_days: usize,
}

impl WeeklyPolicy {
    pub fn new(minimum_days: usize) -> Self {
        Self { minimum_days }
    }

    /// Checks every ISO week touched by `dates`.
    ///
    /// Weeks that straddle a month boundary are exempt. A week is also exempt when
    /// `status_of` reports any of its seven days as exhausted (no desk and no
    /// waitlist place left). The first failing week, in calendar order, is reported.
    pub fn validate<F>(&self, dates: &BTreeSet<NaiveDate>, status_of: F) -> AppResult<()>
    where
        F: Fn(NaiveDate) -> DayStatus,
    {
        for (week, selected) in group_by_iso_week(dates) {
            let Some(days) = week_days(week) else {
                continue;
            };
            if !within_one_month(&days) {
                continue;
            }
            if selected.len() >= self.minimum_days {
                continue;
            }
            if days.iter().any(|d| status_of(*d).is_exhausted()) {
                continue;
            }
            return Err(AppError::WeeklyMinimumViolation {
                week_start: days[0],
                selected: selected.len(),
                required: self.minimum_days,
            });
        }
        Ok(())
    }
}

pub fn group_by_iso_week(dates: &BTreeSet<NaiveDate>) -> BTreeMap<IsoWeek, Vec<NaiveDate>> {
    let mut weeks: BTreeMap<IsoWeek, Vec<NaiveDate>> = BTreeMap::new();
    for date in dates {
        weeks.entry(date.iso_week()).or_default().push(*date);
    }
    weeks
}

/// 月曜から日曜までの 7 日間
pub fn week_days(week: IsoWeek) -> Option<[NaiveDate; 7]> {
    let monday = NaiveDate::from_isoywd_opt(week.year(), week.week(), chrono::Weekday::Mon)?;
    let mut days = [monday; 7];
    for (offset, day) in days.iter_mut().enumerate() {
        *day = monday.checked_add_days(Days::new(offset as u64))?;
    }
    Some(days)
}

fn within_one_month(days: &[NaiveDate; 7]) -> bool {
    let first = days[0];
    let last = days[6];
    first.year() == last.year() && first.month() == last.month()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    fn dates(list: &[(u32, u32)]) -> BTreeSet<NaiveDate> {
        list.iter().map(|&(m, d)| date(m, d)).collect()
    }

    fn open(_: NaiveDate) -> DayStatus {
        DayStatus::new(0, 0, 10, 20)
    }

    // 2026-11-09(月)〜11-15(日) は 11 月に収まる週
    #[test]
    fn one_or_two_days_in_a_contained_week_fail() {
        let policy = WeeklyPolicy::new(3);
        for picked in [dates(&[(11, 10)]), dates(&[(11, 10), (11, 11)])] {
            let err = policy.validate(&picked, open).unwrap_err();
            match err {
                AppError::WeeklyMinimumViolation {
                    week_start,
                    selected,
                    required,
                } => {
                    assert_eq!(week_start, date(11, 9));
                    assert_eq!(selected, picked.len());
                    assert_eq!(required, 3);
                }
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn three_days_in_a_contained_week_pass() {
        let policy = WeeklyPolicy::new(3);
        let picked = dates(&[(11, 10), (11, 11), (11, 13)]);
        assert!(policy.validate(&picked, open).is_ok());
    }

    #[test]
    fn an_exhausted_day_waives_the_minimum() {
        let policy = WeeklyPolicy::new(3);
        let exhausted = date(11, 12);
        let status_of = |d: NaiveDate| {
            if d == exhausted {
                DayStatus::new(10, 20, 10, 20)
            } else {
                DayStatus::new(0, 0, 10, 20)
            }
        };
        assert!(policy.validate(&dates(&[(11, 10)]), status_of).is_ok());
    }

    #[test]
    fn a_full_day_with_waitlist_room_does_not_waive() {
        let policy = WeeklyPolicy::new(3);
        let status_of = |_: NaiveDate| DayStatus::new(10, 5, 10, 20);
        assert!(policy.validate(&dates(&[(11, 10)]), status_of).is_err());
    }

    // 2026-11-30(月)〜12-06(日) は月をまたぐ
    #[test]
    fn weeks_spanning_a_month_boundary_are_exempt() {
        let policy = WeeklyPolicy::new(3);
        assert!(policy.validate(&dates(&[(11, 30)]), open).is_ok());
        assert!(policy.validate(&dates(&[(12, 2)]), open).is_ok());
    }

    #[test]
    fn the_first_failing_week_is_reported() {
        let policy = WeeklyPolicy::new(3);
        let picked = dates(&[(11, 10), (11, 11), (11, 12), (11, 17), (11, 24)]);
        match policy.validate(&picked, open) {
            Err(AppError::WeeklyMinimumViolation { week_start, .. }) => {
                assert_eq!(week_start, date(11, 16))
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn iso_weeks_follow_the_thursday_rule() {
        // 2026-01-01 は木曜なので第 1 週、2027-01-01 は金曜なので 2026 年第 53 週
        let jan1 = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!((jan1.iso_week().year(), jan1.iso_week().week()), (2026, 1));
        let next_jan1 = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
        assert_eq!(
            (next_jan1.iso_week().year(), next_jan1.iso_week().week()),
            (2026, 53)
        );
        let days = week_days(jan1.iso_week()).unwrap();
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2025, 12, 29).unwrap());
        assert!(!within_one_month(&days));
    }
}
