use crate::model::{
    calendar::{holidays_for_year, is_non_working_day, YearMonth},
    id::LocationId,
    user::User,
};
use chrono::{Datelike, NaiveDate};
use shared::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceEntry {
    pub user: User,
    pub booking_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayCounts {
    pub booked: usize,
    pub waitlisted: usize,
    pub cancelled_today: usize,
    pub cancelled_this_month: usize,
}

impl std::ops::AddAssign for DayCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.booked += rhs.booked;
        self.waitlisted += rhs.waitlisted;
        self.cancelled_today += rhs.cancelled_today;
        self.cancelled_this_month += rhs.cancelled_this_month;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationCounts {
    pub location_id: LocationId,
    pub location_name: String,
    pub counts: DayCounts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub representative_day: NaiveDate,
    pub total: DayCounts,
    pub locations: Vec<LocationCounts>,
}

// 翌月 1〜7 日のうち最初の営業日。見つからなければ 3 日（その日が休日でもそのまま使う）
const SCAN_DAYS: u32 = 7;
const FALLBACK_DAY: u32 = 3;

pub fn representative_day(today: NaiveDate) -> AppResult<NaiveDate> {
    let next = YearMonth::of(today).next()?;
    let holidays = holidays_for_year(next.year());
    representative_day_with(today, |d| is_non_working_day(d, &holidays))
}

pub fn representative_day_with<F>(today: NaiveDate, is_non_working: F) -> AppResult<NaiveDate>
where
    F: Fn(NaiveDate) -> bool,
{
    let next = YearMonth::of(today).next()?;
    let found = next
        .days()
        .take(SCAN_DAYS as usize)
        .find(|d| !is_non_working(*d));
    Ok(found.unwrap_or_else(|| {
        next.first_day()
            .with_day(FALLBACK_DAY)
            .unwrap_or(next.first_day())
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn picks_first_business_day_of_next_month() -> AppResult<()> {
        // 2026-11-01 は日曜なので 11-02(月)
        assert_eq!(representative_day(date(2026, 10, 19))?, date(2026, 11, 2));
        // 2027-01-01 は祝日ではない（表に 2027 年がない）が金曜なので 1 日
        assert_eq!(representative_day(date(2026, 12, 31))?, date(2027, 1, 1));
        // 2026-01-01 は祝日、01-02 は金曜
        assert_eq!(representative_day(date(2025, 12, 5))?, date(2026, 1, 2));
        Ok(())
    }

    #[test]
    fn falls_back_to_the_third_even_if_it_is_a_holiday() -> AppResult<()> {
        let day = representative_day_with(date(2026, 4, 15), |d| d.day() <= 7)?;
        assert_eq!(day, date(2026, 5, 3));
        Ok(())
    }

    #[test]
    fn holidays_of_the_next_month_are_skipped() -> AppResult<()> {
        // 2026-05-01(金) は May Day、02-03 は週末
        assert_eq!(representative_day(date(2026, 4, 15))?, date(2026, 5, 4));
        // 翌年の表を引く: 2026-01-01 は祝日
        assert_eq!(representative_day(date(2025, 12, 31))?, date(2026, 1, 2));
        // 2025-05-01(木) も祝日
        assert_eq!(representative_day(date(2025, 4, 30))?, date(2025, 5, 2));
        Ok(())
    }

    #[test]
    fn counts_add_up() {
        let mut total = DayCounts::default();
        total += DayCounts {
            booked: 2,
            waitlisted: 1,
            cancelled_today: 0,
            cancelled_this_month: 3,
        };
        total += DayCounts {
            booked: 1,
            waitlisted: 0,
            cancelled_today: 1,
            cancelled_this_month: 1,
        };
        assert_eq!(
            total,
            DayCounts {
                booked: 3,
                waitlisted: 1,
                cancelled_today: 1,
                cancelled_this_month: 4
            }
        );
    }
}
