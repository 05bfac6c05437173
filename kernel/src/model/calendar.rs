use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::Serialize;
use shared::error::{AppError, AppResult};
use std::collections::{BTreeMap, BTreeSet};

pub type HolidayTable = BTreeMap<NaiveDate, &'static str>;

// 各オフィス共通の祝日（年ごとに手で管理している）
const HOLIDAYS: &[(i32, u32, u32, &str)] = &[
    (2025, 1, 1, "New Year's Day"),
    (2025, 1, 26, "Republic Day"),
    (2025, 3, 14, "Holi"),
    (2025, 3, 31, "Id-ul-Fitr"),
    (2025, 4, 18, "Good Friday"),
    (2025, 5, 1, "May Day"),
    (2025, 8, 15, "Independence Day"),
    (2025, 8, 27, "Ganesh Chaturthi"),
    (2025, 10, 2, "Gandhi Jayanti"),
    (2025, 10, 20, "Diwali"),
    (2025, 12, 25, "Christmas Day"),
    (2026, 1, 1, "New Year's Day"),
    (2026, 1, 26, "Republic Day"),
    (2026, 3, 4, "Holi"),
    (2026, 3, 20, "Id-ul-Fitr"),
    (2026, 4, 3, "Good Friday"),
    (2026, 5, 1, "May Day"),
    (2026, 8, 15, "Independence Day"),
    (2026, 9, 14, "Ganesh Chaturthi"),
    (2026, 10, 2, "Gandhi Jayanti"),
    (2026, 10, 20, "Dussehra"),
    (2026, 11, 8, "Diwali"),
    (2026, 12, 25, "Christmas Day"),
];

/// Public holidays for `year`. Years missing from the table yield an empty map.
pub fn holidays_for_year(year: i32) -> HolidayTable {
    HOLIDAYS
        .iter()
        .filter(|(y, _, _, _)| *y == year)
        .filter_map(|&(y, m, d, name)| NaiveDate::from_ymd_opt(y, m, d).map(|date| (date, name)))
        .collect()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_non_working_day(date: NaiveDate, holidays: &HolidayTable) -> bool {
    is_weekend(date) || holidays.contains_key(&date)
}

/// 選択された日付のうち、最初に見つかった土日・祝日を返す
pub fn first_non_working_day(dates: &BTreeSet<NaiveDate>) -> Option<NaiveDate> {
    let mut tables: BTreeMap<i32, HolidayTable> = BTreeMap::new();
    dates.iter().copied().find(|date| {
        let holidays = tables
            .entry(date.year())
            .or_insert_with(|| holidays_for_year(date.year()));
        is_non_working_day(*date, holidays)
    })
}

/// A calendar month, held as its first day so it is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> AppResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| AppError::UnprocessableEntity(format!("invalid month {year}-{month}")))
    }

    pub fn of(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn next(&self) -> AppResult<Self> {
        self.0
            .checked_add_months(Months::new(1))
            .map(Self)
            .ok_or_else(|| AppError::UnprocessableEntity(format!("no month after {}", self.0)))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Every day of the month, 1..=N.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let month = *self;
        self.0.iter_days().take_while(move |d| month.contains(*d))
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}
