use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Occupancy of one location on one day, derived from the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayStatus {
    pub bookings: usize,
    pub waitlist: usize,
    pub is_full: bool,
    pub is_waitlist_full: bool,
}

impl DayStatus {
    pub fn new(bookings: usize, waitlist: usize, capacity: u32, waitlist_cap: usize) -> Self {
        Self {
            bookings,
            waitlist,
            is_full: bookings >= capacity as usize,
            is_waitlist_full: waitlist >= waitlist_cap,
        }
    }

    /// 座席もキャンセル待ちも埋まっている日
    pub fn is_exhausted(&self) -> bool {
        self.is_full && self.is_waitlist_full
    }
}

pub type MonthlyStatus = BTreeMap<NaiveDate, DayStatus>;
