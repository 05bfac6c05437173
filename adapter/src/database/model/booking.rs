use chrono::{DateTime, NaiveDate, Utc};
use kernel::model::{
    booking::{Booking, BookingStatus},
    id::{BookingId, LocationId, UserId, WaitlistEntryId},
    waitlist::WaitlistEntry,
};

#[derive(Clone)]
pub struct BookingRow {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub location_id: LocationId,
    pub date: NaiveDate,
    pub status: BookingStatus,
    pub booked_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl BookingRow {
    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}

impl From<BookingRow> for Booking {
    fn from(value: BookingRow) -> Self {
        let BookingRow {
            booking_id,
            user_id,
            location_id,
            date,
            status,
            booked_at,
            cancelled_at,
        } = value;
        Booking {
            booking_id,
            user_id,
            location_id,
            date,
            status,
            booked_at,
            cancelled_at,
        }
    }
}

#[derive(Clone)]
pub struct WaitlistRow {
    pub entry_id: WaitlistEntryId,
    pub user_id: UserId,
    pub location_id: LocationId,
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
}

impl From<WaitlistRow> for WaitlistEntry {
    fn from(value: WaitlistRow) -> Self {
        let WaitlistRow {
            entry_id,
            user_id,
            location_id,
            date,
            timestamp,
        } = value;
        WaitlistEntry {
            entry_id,
            user_id,
            location_id,
            date,
            timestamp,
        }
    }
}

/// One (location, date) slice of the ledger. Only reachable through a
/// `DayTransaction`, so every read and write on it is serialized.
#[derive(Default)]
pub struct DayLedger {
    pub bookings: Vec<BookingRow>,
    // 追加は常に末尾。timestamp は単調増加なので先頭が最古
    pub waitlist: Vec<WaitlistRow>,
}

impl DayLedger {
    pub fn confirmed_count(&self) -> usize {
        self.bookings.iter().filter(|b| b.is_confirmed()).count()
    }

    pub fn confirmed_for(&self, user_id: UserId) -> Option<&BookingRow> {
        self.bookings
            .iter()
            .find(|b| b.user_id == user_id && b.is_confirmed())
    }

    pub fn waitlist_entry(&self, user_id: UserId) -> Option<&WaitlistRow> {
        self.waitlist.iter().find(|w| w.user_id == user_id)
    }

    pub fn remove_waitlist(&mut self, user_id: UserId) -> Option<WaitlistRow> {
        let idx = self.waitlist.iter().position(|w| w.user_id == user_id)?;
        Some(self.waitlist.remove(idx))
    }

    pub fn pop_front(&mut self) -> Option<WaitlistRow> {
        let idx = self
            .waitlist
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.timestamp
                    .cmp(&b.timestamp)
                    .then_with(|| a.entry_id.cmp(&b.entry_id))
            })
            .map(|(idx, _)| idx)?;
        Some(self.waitlist.remove(idx))
    }

    pub fn booking_mut(&mut self, booking_id: BookingId) -> Option<&mut BookingRow> {
        self.bookings.iter_mut().find(|b| b.booking_id == booking_id)
    }
}
