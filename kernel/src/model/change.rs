use crate::model::id::{BookingId, LocationId, UserId};
use chrono::NaiveDate;
use serde::Serialize;

/// Published after every successful ledger mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LedgerChange {
    #[serde(rename_all = "camelCase")]
    BookingConfirmed {
        location_id: LocationId,
        date: NaiveDate,
        user_id: UserId,
        booking_id: BookingId,
    },
    #[serde(rename_all = "camelCase")]
    WaitlistJoined {
        location_id: LocationId,
        date: NaiveDate,
        user_id: UserId,
    },
    #[serde(rename_all = "camelCase")]
    WaitlistPromoted {
        location_id: LocationId,
        date: NaiveDate,
        user_id: UserId,
        booking_id: BookingId,
    },
    #[serde(rename_all = "camelCase")]
    BookingCancelled {
        location_id: LocationId,
        date: NaiveDate,
        user_id: UserId,
        booking_id: BookingId,
    },
}

impl LedgerChange {
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerChange::BookingConfirmed { .. } => "bookingConfirmed",
            LedgerChange::WaitlistJoined { .. } => "waitlistJoined",
            LedgerChange::WaitlistPromoted { .. } => "waitlistPromoted",
            LedgerChange::BookingCancelled { .. } => "bookingCancelled",
        }
    }

    pub fn location_id(&self) -> LocationId {
        match self {
            LedgerChange::BookingConfirmed { location_id, .. }
            | LedgerChange::WaitlistJoined { location_id, .. }
            | LedgerChange::WaitlistPromoted { location_id, .. }
            | LedgerChange::BookingCancelled { location_id, .. } => *location_id,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            LedgerChange::BookingConfirmed { date, .. }
            | LedgerChange::WaitlistJoined { date, .. }
            | LedgerChange::WaitlistPromoted { date, .. }
            | LedgerChange::BookingCancelled { date, .. } => *date,
        }
    }
}
