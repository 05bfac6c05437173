use chrono::{DateTime, NaiveDate, Utc};
use garde::Validate;
use kernel::model::{
    booking::{Booking, BookingStatus, SubmitOutcome},
    id::{BookingId, LocationId, UserId, WaitlistEntryId},
    waitlist::WaitlistEntry,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBookingRequest {
    #[garde(length(min = 1, max = 31))]
    pub dates: Vec<NaiveDate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBookingResponse {
    pub booked_dates: Vec<NaiveDate>,
    pub already_booked_dates: Vec<NaiveDate>,
    pub full_dates: Vec<NaiveDate>,
    pub message: String,
}

impl From<SubmitOutcome> for SubmitBookingResponse {
    fn from(value: SubmitOutcome) -> Self {
        let message = value.message();
        let SubmitOutcome {
            booked_dates,
            already_booked_dates,
            full_dates,
        } = value;
        Self {
            booked_dates,
            already_booked_dates,
            full_dates,
            message,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistRequest {
    pub date: NaiveDate,
}

// 管理者は他のユーザーの分を確定できる
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmWaitlistRequest {
    pub date: NaiveDate,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub location_id: LocationId,
    pub date: NaiveDate,
    pub status: BookingStatus,
    pub booked_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl From<Booking> for BookingResponse {
    fn from(value: Booking) -> Self {
        let Booking {
            booking_id,
            user_id,
            location_id,
            date,
            status,
            booked_at,
            cancelled_at,
        } = value;
        Self {
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

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoteResponse {
    pub promoted: Option<BookingResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntryResponse {
    pub entry_id: WaitlistEntryId,
    pub user_id: UserId,
    pub location_id: LocationId,
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
    // 1 始まり
    pub position: Option<usize>,
}

impl WaitlistEntryResponse {
    pub fn new(entry: WaitlistEntry, position: Option<usize>) -> Self {
        let WaitlistEntry {
            entry_id,
            user_id,
            location_id,
            date,
            timestamp,
        } = entry;
        Self {
            entry_id,
            user_id,
            location_id,
            date,
            timestamp,
            position,
        }
    }
}
