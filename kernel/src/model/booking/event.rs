use crate::model::id::{BookingId, LocationId, UserId};
use chrono::NaiveDate;
use derive_new::new;
use std::collections::BTreeSet;

#[derive(Debug, new)]
pub struct SubmitBooking {
    pub user_id: UserId,
    pub dates: BTreeSet<NaiveDate>,
}

#[derive(Debug, Clone, Copy, new)]
pub struct JoinWaitlist {
    pub user_id: UserId,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, new)]
pub struct ConfirmFromWaitlist {
    pub user_id: UserId,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, new)]
pub struct PromoteNext {
    pub location_id: LocationId,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, new)]
pub struct CancelBooking {
    pub booking_id: BookingId,
}
