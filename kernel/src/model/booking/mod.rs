use crate::model::{
    id::{BookingId, LocationId, UserId},
    user::User,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub mod event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub booking_id: BookingId,
    pub user_id: UserId,
    pub location_id: LocationId,
    pub date: NaiveDate,
    pub status: BookingStatus,
    pub booked_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}

/// submit の結果。日付ごとに独立して判定される
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub booked_dates: Vec<NaiveDate>,
    pub already_booked_dates: Vec<NaiveDate>,
    pub full_dates: Vec<NaiveDate>,
}

impl SubmitOutcome {
    pub fn message(&self) -> String {
        let mut parts = Vec::new();
        match self.booked_dates.len() {
            0 => parts.push("No new days were booked.".to_string()),
            1 => parts.push("Booked 1 day.".to_string()),
            n => parts.push(format!("Booked {n} days.")),
        }
        if !self.already_booked_dates.is_empty() {
            parts.push(format!(
                "Already booked: {}.",
                join_dates(&self.already_booked_dates)
            ));
        }
        if !self.full_dates.is_empty() {
            parts.push(format!(
                "Fully booked, join the waitlist instead: {}.",
                join_dates(&self.full_dates)
            ));
        }
        parts.join(" ")
    }
}

fn join_dates(dates: &[NaiveDate]) -> String {
    dates
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// dayDetails の結果。waitlisted_users は繰り上げ順
#[derive(Debug, Clone)]
pub struct DayDetails {
    pub location_id: LocationId,
    pub date: NaiveDate,
    pub booked_users: Vec<User>,
    pub waitlisted_users: Vec<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, d).unwrap()
    }

    #[test]
    fn message_mentions_every_bucket() {
        let outcome = SubmitOutcome {
            booked_dates: vec![date(2), date(3)],
            already_booked_dates: vec![date(4)],
            full_dates: vec![date(5)],
        };
        assert_eq!(
            outcome.message(),
            "Booked 2 days. Already booked: 2026-11-04. Fully booked, join the waitlist instead: 2026-11-05."
        );
    }

    #[test]
    fn message_for_nothing_booked() {
        assert_eq!(SubmitOutcome::default().message(), "No new days were booked.");
    }
}
