use chrono::NaiveDate;
use garde::Validate;
use kernel::model::{
    booking::DayDetails,
    calendar::YearMonth,
    day_status::DayStatus,
    id::LocationId,
    location::Location,
};
use serde::{Deserialize, Serialize};
use shared::error::AppResult;

use super::user::UserResponse;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub location_id: LocationId,
    pub location_name: String,
    pub capacity: u32,
}

impl From<Location> for LocationResponse {
    fn from(value: Location) -> Self {
        let Location {
            location_id,
            location_name,
            capacity,
        } = value;
        Self {
            location_id,
            location_name,
            capacity,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationsResponse {
    pub items: Vec<LocationResponse>,
}

impl From<Vec<Location>> for LocationsResponse {
    fn from(value: Vec<Location>) -> Self {
        Self {
            items: value.into_iter().map(LocationResponse::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct MonthQuery {
    #[garde(range(min = 2000, max = 2100))]
    pub year: i32,
    #[garde(range(min = 1, max = 12))]
    pub month: u32,
}

impl MonthQuery {
    pub fn year_month(&self) -> AppResult<YearMonth> {
        YearMonth::new(self.year, self.month)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStatusResponse {
    pub date: NaiveDate,
    pub bookings: usize,
    pub waitlist: usize,
    pub is_full: bool,
    pub is_waitlist_full: bool,
    pub is_non_working_day: bool,
    pub holiday_name: Option<String>,
}

impl DayStatusResponse {
    pub fn new(date: NaiveDate, status: DayStatus, holiday_name: Option<&str>, weekend: bool) -> Self {
        let DayStatus {
            bookings,
            waitlist,
            is_full,
            is_waitlist_full,
        } = status;
        Self {
            date,
            bookings,
            waitlist,
            is_full,
            is_waitlist_full,
            is_non_working_day: weekend || holiday_name.is_some(),
            holiday_name: holiday_name.map(str::to_string),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStatusResponse {
    pub location_id: LocationId,
    pub month: String,
    pub capacity: u32,
    pub days: Vec<DayStatusResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDetailsResponse {
    pub location_id: LocationId,
    pub date: NaiveDate,
    pub booked_users: Vec<UserResponse>,
    pub waitlisted_users: Vec<UserResponse>,
}

impl From<DayDetails> for DayDetailsResponse {
    fn from(value: DayDetails) -> Self {
        let DayDetails {
            location_id,
            date,
            booked_users,
            waitlisted_users,
        } = value;
        Self {
            location_id,
            date,
            booked_users: booked_users.into_iter().map(UserResponse::from).collect(),
            waitlisted_users: waitlisted_users
                .into_iter()
                .map(UserResponse::from)
                .collect(),
        }
    }
}
