use chrono::NaiveDate;
use garde::Validate;
use kernel::model::{
    calendar::YearMonth,
    id::LocationId,
    report::{ComplianceEntry, DashboardStats, DayCounts, LocationCounts},
};
use serde::{Deserialize, Serialize};
use shared::error::AppResult;

use super::user::UserResponse;

#[derive(Debug, Deserialize, Validate)]
pub struct ComplianceQuery {
    #[garde(range(min = 2000, max = 2100))]
    pub year: i32,
    #[garde(range(min = 1, max = 12))]
    pub month: u32,
    #[garde(range(min = 1, max = 31))]
    pub threshold: Option<usize>,
}

impl ComplianceQuery {
    pub fn year_month(&self) -> AppResult<YearMonth> {
        YearMonth::new(self.year, self.month)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceEntryResponse {
    pub user: UserResponse,
    pub booking_count: usize,
}

impl From<ComplianceEntry> for ComplianceEntryResponse {
    fn from(value: ComplianceEntry) -> Self {
        let ComplianceEntry {
            user,
            booking_count,
        } = value;
        Self {
            user: user.into(),
            booking_count,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReportResponse {
    pub month: String,
    pub threshold: usize,
    pub items: Vec<ComplianceEntryResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCountsResponse {
    pub booked: usize,
    pub waitlisted: usize,
    pub cancelled_today: usize,
    pub cancelled_this_month: usize,
}

impl From<DayCounts> for DayCountsResponse {
    fn from(value: DayCounts) -> Self {
        let DayCounts {
            booked,
            waitlisted,
            cancelled_today,
            cancelled_this_month,
        } = value;
        Self {
            booked,
            waitlisted,
            cancelled_today,
            cancelled_this_month,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCountsResponse {
    pub location_id: LocationId,
    pub location_name: String,
    #[serde(flatten)]
    pub counts: DayCountsResponse,
}

impl From<LocationCounts> for LocationCountsResponse {
    fn from(value: LocationCounts) -> Self {
        let LocationCounts {
            location_id,
            location_name,
            counts,
        } = value;
        Self {
            location_id,
            location_name,
            counts: counts.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub representative_day: NaiveDate,
    pub total: DayCountsResponse,
    pub locations: Vec<LocationCountsResponse>,
}

impl From<DashboardStats> for DashboardResponse {
    fn from(value: DashboardStats) -> Self {
        let DashboardStats {
            representative_day,
            total,
            locations,
        } = value;
        Self {
            representative_day,
            total: total.into(),
            locations: locations
                .into_iter()
                .map(LocationCountsResponse::from)
                .collect(),
        }
    }
}
