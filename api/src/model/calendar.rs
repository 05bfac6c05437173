use chrono::NaiveDate;
use garde::Validate;
use kernel::model::calendar::HolidayTable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
pub struct HolidayQuery {
    #[garde(range(min = 2000, max = 2100))]
    pub year: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayResponse {
    pub date: NaiveDate,
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidaysResponse {
    pub year: i32,
    pub items: Vec<HolidayResponse>,
}

impl HolidaysResponse {
    pub fn new(year: i32, table: HolidayTable) -> Self {
        Self {
            year,
            items: table
                .into_iter()
                .map(|(date, name)| HolidayResponse {
                    date,
                    name: name.to_string(),
                })
                .collect(),
        }
    }
}
