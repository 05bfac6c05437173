use chrono::NaiveDate;
use garde::Validate;
use kernel::model::{
    assistant::{BookingSuggestion, ASSISTANT_FALLBACK},
    calendar::YearMonth,
};
use serde::{Deserialize, Serialize};
use shared::error::AppResult;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    #[garde(range(min = 2000, max = 2100))]
    pub year: i32,
    #[garde(range(min = 1, max = 12))]
    pub month: u32,
    // 指定があればキャンセル待ちの見込みを説明させる
    #[garde(skip)]
    #[serde(default)]
    pub waitlist_date: Option<NaiveDate>,
}

impl SummaryRequest {
    pub fn year_month(&self) -> AppResult<YearMonth> {
        YearMonth::new(self.year, self.month)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub summary: String,
    pub fallback: bool,
}

impl SummaryResponse {
    pub fn fallback() -> Self {
        Self {
            summary: ASSISTANT_FALLBACK.into(),
            fallback: true,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InterpretRequest {
    #[garde(length(min = 1, max = 500))]
    pub request: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretResponse {
    pub dates_to_book: Vec<NaiveDate>,
    pub suggestion: String,
    pub fallback: bool,
}

impl From<BookingSuggestion> for InterpretResponse {
    fn from(value: BookingSuggestion) -> Self {
        let BookingSuggestion {
            dates_to_book,
            suggestion,
        } = value;
        Self {
            dates_to_book,
            suggestion,
            fallback: false,
        }
    }
}

impl InterpretResponse {
    pub fn fallback() -> Self {
        Self {
            dates_to_book: Vec::new(),
            suggestion: ASSISTANT_FALLBACK.into(),
            fallback: true,
        }
    }
}
