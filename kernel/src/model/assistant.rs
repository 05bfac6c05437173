use crate::model::{calendar::YearMonth, day_status::MonthlyStatus};
use chrono::NaiveDate;

/// Structured input handed to the text-generation service.
#[derive(Debug, Clone)]
pub enum AssistantPrompt {
    /// 月間の空き状況を要約させる
    CalendarSummary {
        location_name: String,
        month: YearMonth,
        status: MonthlyStatus,
        capacity: u32,
        teammate_dates: Vec<NaiveDate>,
    },
    /// キャンセル待ちの状況を説明させる
    WaitlistContext {
        location_name: String,
        date: NaiveDate,
        position: Option<usize>,
        waitlist_length: usize,
    },
}

impl AssistantPrompt {
    pub fn render(&self) -> String {
        match self {
            AssistantPrompt::CalendarSummary {
                location_name,
                month,
                status,
                capacity,
                teammate_dates,
            } => {
                let mut lines = vec![format!(
                    "Office {location_name}, {month}, capacity {capacity} desks per day."
                )];
                for (date, day) in status {
                    let mut line = format!(
                        "{date}: {} booked, {} waitlisted",
                        day.bookings, day.waitlist
                    );
                    if day.is_full {
                        line.push_str(", full");
                    }
                    if day.is_waitlist_full {
                        line.push_str(", waitlist full");
                    }
                    lines.push(line);
                }
                if !teammate_dates.is_empty() {
                    let dates = teammate_dates
                        .iter()
                        .map(|d| d.to_string())
                        .collect::<Vec<_>>()
                        .join(", ");
                    lines.push(format!("Teammates are in the office on: {dates}."));
                }
                lines.push("Summarise availability and suggest good days to come in.".into());
                lines.join("\n")
            }
            AssistantPrompt::WaitlistContext {
                location_name,
                date,
                position,
                waitlist_length,
            } => {
                let position = position
                    .map(|p| format!("position {p}"))
                    .unwrap_or_else(|| "not on the list".into());
                format!(
                    "Office {location_name} is full on {date}. The waitlist has {waitlist_length} people; the user is at {position}. Explain the chances of getting a desk."
                )
            }
        }
    }
}

/// Structured answer to a free-form booking request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingSuggestion {
    pub dates_to_book: Vec<NaiveDate>,
    pub suggestion: String,
}

pub const ASSISTANT_FALLBACK: &str =
    "The booking assistant is unavailable right now. Please pick your days on the calendar.";
