use crate::model::assistant::{AssistantPrompt, BookingSuggestion};
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::error::AppResult;

/// Opaque text-generation oracle. Callers treat any error as "no usable output".
#[async_trait]
pub trait AssistantRepository: Send + Sync {
    async fn summarize(&self, prompt: AssistantPrompt) -> AppResult<String>;
    async fn interpret(&self, request: &str, today: NaiveDate) -> AppResult<BookingSuggestion>;
}
