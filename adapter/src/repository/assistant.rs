use async_trait::async_trait;
use chrono::NaiveDate;
use kernel::{
    model::assistant::{AssistantPrompt, BookingSuggestion},
    repository::assistant::AssistantRepository,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::{
    config::AssistantConfig,
    error::{AppError, AppResult},
};
use std::{collections::BTreeSet, time::Duration};

const SUMMARY_INSTRUCTIONS: &str = "You help employees decide which days to come into the office. \
Answer in at most four short sentences. Do not invent numbers that are not in the data.";

const INTERPRET_INSTRUCTIONS: &str = "Turn the employee's request into office days to book. \
Reply with a JSON object {\"datesToBook\": [\"YYYY-MM-DD\", ...], \"suggestion\": \"...\"}. \
Only weekdays. Today is ";

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct AssistantRepositoryImpl {
    client: Client,
    config: AssistantConfig,
}

impl AssistantRepositoryImpl {
    pub fn new(config: AssistantConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::ExternalServiceError(e.to_string()))?;
        Ok(Self { client, config })
    }

    async fn complete(&self, system: String, user: String, json: bool) -> AppResult<String> {
        let endpoint = self.config.endpoint.as_deref().ok_or_else(|| {
            AppError::ExternalServiceError("booking assistant is not configured".into())
        })?;
        let url = format!("{}/chat/completions", endpoint.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format: json.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let mut request = self.client.post(url).json(&body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }
        let res = request.send().await.map_err(external)?;
        if !res.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "booking assistant answered {}",
                res.status()
            )));
        }
        let res: ChatResponse = res.json().await.map_err(external)?;
        res.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AppError::ExternalServiceError("booking assistant sent no text".into()))
    }
}

#[async_trait]
impl AssistantRepository for AssistantRepositoryImpl {
    async fn summarize(&self, prompt: AssistantPrompt) -> AppResult<String> {
        self.complete(SUMMARY_INSTRUCTIONS.into(), prompt.render(), false)
            .await
    }

    async fn interpret(&self, request: &str, today: NaiveDate) -> AppResult<BookingSuggestion> {
        let text = self
            .complete(
                format!("{INTERPRET_INSTRUCTIONS}{today}."),
                request.to_string(),
                true,
            )
            .await?;
        parse_suggestion(&text)
    }
}

fn external(err: reqwest::Error) -> AppError {
    AppError::ExternalServiceError(err.to_string())
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSuggestion {
    #[serde(default)]
    dates_to_book: Vec<String>,
    #[serde(default)]
    suggestion: String,
}

// モデルがコードブロックで囲んで返すことがある
fn parse_suggestion(text: &str) -> AppResult<BookingSuggestion> {
    let trimmed = text.trim();
    let json = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);
    let raw: RawSuggestion = serde_json::from_str(json.trim())
        .map_err(|e| AppError::ExternalServiceError(format!("unusable assistant reply: {e}")))?;

    let dates: BTreeSet<NaiveDate> = raw
        .dates_to_book
        .iter()
        .filter_map(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
        .collect();
    Ok(BookingSuggestion {
        dates_to_book: dates.into_iter().collect(),
        suggestion: raw.suggestion.trim().to_string(),
    })
}
