use axum::{extract::State, Json};
use chrono::Local;
use garde::Validate;
use kernel::model::{assistant::AssistantPrompt, location::Location};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};
use std::collections::BTreeSet;

use crate::{
    extractor::AuthorizedUser,
    model::assistant::{InterpretRequest, InterpretResponse, SummaryRequest, SummaryResponse},
};

async fn home_location(registry: &AppRegistry, user: &AuthorizedUser) -> AppResult<Location> {
    let location_id = user.user.location_id;
    registry
        .location_repository()
        .find_by_id(location_id)
        .await?
        .ok_or_else(|| AppError::UnknownLocation(location_id.to_string()))
}

async fn build_prompt(
    registry: &AppRegistry,
    user: &AuthorizedUser,
    req: &SummaryRequest,
) -> AppResult<AssistantPrompt> {
    let location = home_location(registry, user).await?;
    let ledger = registry.ledger_repository();

    if let Some(date) = req.waitlist_date {
        let queue = ledger.waitlist(location.location_id, date).await?;
        return Ok(AssistantPrompt::WaitlistContext {
            location_name: location.location_name,
            date,
            position: queue
                .iter()
                .position(|e| e.user_id == user.id())
                .map(|idx| idx + 1),
            waitlist_length: queue.len(),
        });
    }

    let month = req.year_month()?;
    let status = ledger.monthly_status(location.location_id, month).await?;

    // 同じチームのメンバーが出社する日
    let mut teammate_dates = BTreeSet::new();
    if let Some(team_id) = user.user.team_id {
        let teammates: BTreeSet<_> = registry
            .user_repository()
            .find_by_location(location.location_id)
            .await?
            .into_iter()
            .filter(|u| u.team_id == Some(team_id) && u.user_id != user.id())
            .map(|u| u.user_id)
            .collect();
        teammate_dates = ledger
            .bookings_in_month(month)
            .await?
            .into_iter()
            .filter(|b| b.is_confirmed() && teammates.contains(&b.user_id))
            .map(|b| b.date)
            .collect();
    }

    Ok(AssistantPrompt::CalendarSummary {
        location_name: location.location_name,
        month,
        status,
        capacity: location.capacity,
        teammate_dates: teammate_dates.into_iter().collect(),
    })
}

pub async fn summarize_month(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<SummaryRequest>,
) -> AppResult<Json<SummaryResponse>> {
    req.validate(&())?;

    let prompt = build_prompt(&registry, &user, &req).await?;
    let response = match registry.assistant_repository().summarize(prompt).await {
        Ok(summary) => SummaryResponse {
            summary,
            fallback: false,
        },
        Err(e) => {
            tracing::warn!(error.message = %e, "booking assistant gave no summary");
            SummaryResponse::fallback()
        }
    };
    Ok(Json(response))
}

pub async fn interpret_request(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<InterpretRequest>,
) -> AppResult<Json<InterpretResponse>> {
    req.validate(&())?;

    let today = Local::now().date_naive();
    let response = match registry
        .assistant_repository()
        .interpret(&req.request, today)
        .await
    {
        Ok(suggestion) => InterpretResponse::from(suggestion),
        Err(e) => {
            tracing::warn!(error.message = %e, "booking assistant could not interpret request");
            InterpretResponse::fallback()
        }
    };
    Ok(Json(response))
}
