use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use garde::Validate;
use kernel::model::{
    booking::event::PromoteNext,
    calendar::{holidays_for_year, is_weekend},
    id::LocationId,
};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::{
    extractor::AuthorizedUser,
    model::{
        booking::{BookingResponse, PromoteResponse},
        location::{
            DayDetailsResponse, DayStatusResponse, LocationsResponse, MonthQuery,
            MonthlyStatusResponse,
        },
    },
};

pub async fn show_location_list(
    _user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<LocationsResponse>> {
    registry
        .location_repository()
        .find_all()
        .await
        .map(LocationsResponse::from)
        .map(Json)
}

pub async fn show_monthly_status(
    _user: AuthorizedUser,
    Path(location_id): Path<LocationId>,
    Query(query): Query<MonthQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<MonthlyStatusResponse>> {
    query.validate(&())?;
    let month = query.year_month()?;

    let location = registry
        .location_repository()
        .find_by_id(location_id)
        .await?
        .ok_or_else(|| AppError::UnknownLocation(location_id.to_string()))?;
    let status = registry
        .ledger_repository()
        .monthly_status(location_id, month)
        .await?;

    // 祝日の判定はここで重ねる
    let holidays = holidays_for_year(month.year());
    let days = status
        .into_iter()
        .map(|(date, day)| {
            DayStatusResponse::new(date, day, holidays.get(&date).copied(), is_weekend(date))
        })
        .collect();

    Ok(Json(MonthlyStatusResponse {
        location_id,
        month: month.to_string(),
        capacity: location.capacity,
        days,
    }))
}

pub async fn show_day_details(
    _user: AuthorizedUser,
    Path((location_id, date)): Path<(LocationId, NaiveDate)>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<DayDetailsResponse>> {
    registry
        .ledger_repository()
        .day_details(location_id, date)
        .await
        .map(DayDetailsResponse::from)
        .map(Json)
}

pub async fn promote_waitlist(
    user: AuthorizedUser,
    Path((location_id, date)): Path<(LocationId, NaiveDate)>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<PromoteResponse>> {
    user.require_admin()?;

    let promoted = registry
        .booking_repository()
        .promote_next(PromoteNext::new(location_id, date))
        .await?;
    Ok(Json(PromoteResponse {
        promoted: promoted.map(BookingResponse::from),
    }))
}
