use axum::{extract::Query, Json};
use garde::Validate;
use kernel::model::calendar::holidays_for_year;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::calendar::{HolidayQuery, HolidaysResponse},
};

pub async fn show_holidays(
    _user: AuthorizedUser,
    Query(query): Query<HolidayQuery>,
) -> AppResult<Json<HolidaysResponse>> {
    query.validate(&())?;

    Ok(Json(HolidaysResponse::new(
        query.year,
        holidays_for_year(query.year),
    )))
}
