use axum::{body::Bytes, extract::State, Json};
use garde::Validate;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::{
        roster::read_users_csv,
        user::{ImportSummaryResponse, LoginRequest, UserResponse},
    },
};

pub async fn login(
    State(registry): State<AppRegistry>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<UserResponse>> {
    req.validate(&())?;

    registry
        .user_repository()
        .find_by_credentials(&req.email, req.role.into())
        .await
        .map(UserResponse::from)
        .map(Json)
}

pub async fn show_current_user(user: AuthorizedUser) -> Json<UserResponse> {
    Json(UserResponse::from(user.user))
}

pub async fn import_users(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    body: Bytes,
) -> AppResult<Json<ImportSummaryResponse>> {
    user.require_admin()?;

    let rows = read_users_csv(&body[..]).await?;
    registry
        .user_repository()
        .import(rows)
        .await
        .map(ImportSummaryResponse::from)
        .map(Json)
}
