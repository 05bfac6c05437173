use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Local;
use garde::Validate;
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::report::{
        ComplianceEntryResponse, ComplianceQuery, ComplianceReportResponse, DashboardResponse,
    },
};

pub async fn show_dashboard(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<DashboardResponse>> {
    user.require_admin()?;

    registry
        .report_repository()
        .dashboard_stats(Local::now().date_naive())
        .await
        .map(DashboardResponse::from)
        .map(Json)
}

pub async fn show_compliance(
    user: AuthorizedUser,
    Query(query): Query<ComplianceQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ComplianceReportResponse>> {
    user.require_admin()?;
    query.validate(&())?;

    let month = query.year_month()?;
    let threshold = query
        .threshold
        .unwrap_or(registry.ledger_config().compliance_threshold);
    let items = registry
        .report_repository()
        .compliance_report(month, threshold)
        .await?;

    Ok(Json(ComplianceReportResponse {
        month: month.to_string(),
        threshold,
        items: items.into_iter().map(ComplianceEntryResponse::from).collect(),
    }))
}
