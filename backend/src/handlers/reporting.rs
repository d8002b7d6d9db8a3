//! HTTP handlers for reporting endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::reporting::{ReportFilter, ReportingService};
use crate::AppState;
use crate::models::GainLossReport;

/// Get the gain/loss report for a date range
pub async fn get_gain_loss(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<GainLossReport>> {
    let service = ReportingService::new(state.db);
    let report = service.gain_loss(&filter).await?;
    Ok(Json(report))
}

/// Download the gain/loss report as CSV
pub async fn export_gain_loss_csv(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<ReportFilter>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db);
    let report = service.gain_loss(&filter).await?;
    let csv = ReportingService::export_to_csv(&report)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"gain-loss-{}-{}.csv\"",
                    report.start_date, report.end_date
                ),
            ),
        ],
        csv,
    ))
}
