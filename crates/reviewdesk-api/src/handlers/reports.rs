//! Dashboard report endpoints.
//!
//! Every endpoint loads the caller's forms, submissions and employees from
//! the upstream API with the caller's bearer token, then filters and
//! aggregates them. Nothing is cached between requests.

use crate::auth::TenantToken;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};
use reviewdesk_core::AppError;
use reviewdesk_reports::{
    DailyCount, DateRange, EmployeeSelection, FormSelection, RatingDistribution,
    RatingTrendPoint, ReportFilter, ReportSummary,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

/// Report filter query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// `all` (default) or a form id
    pub form: Option<String>,
    /// Empty (general ratings only), `all`, or an employee id
    pub employee: Option<String>,
    /// `7days`, `30days`, `6months` or `all` (default)
    pub range: Option<String>,
    /// Custom range start, `YYYY-MM-DD` (requires `end`)
    pub start: Option<String>,
    /// Custom range end, `YYYY-MM-DD`, inclusive (requires `start`)
    pub end: Option<String>,
}

impl ReportQuery {
    pub fn to_filter(&self) -> Result<ReportFilter, AppError> {
        let range = DateRange::from_params(
            self.range.as_deref(),
            self.start.as_deref(),
            self.end.as_deref(),
        )?;

        Ok(ReportFilter::new(
            FormSelection::parse(self.form.as_deref().unwrap_or("")),
            EmployeeSelection::parse(self.employee.as_deref().unwrap_or("")),
            range,
        ))
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/summary",
    tag = "reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "All chart datasets for the filtered submissions", body = ReportSummary),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "Missing or rejected bearer token", body = ErrorResponse),
        (status = 502, description = "Upstream API unavailable", body = ErrorResponse)
    )
)]
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    token: TenantToken,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let filter = query.to_filter().map_err(HttpAppError::from)?;
    let summary = state
        .reports_for(token.as_str())
        .summary(&filter)
        .await
        .map_err(HttpAppError::from)?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/timeline",
    tag = "reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Submissions per day", body = Vec<DailyCount>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "Missing or rejected bearer token", body = ErrorResponse)
    )
)]
pub async fn get_timeline(
    State(state): State<Arc<AppState>>,
    token: TenantToken,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let filter = query.to_filter().map_err(HttpAppError::from)?;
    let timeline = state
        .reports_for(token.as_str())
        .timeline(&filter)
        .await
        .map_err(HttpAppError::from)?;
    Ok(Json(timeline))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/ratings/trend",
    tag = "reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Average rating per day", body = Vec<RatingTrendPoint>),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "Missing or rejected bearer token", body = ErrorResponse)
    )
)]
pub async fn get_rating_trend(
    State(state): State<Arc<AppState>>,
    token: TenantToken,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let filter = query.to_filter().map_err(HttpAppError::from)?;
    let trend = state
        .reports_for(token.as_str())
        .rating_trend(&filter)
        .await
        .map_err(HttpAppError::from)?;
    Ok(Json(trend))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/ratings/distribution",
    tag = "reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Star distribution and overall average", body = RatingDistribution),
        (status = 400, description = "Invalid filter", body = ErrorResponse),
        (status = 401, description = "Missing or rejected bearer token", body = ErrorResponse)
    )
)]
pub async fn get_rating_distribution(
    State(state): State<Arc<AppState>>,
    token: TenantToken,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let filter = query.to_filter().map_err(HttpAppError::from)?;
    let distribution = state
        .reports_for(token.as_str())
        .distribution(&filter)
        .await
        .map_err(HttpAppError::from)?;
    Ok(Json(distribution))
}
