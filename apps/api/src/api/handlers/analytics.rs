// Analytics endpoints
// Every report requires the analytics view permission

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::Utc;

use super::params::{ComparativeParams, RangeParams};
use crate::api::errors::ApiError;
use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;
use crate::auth::permissions::authorize;
use crate::domain::user::{Action, Resource};
use crate::reporting::reports::{
    AssetAnalytics, ComparativeReport, DashboardSummary, EmployeeAnalytics, FinancialOverview,
};

/// GET /api/analytics/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<DashboardSummary>, ApiError> {
    authorize(&user, Resource::Analytics, Action::View)?;
    Ok(Json(state.reporting().dashboard(Utc::now()).await?))
}

/// GET /api/analytics/financial-overview
pub async fn financial_overview(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    params: Result<Query<RangeParams>, QueryRejection>,
) -> Result<Json<FinancialOverview>, ApiError> {
    authorize(&user, Resource::Analytics, Action::View)?;
    let Query(params) = params?;

    let range = params.trailing_year(Utc::now())?;
    Ok(Json(state.reporting().financial_overview(range).await?))
}

/// GET /api/analytics/employees
pub async fn employee_analytics(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<EmployeeAnalytics>, ApiError> {
    authorize(&user, Resource::Analytics, Action::View)?;
    Ok(Json(state.reporting().employee_analytics().await?))
}

/// GET /api/analytics/assets
pub async fn asset_analytics(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<AssetAnalytics>, ApiError> {
    authorize(&user, Resource::Analytics, Action::View)?;
    Ok(Json(state.reporting().asset_analytics().await?))
}

/// GET /api/analytics/comparative
pub async fn comparative(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    params: Result<Query<ComparativeParams>, QueryRejection>,
) -> Result<Json<ComparativeReport>, ApiError> {
    authorize(&user, Resource::Analytics, Action::View)?;
    let Query(params) = params?;

    let periods = params.resolve(Utc::now())?;
    Ok(Json(state.reporting().comparative(periods).await?))
}
