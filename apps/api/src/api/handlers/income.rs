use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::params::{ClientParams, LedgerListParams, RangeParams};
use crate::api::errors::ApiError;
use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;
use crate::auth::permissions::authorize;
use crate::domain::ledger::{Income, IncomeChanges, NewIncome};
use crate::domain::repositories::IncomeFilter;
use crate::domain::user::{Action, Resource};
use crate::reporting::aggregator;
use crate::reporting::reports::{CategoryTotal, ClientTotal, MonthlyTotal};

/// Listing returned when `calculateTotal=true`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeTotals {
    pub count: usize,
    pub total: f64,
    pub income_entries: Vec<Income>,
}

async fn load(state: &AppState, id: Uuid) -> Result<Income, ApiError> {
    state
        .income
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Income entry not found"))
}

/// GET /api/income
pub async fn list_income(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    params: Result<Query<LedgerListParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    authorize(&user, Resource::Income, Action::View)?;
    let Query(params) = params?;

    let filter = IncomeFilter {
        range: params.range()?,
        category: params.category()?,
        client: params.client.clone().filter(|c| !c.trim().is_empty()),
    };
    let entries = state.income.find(&filter).await?;

    if params.calculate_total {
        let totals = IncomeTotals {
            count: entries.len(),
            total: aggregator::total(&entries),
            income_entries: entries,
        };
        return Ok(Json(totals).into_response());
    }
    Ok(Json(entries).into_response())
}

/// GET /api/income/:id
pub async fn get_income(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Income>, ApiError> {
    authorize(&user, Resource::Income, Action::View)?;
    Ok(Json(load(&state, id).await?))
}

/// POST /api/income
pub async fn create_income(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<NewIncome>, JsonRejection>,
) -> Result<(StatusCode, Json<Income>), ApiError> {
    authorize(&user, Resource::Income, Action::Create)?;
    let Json(input) = payload?;

    let entry = Income::new(input, Utc::now()).map_err(ApiError::bad_request)?;
    state.income.create(&entry).await?;
    tracing::info!(income_id = %entry.id, amount = entry.amount, "income recorded");

    Ok((StatusCode::CREATED, Json(entry)))
}

/// PUT /api/income/:id
pub async fn update_income(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<IncomeChanges>, JsonRejection>,
) -> Result<Json<Income>, ApiError> {
    authorize(&user, Resource::Income, Action::Update)?;
    let Json(changes) = payload?;

    let mut entry = load(&state, id).await?;
    entry
        .apply(changes, Utc::now())
        .map_err(ApiError::bad_request)?;
    state.income.update(&entry).await?;

    Ok(Json(entry))
}

/// DELETE /api/income/:id
pub async fn delete_income(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    authorize(&user, Resource::Income, Action::Delete)?;

    state.income.delete(id).await?;
    Ok(Json(json!({ "message": "Income entry removed" })))
}

/// GET /api/income/summary/category
pub async fn category_summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    params: Result<Query<RangeParams>, QueryRejection>,
) -> Result<Json<Vec<CategoryTotal>>, ApiError> {
    authorize(&user, Resource::Income, Action::View)?;
    let Query(params) = params?;

    let summary = state.reporting().income_categories(params.optional()?).await?;
    Ok(Json(summary))
}

/// GET /api/income/summary/monthly
pub async fn monthly_summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    params: Result<Query<RangeParams>, QueryRejection>,
) -> Result<Json<Vec<MonthlyTotal>>, ApiError> {
    authorize(&user, Resource::Income, Action::View)?;
    let Query(params) = params?;

    let range = params.since_year_ago(Utc::now())?;
    Ok(Json(state.reporting().income_monthly(range).await?))
}

/// GET /api/income/summary/clients
pub async fn client_summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    params: Result<Query<ClientParams>, QueryRejection>,
) -> Result<Json<Vec<ClientTotal>>, ApiError> {
    authorize(&user, Resource::Income, Action::View)?;
    let Query(params) = params?;

    let clients = state
        .reporting()
        .top_clients(params.range()?, params.limit)
        .await?;
    Ok(Json(clients))
}
