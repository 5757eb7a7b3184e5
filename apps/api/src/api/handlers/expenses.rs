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

use super::params::{LedgerListParams, RangeParams};
use crate::api::errors::ApiError;
use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;
use crate::auth::permissions::authorize;
use crate::domain::ledger::{Expense, ExpenseChanges, NewExpense};
use crate::domain::repositories::ExpenseFilter;
use crate::domain::user::{Action, Resource};
use crate::reporting::aggregator;
use crate::reporting::reports::{CategoryTotal, MonthlyTotal};

/// Listing returned when `calculateTotal=true`
#[derive(Debug, Serialize)]
pub struct ExpenseTotals {
    pub count: usize,
    pub total: f64,
    pub expenses: Vec<Expense>,
}

async fn load(state: &AppState, id: Uuid) -> Result<Expense, ApiError> {
    state
        .expenses
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Expense not found"))
}

/// GET /api/expenses
pub async fn list_expenses(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    params: Result<Query<LedgerListParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    authorize(&user, Resource::Expenses, Action::View)?;
    let Query(params) = params?;

    let filter = ExpenseFilter {
        range: params.range()?,
        category: params.category()?,
    };
    let expenses = state.expenses.find(&filter).await?;

    if params.calculate_total {
        let totals = ExpenseTotals {
            count: expenses.len(),
            total: aggregator::total(&expenses),
            expenses,
        };
        return Ok(Json(totals).into_response());
    }
    Ok(Json(expenses).into_response())
}

/// GET /api/expenses/:id
pub async fn get_expense(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Expense>, ApiError> {
    authorize(&user, Resource::Expenses, Action::View)?;
    Ok(Json(load(&state, id).await?))
}

/// POST /api/expenses
pub async fn create_expense(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<NewExpense>, JsonRejection>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    authorize(&user, Resource::Expenses, Action::Create)?;
    let Json(input) = payload?;

    let expense = Expense::new(input, Utc::now()).map_err(ApiError::bad_request)?;
    state.expenses.create(&expense).await?;
    tracing::info!(expense_id = %expense.id, amount = expense.amount, "expense recorded");

    Ok((StatusCode::CREATED, Json(expense)))
}

/// PUT /api/expenses/:id
pub async fn update_expense(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<ExpenseChanges>, JsonRejection>,
) -> Result<Json<Expense>, ApiError> {
    authorize(&user, Resource::Expenses, Action::Update)?;
    let Json(changes) = payload?;

    let mut expense = load(&state, id).await?;
    expense
        .apply(changes, Utc::now())
        .map_err(ApiError::bad_request)?;
    state.expenses.update(&expense).await?;

    Ok(Json(expense))
}

/// DELETE /api/expenses/:id
pub async fn delete_expense(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    authorize(&user, Resource::Expenses, Action::Delete)?;

    state.expenses.delete(id).await?;
    Ok(Json(json!({ "message": "Expense removed" })))
}

/// GET /api/expenses/summary/category
pub async fn category_summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    params: Result<Query<RangeParams>, QueryRejection>,
) -> Result<Json<Vec<CategoryTotal>>, ApiError> {
    authorize(&user, Resource::Expenses, Action::View)?;
    let Query(params) = params?;

    let summary = state.reporting().expense_categories(params.optional()?).await?;
    Ok(Json(summary))
}

/// GET /api/expenses/summary/monthly
pub async fn monthly_summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    params: Result<Query<RangeParams>, QueryRejection>,
) -> Result<Json<Vec<MonthlyTotal>>, ApiError> {
    authorize(&user, Resource::Expenses, Action::View)?;
    let Query(params) = params?;

    let range = params.since_year_ago(Utc::now())?;
    Ok(Json(state.reporting().expense_monthly(range).await?))
}
