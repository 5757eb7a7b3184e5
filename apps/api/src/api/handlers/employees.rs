use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use super::params::EmployeeListParams;
use crate::api::errors::ApiError;
use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;
use crate::auth::permissions::authorize;
use crate::domain::employee::{Employee, EmployeeChanges, NewEmployee};
use crate::domain::user::{Action, Resource};

async fn load(state: &AppState, id: Uuid) -> Result<Employee, ApiError> {
    state
        .employees
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee not found"))
}

/// GET /api/employees
pub async fn list_employees(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    params: Result<Query<EmployeeListParams>, QueryRejection>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    authorize(&user, Resource::Employees, Action::View)?;
    let Query(params) = params?;

    let employees = state.employees.find(&params.into()).await?;
    Ok(Json(employees))
}

/// GET /api/employees/:id
pub async fn get_employee(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Employee>, ApiError> {
    authorize(&user, Resource::Employees, Action::View)?;
    Ok(Json(load(&state, id).await?))
}

/// POST /api/employees
pub async fn create_employee(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    authorize(&user, Resource::Employees, Action::Create)?;
    let Json(input) = payload?;

    let employee = Employee::new(input, Utc::now()).map_err(ApiError::bad_request)?;
    state.employees.create(&employee).await?;
    tracing::info!(employee_id = %employee.id, "employee created");

    Ok((StatusCode::CREATED, Json(employee)))
}

/// PUT /api/employees/:id
pub async fn update_employee(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<EmployeeChanges>, JsonRejection>,
) -> Result<Json<Employee>, ApiError> {
    authorize(&user, Resource::Employees, Action::Update)?;
    let Json(changes) = payload?;

    let mut employee = load(&state, id).await?;
    employee
        .apply(changes, Utc::now())
        .map_err(ApiError::bad_request)?;
    state.employees.update(&employee).await?;

    Ok(Json(employee))
}

/// DELETE /api/employees/:id
pub async fn delete_employee(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    authorize(&user, Resource::Employees, Action::Delete)?;

    state.employees.delete(id).await?;
    tracing::info!(employee_id = %id, "employee removed");
    Ok(Json(json!({ "message": "Employee removed" })))
}
