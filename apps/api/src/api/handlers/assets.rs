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

use super::params::AssetListParams;
use crate::api::errors::ApiError;
use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;
use crate::auth::permissions::authorize;
use crate::domain::asset::{Asset, AssetChanges, NewAsset};
use crate::domain::user::{Action, Resource};

async fn load(state: &AppState, id: Uuid) -> Result<Asset, ApiError> {
    state
        .assets
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Asset not found"))
}

/// An asset can only be assigned to an existing employee
async fn check_assignee(state: &AppState, assignee: Option<Uuid>) -> Result<(), ApiError> {
    if let Some(employee) = assignee {
        if state.employees.find_by_id(employee).await?.is_none() {
            return Err(ApiError::bad_request(format!(
                "Assigned employee {} does not exist",
                employee
            )));
        }
    }
    Ok(())
}

/// GET /api/assets
pub async fn list_assets(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    params: Result<Query<AssetListParams>, QueryRejection>,
) -> Result<Json<Vec<Asset>>, ApiError> {
    authorize(&user, Resource::Assets, Action::View)?;
    let Query(params) = params?;

    let assets = state.assets.find(&params.filter()?).await?;
    Ok(Json(assets))
}

/// GET /api/assets/:id
pub async fn get_asset(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Asset>, ApiError> {
    authorize(&user, Resource::Assets, Action::View)?;
    Ok(Json(load(&state, id).await?))
}

/// POST /api/assets
pub async fn create_asset(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<NewAsset>, JsonRejection>,
) -> Result<(StatusCode, Json<Asset>), ApiError> {
    authorize(&user, Resource::Assets, Action::Create)?;
    let Json(input) = payload?;

    check_assignee(&state, input.assigned_to).await?;
    let asset = Asset::new(input, Utc::now()).map_err(ApiError::bad_request)?;
    state.assets.create(&asset).await?;
    tracing::info!(asset_id = %asset.id, category = %asset.category, "asset created");

    Ok((StatusCode::CREATED, Json(asset)))
}

/// PUT /api/assets/:id
pub async fn update_asset(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<AssetChanges>, JsonRejection>,
) -> Result<Json<Asset>, ApiError> {
    authorize(&user, Resource::Assets, Action::Update)?;
    let Json(changes) = payload?;

    if let Some(assignee) = changes.assigned_to {
        check_assignee(&state, assignee).await?;
    }

    let mut asset = load(&state, id).await?;
    asset.apply(changes, Utc::now()).map_err(ApiError::bad_request)?;
    state.assets.update(&asset).await?;

    Ok(Json(asset))
}

/// DELETE /api/assets/:id
pub async fn delete_asset(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    authorize(&user, Resource::Assets, Action::Delete)?;

    state.assets.delete(id).await?;
    tracing::info!(asset_id = %id, "asset removed");
    Ok(Json(json!({ "message": "Asset removed" })))
}
