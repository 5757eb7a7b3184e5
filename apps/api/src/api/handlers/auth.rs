use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::{CurrentUser, RequireAdmin};
use crate::api::state::AppState;
use crate::auth::jwt::create_token;
use crate::auth::password::{hash_password, verify_password};
use crate::domain::period::deserialize_nullable;
use crate::domain::user::user::validate_password;
use crate::domain::user::{Email, PermissionMatrix, Role, User};

/// Request body for user registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account as exposed over the API; never carries the password hash
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub permissions: PermissionMatrix,
    pub is_active: bool,
    pub employee_id: Option<Uuid>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            permissions: user.permissions,
            is_active: user.is_active,
            employee_id: user.employee_id,
            last_login: user.last_login,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Response from successful registration or login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Self-service profile changes
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Administrative account changes
///
/// An explicit `permissions` matrix wins over the one derived from a new role.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub permissions: Option<PermissionMatrix>,
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub employee_id: Option<Option<Uuid>>,
}

fn issue_token(state: &AppState, user: &User) -> Result<String, ApiError> {
    create_token(
        user.id,
        user.role,
        &state.auth.jwt_secret,
        state.auth.token_ttl_hours,
    )
    .map_err(ApiError::internal_server_error)
}

fn parse_email(raw: &str) -> Result<Email, ApiError> {
    Email::normalized(raw).map_err(ApiError::bad_request)
}

fn hash(state: &AppState, password: &str) -> Result<String, ApiError> {
    validate_password(password).map_err(ApiError::bad_request)?;
    hash_password(password, state.auth.bcrypt_cost).map_err(ApiError::internal_server_error)
}

/// Register a new user
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(req) = payload?;
    let email = parse_email(&req.email)?;

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::bad_request("User already exists"));
    }

    let password_hash = hash(&state, &req.password)?;

    // The very first account administers the installation
    let role = if state.users.count().await? == 0 {
        Role::Admin
    } else {
        Role::Employee
    };

    let user = User::new(req.name, email, password_hash, role, Utc::now())
        .map_err(ApiError::bad_request)?;
    state.users.create(&user).await?;
    tracing::info!(user_id = %user.id, %role, "user registered");

    let token = issue_token(&state, &user)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// Login with email and password
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(req) = payload?;
    let email = Email::normalized(&req.email)
        .map_err(|_| ApiError::unauthorized("Invalid credentials"))?;

    let mut user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !user.is_active {
        return Err(ApiError::unauthorized(
            "Account is inactive. Please contact an administrator",
        ));
    }

    let valid = verify_password(&req.password, &user.password_hash)
        .map_err(ApiError::internal_server_error)?;
    if !valid {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let now = Utc::now();
    state.users.update_last_login(user.id, now).await?;
    user.last_login = Some(now);

    let token = issue_token(&state, &user)?;
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// GET /api/auth/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(user.into())
}

/// PUT /api/auth/me
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(mut user): CurrentUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let Json(req) = payload?;

    if let Some(name) = req.name {
        user.rename(name).map_err(ApiError::bad_request)?;
    }
    if let Some(email) = req.email {
        user.email = parse_email(&email)?;
    }
    if let Some(password) = req.password {
        user.password_hash = hash(&state, &password)?;
    }

    user.updated_at = Utc::now();
    state.users.update(&user).await?;
    Ok(Json(user.into()))
}

/// GET /api/auth/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<Vec<UserProfile>>, ApiError> {
    let users = state.users.find_all().await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}

async fn load_user(state: &AppState, id: Uuid) -> Result<User, ApiError> {
    state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// GET /api/auth/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, ApiError> {
    Ok(Json(load_user(&state, id).await?.into()))
}

/// PUT /api/auth/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let Json(req) = payload?;
    let mut user = load_user(&state, id).await?;

    if let Some(name) = req.name {
        user.rename(name).map_err(ApiError::bad_request)?;
    }
    if let Some(email) = req.email {
        user.email = parse_email(&email)?;
    }
    if let Some(role) = req.role {
        user.change_role(role);
    }
    if let Some(permissions) = req.permissions {
        user.permissions = permissions;
    }
    if let Some(is_active) = req.is_active {
        user.is_active = is_active;
    }
    if let Some(employee_id) = req.employee_id {
        if let Some(employee) = employee_id {
            state
                .employees
                .find_by_id(employee)
                .await?
                .ok_or_else(|| ApiError::bad_request("Linked employee does not exist"))?;
        }
        user.employee_id = employee_id;
    }

    user.updated_at = Utc::now();
    state.users.update(&user).await?;
    tracing::info!(user_id = %user.id, role = %user.role, "user updated");
    Ok(Json(user.into()))
}

/// DELETE /api/auth/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if admin.id == id {
        return Err(ApiError::bad_request("You cannot delete your own account"));
    }

    state.users.delete(id).await?;
    tracing::info!(user_id = %id, "user removed");
    Ok(Json(serde_json::json!({ "message": "User removed" })))
}
