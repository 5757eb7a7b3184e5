// HTTP routing
// Shared by the binary and the integration tests

use axum::{routing::get, routing::post, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{analytics, assets, auth, employees, expenses, health, income};
use super::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/", get(health::welcome))
        .route("/health", get(health::health_check))
        // Auth and user administration
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me).put(auth::update_me))
        .route("/api/auth/users", get(auth::list_users))
        .route(
            "/api/auth/users/:id",
            get(auth::get_user)
                .put(auth::update_user)
                .delete(auth::delete_user),
        )
        // Employees
        .route(
            "/api/employees",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route(
            "/api/employees/:id",
            get(employees::get_employee)
                .put(employees::update_employee)
                .delete(employees::delete_employee),
        )
        // Assets
        .route(
            "/api/assets",
            get(assets::list_assets).post(assets::create_asset),
        )
        .route(
            "/api/assets/:id",
            get(assets::get_asset)
                .put(assets::update_asset)
                .delete(assets::delete_asset),
        )
        // Expenses
        .route(
            "/api/expenses",
            get(expenses::list_expenses).post(expenses::create_expense),
        )
        .route(
            "/api/expenses/summary/category",
            get(expenses::category_summary),
        )
        .route("/api/expenses/summary/monthly", get(expenses::monthly_summary))
        .route(
            "/api/expenses/:id",
            get(expenses::get_expense)
                .put(expenses::update_expense)
                .delete(expenses::delete_expense),
        )
        // Income
        .route(
            "/api/income",
            get(income::list_income).post(income::create_income),
        )
        .route("/api/income/summary/category", get(income::category_summary))
        .route("/api/income/summary/monthly", get(income::monthly_summary))
        .route("/api/income/summary/clients", get(income::client_summary))
        .route(
            "/api/income/:id",
            get(income::get_income)
                .put(income::update_income)
                .delete(income::delete_income),
        )
        // Analytics
        .route("/api/analytics/dashboard", get(analytics::dashboard))
        .route(
            "/api/analytics/financial-overview",
            get(analytics::financial_overview),
        )
        .route("/api/analytics/employees", get(analytics::employee_analytics))
        .route("/api/analytics/assets", get(analytics::asset_analytics))
        .route("/api/analytics/comparative", get(analytics::comparative))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Shared state
        .with_state(state)
}
