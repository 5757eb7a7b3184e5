use axum::Json;
use serde_json::{json, Value};

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

/// GET /
pub async fn welcome() -> Json<Value> {
    Json(json!({
        "message": "Office management API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
