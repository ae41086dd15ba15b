use axum::{http::Uri, response::Json};
use serde_json::{json, Value};

use crate::errors::AppError;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "gym-manager",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// JSON 404 for any unmatched route
pub async fn route_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Can't find {} on this server!", uri.path()))
}
