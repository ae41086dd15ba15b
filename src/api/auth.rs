use axum::{extract::State, response::Json, routing::post, Router};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use validator::Validate;

use crate::api::AppState;
use crate::auth::LoginRequest;
use crate::errors::AppError;

/// Authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Login with email or document
#[tracing::instrument(skip(state, request))]
async fn login(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<Value>, AppError> {
    request.validate()?;

    let response = state.auth_service.login(request).await?;

    Ok(Json(json!({
        "status": "success",
        "token": response.token,
        "token_type": response.token_type,
        "expires_in": response.expires_in,
        "data": { "user": response.user },
    })))
}
