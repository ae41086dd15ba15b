use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::get,
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use serde_json::json;

use crate::api::{ApiResponse, AppState};
use crate::auth::{jwt_auth_middleware, CurrentUser};
use crate::errors::AppError;
use crate::models::{CreateModifierRequest, UpdateModifierRequest};

pub fn modifier_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_modifiers).post(create_modifier))
        .route(
            "/:id",
            get(get_modifier).put(update_modifier).delete(delete_modifier),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth_service.clone(),
            jwt_auth_middleware,
        ))
}

#[tracing::instrument(skip(state))]
async fn list_modifiers(State(state): State<AppState>) -> Json<ApiResponse> {
    let modifiers = state.services.modifiers.list_modifiers().await;
    ApiResponse::list(modifiers.len(), json!({ "modifiers": modifiers }))
}

#[tracing::instrument(skip(state, current_user, request))]
async fn create_modifier(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Json(request), _): WithRejection<Json<CreateModifierRequest>, AppError>,
) -> Result<(StatusCode, Json<ApiResponse>), AppError> {
    let modifier = state
        .services
        .modifiers
        .create_modifier(&current_user, request)
        .await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success(json!({ "modifier": modifier })),
    ))
}

#[tracing::instrument(skip(state))]
async fn get_modifier(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<ApiResponse>, AppError> {
    let modifier = state.services.modifiers.get_modifier(id).await?;
    Ok(ApiResponse::success(json!({ "modifier": modifier })))
}

#[tracing::instrument(skip(state, current_user, request))]
async fn update_modifier(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateModifierRequest>, AppError>,
) -> Result<Json<ApiResponse>, AppError> {
    let modifier = state
        .services
        .modifiers
        .update_modifier(&current_user, id, request)
        .await?;
    Ok(ApiResponse::success(json!({ "modifier": modifier })))
}

#[tracing::instrument(skip(state, current_user))]
async fn delete_modifier(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<StatusCode, AppError> {
    state
        .services
        .modifiers
        .delete_modifier(&current_user, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
