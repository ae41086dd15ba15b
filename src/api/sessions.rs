use axum::{
    extract::{Path, Query, State},
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
use crate::models::{CreateSessionRequest, SessionFilter, UpdateSessionRequest};

pub fn session_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_sessions).post(create_session))
        .route(
            "/:id",
            get(get_session).put(update_session).delete(delete_session),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth_service.clone(),
            jwt_auth_middleware,
        ))
}

#[tracing::instrument(skip(state, current_user))]
async fn list_sessions(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Query(filter), _): WithRejection<Query<SessionFilter>, AppError>,
) -> Result<Json<ApiResponse>, AppError> {
    let sessions = state
        .services
        .sessions
        .list_sessions(&current_user, &filter)
        .await;
    Ok(ApiResponse::list(sessions.len(), json!({ "sessions": sessions })))
}

#[tracing::instrument(skip(state, current_user, request))]
async fn create_session(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Json(request), _): WithRejection<Json<CreateSessionRequest>, AppError>,
) -> Result<(StatusCode, Json<ApiResponse>), AppError> {
    let session = state
        .services
        .sessions
        .create_session(&current_user, request)
        .await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success(json!({ "session": session })),
    ))
}

#[tracing::instrument(skip(state, current_user))]
async fn get_session(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<ApiResponse>, AppError> {
    let session = state.services.sessions.get_session(&current_user, id).await?;
    Ok(ApiResponse::success(json!({ "session": session })))
}

#[tracing::instrument(skip(state, current_user, request))]
async fn update_session(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateSessionRequest>, AppError>,
) -> Result<Json<ApiResponse>, AppError> {
    let session = state
        .services
        .sessions
        .update_session(&current_user, id, request)
        .await?;
    Ok(ApiResponse::success(json!({ "session": session })))
}

#[tracing::instrument(skip(state, current_user))]
async fn delete_session(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<StatusCode, AppError> {
    state
        .services
        .sessions
        .delete_session(&current_user, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
