use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use serde_json::json;

use crate::api::{ApiResponse, AppState};
use crate::auth::{jwt_auth_middleware, require_roles, CurrentUser};
use crate::errors::AppError;
use crate::models::{CreateInstructorRequest, CreateStudentRequest, Role, UpdateUserRequest, UserFilter};

/// User management routes, all behind authentication
pub fn user_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route(
            "/students",
            post(create_student).route_layer(middleware::from_fn(require_roles(&[
                Role::Admin,
                Role::Instructor,
            ]))),
        )
        .route(
            "/instructors",
            post(create_instructor).route_layer(middleware::from_fn(require_roles(&[Role::Admin]))),
        )
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route_layer(middleware::from_fn_with_state(
            state.auth_service.clone(),
            jwt_auth_middleware,
        ))
}

#[tracing::instrument(skip(state, current_user))]
async fn list_users(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Query(filter), _): WithRejection<Query<UserFilter>, AppError>,
) -> Result<Json<ApiResponse>, AppError> {
    let users = state.services.users.list_users(&current_user, &filter).await;
    Ok(ApiResponse::list(users.len(), json!({ "users": users })))
}

#[tracing::instrument(skip(state, current_user, request))]
async fn create_student(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Json(request), _): WithRejection<Json<CreateStudentRequest>, AppError>,
) -> Result<(StatusCode, Json<ApiResponse>), AppError> {
    let user = state.services.users.create_student(&current_user, request).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(json!({ "user": user }))))
}

#[tracing::instrument(skip(state, current_user, request))]
async fn create_instructor(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Json(request), _): WithRejection<Json<CreateInstructorRequest>, AppError>,
) -> Result<(StatusCode, Json<ApiResponse>), AppError> {
    let user = state
        .services
        .users
        .create_instructor(&current_user, request)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::success(json!({ "user": user }))))
}

#[tracing::instrument(skip(state, current_user))]
async fn get_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<ApiResponse>, AppError> {
    let user = state.services.users.get_user(&current_user, id).await?;
    Ok(ApiResponse::success(json!({ "user": user })))
}

#[tracing::instrument(skip(state, current_user, request))]
async fn update_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateUserRequest>, AppError>,
) -> Result<Json<ApiResponse>, AppError> {
    let user = state
        .services
        .users
        .update_user(&current_user, id, request)
        .await?;
    Ok(ApiResponse::success(json!({ "user": user })))
}

#[tracing::instrument(skip(state, current_user))]
async fn delete_user(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<StatusCode, AppError> {
    state.services.users.delete_user(&current_user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
