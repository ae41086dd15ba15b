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
use crate::models::{CreateExerciseRequest, ExerciseFilter, UpdateExerciseRequest};

pub fn exercise_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_exercises).post(create_exercise))
        .route(
            "/:id",
            get(get_exercise).put(update_exercise).delete(delete_exercise),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth_service.clone(),
            jwt_auth_middleware,
        ))
}

#[tracing::instrument(skip(state))]
async fn list_exercises(
    State(state): State<AppState>,
    WithRejection(Query(filter), _): WithRejection<Query<ExerciseFilter>, AppError>,
) -> Result<Json<ApiResponse>, AppError> {
    let exercises = state.services.exercises.list_exercises(&filter).await;
    Ok(ApiResponse::list(
        exercises.len(),
        json!({ "exercises": exercises }),
    ))
}

#[tracing::instrument(skip(state, current_user, request))]
async fn create_exercise(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Json(request), _): WithRejection<Json<CreateExerciseRequest>, AppError>,
) -> Result<(StatusCode, Json<ApiResponse>), AppError> {
    let exercise = state
        .services
        .exercises
        .create_exercise(&current_user, request)
        .await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success(json!({ "exercise": exercise })),
    ))
}

#[tracing::instrument(skip(state))]
async fn get_exercise(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<ApiResponse>, AppError> {
    let exercise = state.services.exercises.get_exercise(id).await?;
    Ok(ApiResponse::success(json!({ "exercise": exercise })))
}

#[tracing::instrument(skip(state, current_user, request))]
async fn update_exercise(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateExerciseRequest>, AppError>,
) -> Result<Json<ApiResponse>, AppError> {
    let exercise = state
        .services
        .exercises
        .update_exercise(&current_user, id, request)
        .await?;
    Ok(ApiResponse::success(json!({ "exercise": exercise })))
}

#[tracing::instrument(skip(state, current_user))]
async fn delete_exercise(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<StatusCode, AppError> {
    state
        .services
        .exercises
        .delete_exercise(&current_user, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
