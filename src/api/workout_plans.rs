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
use crate::models::{CreateWorkoutPlanRequest, UpdateWorkoutPlanRequest, WorkoutPlanFilter};

pub fn workout_plan_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_workout_plans).post(create_workout_plan))
        .route(
            "/:id",
            get(get_workout_plan)
                .put(update_workout_plan)
                .delete(delete_workout_plan),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth_service.clone(),
            jwt_auth_middleware,
        ))
}

#[tracing::instrument(skip(state, current_user))]
async fn list_workout_plans(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Query(filter), _): WithRejection<Query<WorkoutPlanFilter>, AppError>,
) -> Result<Json<ApiResponse>, AppError> {
    let plans = state
        .services
        .workout_plans
        .list_workout_plans(&current_user, &filter)
        .await;
    Ok(ApiResponse::list(plans.len(), json!({ "workout_plans": plans })))
}

#[tracing::instrument(skip(state, current_user, request))]
async fn create_workout_plan(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Json(request), _): WithRejection<Json<CreateWorkoutPlanRequest>, AppError>,
) -> Result<(StatusCode, Json<ApiResponse>), AppError> {
    let plan = state
        .services
        .workout_plans
        .create_workout_plan(&current_user, request)
        .await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success(json!({ "workout_plan": plan })),
    ))
}

#[tracing::instrument(skip(state, current_user))]
async fn get_workout_plan(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<Json<ApiResponse>, AppError> {
    let plan = state
        .services
        .workout_plans
        .get_workout_plan(&current_user, id)
        .await?;
    Ok(ApiResponse::success(json!({ "workout_plan": plan })))
}

#[tracing::instrument(skip(state, current_user, request))]
async fn update_workout_plan(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateWorkoutPlanRequest>, AppError>,
) -> Result<Json<ApiResponse>, AppError> {
    let plan = state
        .services
        .workout_plans
        .update_workout_plan(&current_user, id, request)
        .await?;
    Ok(ApiResponse::success(json!({ "workout_plan": plan })))
}

#[tracing::instrument(skip(state, current_user))]
async fn delete_workout_plan(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> Result<StatusCode, AppError> {
    state
        .services
        .workout_plans
        .delete_workout_plan(&current_user, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
