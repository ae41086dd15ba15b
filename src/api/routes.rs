use axum::{middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::auth::auth_routes;
use super::exercises::exercise_routes;
use super::health::{health_check, route_not_found};
use super::modifiers::modifier_routes;
use super::sessions::session_routes;
use super::users::user_routes;
use super::workout_plans::workout_plan_routes;
use super::AppState;
use crate::auth::{cors_layer, rate_limit_middleware, security_headers_layer};
use crate::graphql::{graphiql, graphql_handler};

pub fn create_routes(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes())
        .nest("/users-management", user_routes(&state))
        .nest("/exercises", exercise_routes(&state))
        .nest("/modifiers", modifier_routes(&state))
        .nest("/workout-plans", workout_plan_routes(&state))
        .nest("/sessions", session_routes(&state));

    Router::new()
        .route("/health", get(health_check))
        .route("/graphql", get(graphiql).post(graphql_handler))
        .nest("/api/v1", api)
        .fallback(route_not_found)
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit_middleware,
        ))
        .layer(security_headers_layer())
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
