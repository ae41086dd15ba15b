// GraphQL surface over the same services as the REST API

pub mod schema;

pub use schema::{build_schema, GymSchema, MutationRoot, QueryRoot};

use async_graphql::{http::GraphiQLSource, ErrorExtensions};
use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, Json},
};
use axum_extra::extract::WithRejection;

use crate::api::AppState;
use crate::auth::bearer_token;
use crate::errors::AppError;

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        let code = match self {
            AppError::Validation { .. }
            | AppError::BadRequest(_)
            | AppError::Duplicate(_)
            | AppError::InUse(_) => "BAD_REQUEST",
            AppError::Unauthorized(_) => "UNAUTHENTICATED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Internal(err) => {
                tracing::error!("GraphQL resolver failed: {:?}", err);
                "INTERNAL"
            }
        };
        let details = self.details().map(str::to_string);

        async_graphql::Error::new(self.to_string()).extend_with(|_, extensions| {
            extensions.set("code", code);
            if let Some(details) = details {
                extensions.set("details", details);
            }
        })
    }
}

/// Executes a GraphQL request; a valid bearer token makes its user the acting user
#[tracing::instrument(skip(state, headers, request))]
pub async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    WithRejection(Json(request), _): WithRejection<Json<async_graphql::Request>, AppError>,
) -> Json<async_graphql::Response> {
    let mut request = request;

    if let Ok(token) = bearer_token(&headers) {
        match state.auth_service.authenticate(token).await {
            Ok(current_user) => request = request.data(current_user),
            Err(err) => tracing::debug!("Ignoring GraphQL bearer token: {}", err),
        }
    }

    Json(state.schema.execute(request).await)
}

pub async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
