use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::auth::{AuthError, PasswordError};

/// Errors surfaced by the service layer to both the REST and GraphQL APIs
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<String>,
    },
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Duplicate(String),
    /// A delete (or re-link) would leave dangling references behind
    #[error("{0}")]
    InUse(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            details: None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. }
            | AppError::BadRequest(_)
            | AppError::Duplicate(_)
            | AppError::InUse(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code, shared with GraphQL error extensions
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } | AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Duplicate(_) => "DUPLICATE",
            AppError::InUse(_) => "RESOURCE_IN_USE",
            AppError::Unauthorized(_) => "UNAUTHENTICATED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Internal(_) => "INTERNAL",
        }
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            AppError::Validation { details, .. } => details.as_deref(),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = if status.is_server_error() {
            tracing::error!("Unhandled error: {:?}", self);
            json!({
                "status": "error",
                "message": "Something went very wrong!",
            })
        } else {
            json!({
                "status": "fail",
                "code": self.code(),
                "message": self.to_string(),
                "details": self.details(),
            })
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation {
            message: "Invalid request data.".to_string(),
            details: Some(errors.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation {
            message: "Invalid request data.".to_string(),
            details: Some(rejection.body_text()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation {
            message: "Invalid query parameters.".to_string(),
            details: Some(rejection.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation {
            message: "Invalid path parameters.".to_string(),
            details: Some(rejection.body_text()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::PasswordHashing(inner) => AppError::Internal(anyhow::Error::new(inner)),
            AuthError::Jwt(inner) => AppError::Internal(anyhow::Error::new(inner)),
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}
