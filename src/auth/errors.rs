use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::errors::AppError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials.")]
    InvalidCredentials,
    #[error("User account is inactive.")]
    InactiveAccount,
    #[error("You are not logged in. Please log in to get access.")]
    MissingAuthHeader,
    #[error("Invalid authorization header format.")]
    InvalidAuthHeaderFormat,
    #[error("Invalid token. Please log in again.")]
    InvalidToken,
    #[error("Your token has expired. Please log in again.")]
    TokenExpired,
    #[error("The user belonging to this token no longer exists.")]
    UserNoLongerExists,
    #[error("You must be logged in.")]
    NotLoggedIn,
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Password hashing error: {0}")]
    PasswordHashing(#[from] crate::auth::password::PasswordError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
