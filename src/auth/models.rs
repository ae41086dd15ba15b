use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Role, User, UserResponse, UserStatus};

/// JWT token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // Subject (user ID)
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Document or email is required"))]
    pub document_or_email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, SimpleObject)]
#[graphql(name = "AuthPayload")]
pub struct LoginResponse {
    pub token: String,
    #[graphql(skip)]
    pub token_type: String,
    #[graphql(skip)]
    pub expires_in: i64,
    pub user: UserResponse,
}

/// The authenticated user acting on a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub role: Role,
    pub status: UserStatus,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_instructor(&self) -> bool {
        self.role == Role::Instructor
    }

    pub fn is_student(&self) -> bool {
        self.role == Role::Student
    }

    pub fn is_owner(&self, user_id: i64) -> bool {
        self.id == user_id
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            status: user.status,
        }
    }
}
