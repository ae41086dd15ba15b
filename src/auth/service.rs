use crate::auth::password::verify_password;
use crate::auth::{AuthError, CurrentUser, JwtService, LoginRequest, LoginResponse};
use crate::store::SharedDatabase;

#[derive(Debug, Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    db: SharedDatabase,
}

impl AuthService {
    pub fn new(db: SharedDatabase, jwt_service: JwtService) -> Self {
        Self { jwt_service, db }
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt_service
    }

    /// Login by email or document
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        let db = self.db.read().await;

        let user = db
            .user_by_login(request.document_or_email.trim())
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash)? {
            tracing::warn!(user_id = user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active() {
            return Err(AuthError::InactiveAccount);
        }

        let token = self.jwt_service.create_token(user.id, user.role)?;
        tracing::info!(user_id = user.id, role = %user.role, "User logged in");

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.expires_in_seconds(),
            user: db.user_response(user),
        })
    }

    /// Resolve a bearer token to the user it names, who must still exist and be active
    pub async fn authenticate(&self, token: &str) -> Result<CurrentUser, AuthError> {
        let claims = self.jwt_service.validate_token(token)?;
        let user_id = claims.user_id().ok_or(AuthError::InvalidToken)?;

        let db = self.db.read().await;
        let user = db.user(user_id).ok_or(AuthError::UserNoLongerExists)?;

        if !user.is_active() {
            return Err(AuthError::InactiveAccount);
        }

        Ok(CurrentUser::from(user))
    }
}
