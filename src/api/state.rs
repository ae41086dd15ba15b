use crate::auth::{AuthService, JwtService, RateLimiter};
use crate::config::AppConfig;
use crate::graphql::{build_schema, GymSchema};
use crate::services::Services;
use crate::store::SharedDatabase;

/// State shared by every REST router and the GraphQL endpoint
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub auth_service: AuthService,
    pub schema: GymSchema,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(db: SharedDatabase, config: &AppConfig) -> Self {
        let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expires_in_secs);
        let auth_service = AuthService::new(db.clone(), jwt_service);
        let services = Services::new(db, config.bcrypt_cost);
        let schema = build_schema(services.clone(), auth_service.clone());

        Self {
            services,
            auth_service,
            schema,
            rate_limiter: RateLimiter::new(config.rate_limit_max_requests, config.rate_limit_window)
                .with_trusted_proxy(config.trust_proxy),
        }
    }
}
