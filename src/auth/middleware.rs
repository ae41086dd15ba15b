use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::auth::{access::forbidden, extract_bearer_token, AuthError, AuthService, CurrentUser};
use crate::errors::AppError;
use crate::models::Role;

/// Pull the bearer token out of the request headers
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    extract_bearer_token(auth_header)
}

/// JWT authentication middleware
pub async fn jwt_auth_middleware(
    State(auth_service): State<AuthService>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(request.headers())?;
    let current_user = auth_service.authenticate(token).await?;

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Role-based authorization middleware
pub fn require_roles(
    roles: &'static [Role],
) -> impl Fn(Request, Next) -> futures::future::BoxFuture<'static, Result<Response, AppError>> + Clone {
    move |request: Request, next: Next| {
        Box::pin(async move {
            let current_user = request
                .extensions()
                .get::<CurrentUser>()
                .ok_or(AuthError::NotLoggedIn)?;

            if !roles.contains(&current_user.role) {
                return Err(forbidden());
            }

            Ok(next.run(request).await)
        })
    }
}

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Security headers middleware
pub fn security_headers_layer() -> tower_http::set_header::SetResponseHeaderLayer<axum::http::HeaderValue> {
    tower_http::set_header::SetResponseHeaderLayer::overriding(
        axum::http::header::HeaderName::from_static("x-content-type-options"),
        axum::http::HeaderValue::from_static("nosniff"),
    )
}

/// Fixed-window, per-client request limiter
#[derive(Debug, Clone)]
pub struct RateLimiter {
    requests: Arc<Mutex<HashMap<String, Vec<Instant>>>>,
    max_requests: usize,
    window: Duration,
    trust_proxy: bool,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
            trust_proxy: false,
        }
    }

    /// Key clients on proxy headers; only safe behind a proxy that sets them
    pub fn with_trusted_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }

    /// Client identity for limiting: the peer IP, or the forwarded client behind a trusted proxy
    pub fn client_key(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
        if self.trust_proxy {
            let forwarded = headers
                .get("x-forwarded-for")
                .and_then(|header| header.to_str().ok())
                .and_then(|value| value.split(',').next())
                .or_else(|| {
                    headers
                        .get("x-real-ip")
                        .and_then(|header| header.to_str().ok())
                })
                .map(str::trim)
                .filter(|value| !value.is_empty());

            if let Some(client) = forwarded {
                return client.to_string();
            }
        }

        match peer {
            Some(addr) => addr.ip().to_string(),
            None => "unknown".to_string(),
        }
    }

    pub fn check_rate_limit(&self, key: &str) -> bool {
        let mut requests = match self.requests.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();

        let entry = requests.entry(key.to_string()).or_default();

        // Drop requests outside the window
        entry.retain(|&time| now.duration_since(time) < self.window);

        if entry.len() >= self.max_requests {
            return false;
        }

        entry.push(now);
        true
    }
}

/// Rate limiting middleware function
pub async fn rate_limit_middleware(
    State(rate_limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client_key = rate_limiter.client_key(request.headers(), peer);

    if !rate_limiter.check_rate_limit(&client_key) {
        tracing::warn!(client = %client_key, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "status": "fail",
                "message": "Too many requests from this IP, please try again later.",
            })),
        )
            .into_response();
    }

    next.run(request).await
}
