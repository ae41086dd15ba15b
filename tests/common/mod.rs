#![allow(dead_code)]

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Once;
use tower::ServiceExt;

use gym_manager::api::{create_routes, AppState};
use gym_manager::config::{AppConfig, DatabaseSeeder};
use gym_manager::models::Role;
use gym_manager::store::{Database, SharedDatabase};

pub use gym_manager::config::seeding::{
    DEMO_ADMIN_PASSWORD, DEMO_INSTRUCTOR_PASSWORD, DEMO_STUDENT_PASSWORD,
};

pub const ADMIN_ID: i64 = 1;
pub const INSTRUCTOR_ID: i64 = 2;
pub const STUDENT_ID: i64 = 3;
pub const OTHER_STUDENT_ID: i64 = 4;

static INIT: Once = Once::new();

/// Initialize test logging
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("gym_manager=debug")
            .with_test_writer()
            .try_init();
    });
}

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: "test_secret_key_for_testing_only".to_string(),
        bcrypt_cost: 4,
        ..AppConfig::default()
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub db: SharedDatabase,
}

impl TestApp {
    /// Router over a freshly seeded store
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        init_test_logging();

        let db = Database::empty().shared();
        DatabaseSeeder::new(db.clone(), config.bcrypt_cost)
            .seed_all()
            .await
            .expect("Failed to seed test data");

        let state = AppState::new(db.clone(), &config);
        Self {
            router: create_routes(state.clone()),
            state,
            db,
        }
    }

    pub fn token(&self, user_id: i64, role: Role) -> String {
        self.state
            .auth_service
            .jwt()
            .create_token(user_id, role)
            .expect("token")
    }

    pub fn admin_token(&self) -> String {
        self.token(ADMIN_ID, Role::Admin)
    }

    pub fn instructor_token(&self) -> String {
        self.token(INSTRUCTOR_ID, Role::Instructor)
    }

    pub fn student_token(&self) -> String {
        self.token(STUDENT_ID, Role::Student)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// GET `/health` as if sent over a connection from `peer`
    pub async fn health_from(&self, peer: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::builder().method(Method::GET).uri("/health");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let mut request = builder.body(Body::empty()).unwrap();
        let peer: SocketAddr = peer.parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));

        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// POST a GraphQL document, optionally authenticated
    pub async fn graphql(&self, token: Option<&str>, query: &str, variables: Value) -> TestResponse {
        let body = serde_json::json!({ "query": query, "variables": variables });
        self.request(Method::POST, "/graphql", token, Some(body)).await
    }
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// First GraphQL error code, if any
    pub fn graphql_error_code(&self) -> Option<&str> {
        self.body["errors"][0]["extensions"]["code"].as_str()
    }
}
