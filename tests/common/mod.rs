#![allow(dead_code)]

pub mod mocks;

use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;
use storegate::{
    api::routes::build_app, auth::jwt::AuthService, db::DatabaseClient, AppState,
    StoregateConfig, TursoClient,
};

pub const TEST_SECRET: &str = "test-secret-at-least-32-characters-long";

/// A running test server plus the state behind it.
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

pub fn test_state(db: Arc<dyn DatabaseClient>, enforce_revocation: bool) -> AppState {
    let mut config = StoregateConfig::default();
    config.auth.enforce_revocation = enforce_revocation;

    AppState {
        auth_service: Arc::new(AuthService::new(
            TEST_SECRET.to_string(),
            config.auth.token_ttl_secs(),
        )),
        config: Arc::new(config),
        db,
    }
}

pub async fn spawn_app_with(db: Arc<dyn DatabaseClient>, enforce_revocation: bool) -> TestApp {
    let state = test_state(db, enforce_revocation);
    let server = TestServer::new(build_app(state.clone())).expect("Failed to create test server");

    TestApp { server, state }
}

pub async fn spawn_app(enforce_revocation: bool) -> TestApp {
    let db = TursoClient::new_memory()
        .await
        .expect("Failed to create in-memory database");

    spawn_app_with(Arc::new(db), enforce_revocation).await
}

/// Register a user through the API and return the created body.
pub async fn register(server: &TestServer, name: &str, email: &str, password: &str) -> Value {
    let response = server
        .post("/api/users")
        .json(&json!({
            "name": name,
            "email": email,
            "password": password,
            "role": "staff",
            "profile": {
                "first_name": name,
                "last_name": "Tester",
                "phone": "555-0100"
            }
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}

/// Log in through the API and return the session token.
pub async fn login(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": email, "password": password }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    body["token"]
        .as_str()
        .expect("login response carries a token")
        .to_string()
}
