//! Shared helpers for HTTP tests.

use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use serde_json::json;

use crate::{
    AppState, Application,
    api::models::developers::AuthResponse,
    auth::password::{self, Argon2Params},
    config::{Config, DatabaseConfig, Environment, PasswordConfig},
    db::{MemoryStore, models::developers::{DeveloperCreateDBRequest, DeveloperDBResponse}},
    types::Role,
};

/// Test configuration: in-memory storage and cheap password hashing.
pub fn create_test_config() -> Config {
    let mut config = Config {
        jwt_secret: Some("test-signing-secret".to_string()),
        environment: Environment::Test,
        database: DatabaseConfig::Memory,
        ..Default::default()
    };
    config.auth.password = PasswordConfig {
        argon2_memory_kib: 1024,
        argon2_iterations: 1,
        argon2_parallelism: 1,
    };
    config.auth.token_lifetime = Duration::from_secs(7 * 24 * 3600);
    config
}

/// Build the full router over a fresh [`MemoryStore`].
pub async fn create_test_app(config: Config) -> (TestServer, AppState) {
    let app = Application::with_store(config, Arc::new(MemoryStore::new()))
        .await
        .expect("Failed to build test application");
    let state = app.state().clone();
    (app.into_test_server(), state)
}

/// Register an account through the API and return the response body.
pub async fn register(server: &TestServer, name: &str, email: &str, password: &str) -> AuthResponse {
    let response = server
        .post("/api/developers/register")
        .json(&json!({
            "name": name,
            "email": email,
            "password": password,
            "confirmPassword": password,
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}

/// Log in through the API and return the session token.
pub async fn login(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/api/developers/login")
        .json(&json!({"email": email, "password": password}))
        .await;
    response.assert_status_ok();
    response.json::<AuthResponse>().token
}

/// Insert an admin account directly into the store.
pub async fn create_admin(state: &AppState, email: &str, password: &str) -> DeveloperDBResponse {
    let password_hash = password::hash_password_blocking(password.to_string(), Argon2Params::from(&state.config.auth.password))
        .await
        .expect("Failed to hash admin password");

    state
        .store
        .create_developer(&DeveloperCreateDBRequest {
            name: "Root".to_string(),
            last_name: None,
            email: email.to_lowercase(),
            password_hash,
            role: Role::admin(),
            profile_image: None,
        })
        .await
        .expect("Failed to create admin")
}
