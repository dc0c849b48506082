#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use notes_api::config::{
    AppConfig, DatabaseConfig, Environment, PasswordConfig, SecurityConfig, ServerConfig,
};
use notes_api::database::Store;
use notes_api::{app, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

/// Router over a fresh in-memory store with cheap password hashing
pub fn test_app() -> TestApp {
    let config = AppConfig {
        environment: Environment::Development,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "memory://".to_string(),
            max_connections: 1,
            connection_timeout: 1,
        },
        security: SecurityConfig {
            jwt_secret: TEST_SECRET.to_string(),
            cors_origins: vec!["http://localhost:5173".to_string()],
        },
        password: PasswordConfig {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        },
    };

    let state = AppState::new(&config, Store::memory()).expect("test state");
    let router = app(state.clone(), &config.security.cors_origins);
    TestApp { router, state }
}

impl TestApp {
    /// Send a request and decode the JSON response body (Null if empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response was not JSON")?
        };
        Ok((status, value))
    }

    /// Register an account and return its token and user id
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<(String, String)> {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/signup",
                None,
                Some(serde_json::json!({ "name": name, "email": email, "password": password })),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "signup failed: {} {}", status, body);

        let token = body["token"].as_str().context("token missing")?.to_string();
        let id = body["user"]["id"].as_str().context("user id missing")?.to_string();
        Ok((token, id))
    }

    pub async fn create_note(&self, token: &str, title: &str, content: &str) -> Result<Value> {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/notes",
                Some(token),
                Some(serde_json::json!({ "title": title, "content": content })),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create failed: {} {}", status, body);
        Ok(body)
    }
}
