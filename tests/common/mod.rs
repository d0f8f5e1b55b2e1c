#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Algorithm, Argon2, Params, Version,
};
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use bilemo_api::auth::{Principal, PrincipalKind};
use bilemo_api::config::AppConfig;
use bilemo_api::database::fixtures::DEFAULT_PASSWORD;
use bilemo_api::database::{Fixtures, MemoryStore, Repositories};
use bilemo_api::state::AppState;

pub const PASSWORD: &str = DEFAULT_PASSWORD;

static FIXTURES: OnceLock<Fixtures> = OnceLock::new();

/// The fixture data set, hashed once per test binary with cheap Argon2
/// parameters so that logins stay fast in debug builds.
pub fn fixtures() -> &'static Fixtures {
    FIXTURES.get_or_init(|| {
        let params = Params::new(1024, 1, 1, None).expect("argon2 params");
        let hasher = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        let hash = hasher
            .hash_password(PASSWORD.as_bytes(), &salt)
            .expect("hash fixture password")
            .to_string();
        Fixtures::generate(&hash)
    })
}

/// An in-process application over a freshly seeded in-memory store.
pub struct TestApp {
    pub state: AppState,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn cache_control(&self) -> Option<&str> {
        self.headers.get(header::CACHE_CONTROL).and_then(|v| v.to_str().ok())
    }

    /// `_links.<rel>.href` of the body's `data` block, or of the body itself for errors.
    pub fn link(&self, rel: &str) -> Option<&str> {
        let links = if self.body["success"] == true {
            &self.body["data"]["_links"]
        } else {
            &self.body["_links"]
        };
        links[rel]["href"].as_str()
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::development())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::seeded(fixtures().clone()));
        let state = AppState::new(config, Repositories::from_store(store)).expect("app state");
        let router = bilemo_api::app(state.clone());
        Self { state, router }
    }

    pub fn client_token(&self, client_id: i64) -> String {
        self.token(client_id, format!("client{}@bilemo.com", client_id), PrincipalKind::Client)
    }

    pub fn admin_token(&self, admin_id: i64) -> String {
        self.token(admin_id, format!("admin{}@bilemo.com", admin_id), PrincipalKind::Admin)
    }

    fn token(&self, id: i64, email: String, kind: PrincipalKind) -> String {
        self.state
            .jwt
            .generate(&Principal { id, email, kind })
            .expect("token generation")
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<TestResponse> {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Result<TestResponse> {
        let raw = body.map(|b| b.to_string()).unwrap_or_default();
        self.send_raw(method, uri, token, raw).await
    }

    pub async fn send_raw(&self, method: Method, uri: &str, token: Option<&str>, body: String) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if !body.is_empty() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = builder.body(Body::from(body)).context("build request")?;

        let response = self.router.clone().oneshot(request).await.context("router call")?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.context("read body")?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body: {}", String::from_utf8_lossy(&bytes)))?
        };

        Ok(TestResponse { status, headers, body })
    }

    /// Logs in through the HTTP endpoint and returns the issued token.
    pub async fn login(&self, path: &str, email: &str) -> Result<String> {
        let res = self
            .send(Method::POST, path, None, Some(serde_json::json!({ "email": email, "password": PASSWORD })))
            .await?;
        anyhow::ensure!(res.status == StatusCode::OK, "login failed: {} {}", res.status, res.body);
        res.body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("token missing from login response")
    }
}
