//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower::util::ServiceExt;

use fcm_relay_service::auth::{AccessToken, AuthError, TokenProvider};
use fcm_relay_service::config::{
    FirebaseConfig, OtelConfig, RelayConfig, ServerConfig, Settings, UpstreamStatusPolicy,
};
use fcm_relay_service::error::RelayError;
use fcm_relay_service::relay::{MessageSender, RelayMessage};
use fcm_relay_service::server::{create_app, AppState};

pub const TEST_PRIVATE_KEY: &str = include_str!("../fixtures/test_rsa_key.pem");
pub const TEST_CLIENT_EMAIL: &str = "relay@demo-project.iam.gserviceaccount.com";

pub fn service_account_json(token_uri: &str) -> String {
    json!({
        "type": "service_account",
        "project_id": "demo-project",
        "private_key_id": "test-key-id",
        "private_key": TEST_PRIVATE_KEY,
        "client_email": TEST_CLIENT_EMAIL,
        "client_id": "1234567890",
        "token_uri": token_uri
    })
    .to_string()
}

pub fn settings(include_data: bool, upstream_status: UpstreamStatusPolicy) -> Settings {
    Settings {
        server: ServerConfig::default(),
        firebase: FirebaseConfig {
            project_id: "p".to_string(),
            service_account_json: Some("{}".to_string()),
            service_account_file: None,
            fcm_endpoint: "https://fcm.googleapis.com".to_string(),
            cache_tokens: false,
        },
        relay: RelayConfig {
            include_data,
            upstream_status,
        },
        otel: OtelConfig::default(),
    }
}

/// Token provider returning a fixed token, or failing like a revoked key.
pub struct StubTokens {
    pub calls: AtomicUsize,
    pub fail: bool,
}

impl StubTokens {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: true,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenProvider for StubTokens {
    async fn access_token(&self) -> Result<AccessToken, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(AuthError::Credential("invalid_grant: key revoked".to_string()))
        } else {
            Ok(AccessToken::new("fixed-token", 3600))
        }
    }
}

/// FCM stand-in answering every message with the same status and body.
pub struct StubFcm {
    pub status: StatusCode,
    pub body: Value,
    pub received: Mutex<Vec<(String, Value)>>,
}

impl StubFcm {
    pub fn new(status: StatusCode, body: Value) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            received: Mutex::new(Vec::new()),
        })
    }

    pub async fn calls(&self) -> usize {
        self.received.lock().await.len()
    }
}

#[async_trait]
impl MessageSender for StubFcm {
    async fn send(&self, access_token: &str, message: &RelayMessage) -> Result<Value, RelayError> {
        self.received.lock().await.push((
            access_token.to_string(),
            serde_json::to_value(message).expect("message serializes"),
        ));

        if self.status.is_success() {
            Ok(self.body.clone())
        } else {
            Err(RelayError::Upstream {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }
}

pub fn app(settings: Settings, tokens: Arc<StubTokens>, fcm: Arc<StubFcm>) -> Router {
    create_app(AppState::with_components(settings, tokens, fcm))
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let payload = body.to_string();
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("content-length", payload.len())
        .body(Body::from(payload))
        .unwrap();

    send(app, request).await
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

    (status, body)
}
