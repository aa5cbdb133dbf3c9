use async_trait::async_trait;
use serde_json::Value;

use crate::error::RelayError;

use super::RelayMessage;

/// Delivers a built message downstream.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Returns the downstream response body on a 2xx answer.
    async fn send(&self, access_token: &str, message: &RelayMessage) -> Result<Value, RelayError>;
}

/// Firebase Cloud Messaging HTTP v1 client
pub struct FcmClient {
    send_url: String,
    http_client: reqwest::Client,
}

impl FcmClient {
    /// # Arguments
    /// * `endpoint` - API base URL, normally `https://fcm.googleapis.com`
    /// * `project_id` - Firebase project ID
    pub fn new(endpoint: &str, project_id: &str, http_client: reqwest::Client) -> Self {
        let send_url = format!(
            "{}/v1/projects/{}/messages:send",
            endpoint.trim_end_matches('/'),
            project_id
        );

        Self {
            send_url,
            http_client,
        }
    }

    pub fn send_url(&self) -> &str {
        &self.send_url
    }
}

/// FCM error bodies are JSON; anything else is passed along as text.
fn parse_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[async_trait]
impl MessageSender for FcmClient {
    async fn send(&self, access_token: &str, message: &RelayMessage) -> Result<Value, RelayError> {
        tracing::debug!(url = %self.send_url, "Sending payload to FCM");

        let response = self
            .http_client
            .post(&self.send_url)
            .bearer_auth(access_token)
            .json(message)
            .send()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;
        let body = parse_body(&bytes);

        if status.is_success() {
            return Ok(body);
        }

        tracing::warn!(status = status.as_u16(), error = %body, "FCM rejected message");

        Err(RelayError::Upstream { status, body })
    }
}
