use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

use crate::config::FirebaseConfig;
use crate::error::AppError;

use super::AuthError;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Firebase service-account key, as downloaded from the Google Cloud console.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

// Keeps the private key out of logs.
impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    pub fn from_json(raw: &str) -> Result<Self, AuthError> {
        serde_json::from_str(raw).map_err(|e| AuthError::Credential(e.to_string()))
    }
}

/// Where the service-account key comes from. Exactly one is active per deployment.
#[derive(Clone)]
pub enum CredentialSource {
    /// Key JSON held in configuration
    Inline(String),
    /// Path to a key file on disk
    KeyFile(PathBuf),
}

impl CredentialSource {
    pub fn from_config(config: &FirebaseConfig) -> Result<Self, AppError> {
        let inline = config
            .service_account_json
            .as_deref()
            .filter(|s| !s.trim().is_empty());
        let file = config
            .service_account_file
            .as_deref()
            .filter(|s| !s.trim().is_empty());

        match (inline, file) {
            (Some(json), None) => Ok(CredentialSource::Inline(json.to_string())),
            (None, Some(path)) => Ok(CredentialSource::KeyFile(PathBuf::from(path))),
            (Some(_), Some(_)) => Err(AppError::Credentials(
                "both service_account_json and service_account_file are set; choose one"
                    .to_string(),
            )),
            (None, None) => Err(AppError::Credentials(
                "no service account configured (service_account_json or service_account_file)"
                    .to_string(),
            )),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CredentialSource::Inline(_) => "inline",
            CredentialSource::KeyFile(_) => "key_file",
        }
    }

    /// Read and parse the key. Called on every token fetch so that a broken
    /// credential surfaces as an auth failure of the request.
    pub async fn load(&self) -> Result<ServiceAccountKey, AuthError> {
        match self {
            CredentialSource::Inline(json) => ServiceAccountKey::from_json(json),
            CredentialSource::KeyFile(path) => {
                let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
                    AuthError::Credential(format!("cannot read {}: {}", path.display(), e))
                })?;
                ServiceAccountKey::from_json(&raw)
            }
        }
    }
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Inline(_) => f.write_str("Inline(<redacted>)"),
            CredentialSource::KeyFile(path) => f.debug_tuple("KeyFile").field(path).finish(),
        }
    }
}
