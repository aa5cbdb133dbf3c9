use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use super::{AuthError, CredentialSource, ServiceAccountKey};

/// OAuth scope required by the FCM HTTP v1 send endpoint
pub const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for the signed assertion (Google caps it at one hour)
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>, expires_in_secs: i64) -> Self {
        Self {
            token: token.into(),
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        }
    }

    /// True if the token expires within `margin` from now
    pub fn expires_within(&self, margin: Duration) -> bool {
        self.expires_at <= Utc::now() + margin
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token_len", &self.token.len())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Issues bearer tokens for outbound FCM calls.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<AccessToken, AuthError>;
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

/// Service-account JWT-bearer flow: sign an RS256 assertion with the key and
/// exchange it at the key's `token_uri`.
pub struct ServiceAccountTokenProvider {
    source: CredentialSource,
    scope: String,
    http_client: reqwest::Client,
}

impl ServiceAccountTokenProvider {
    pub fn new(source: CredentialSource, http_client: reqwest::Client) -> Self {
        Self {
            source,
            scope: FCM_SCOPE.to_string(),
            http_client,
        }
    }

    fn sign_assertion(&self, key: &ServiceAccountKey, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = AssertionClaims {
            iss: &key.client_email,
            scope: &self.scope,
            aud: &key.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = key.private_key_id.clone();

        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| AuthError::Signing(format!("invalid private key: {}", e)))?;

        encode(&header, &claims, &encoding_key).map_err(|e| AuthError::Signing(e.to_string()))
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountTokenProvider {
    #[tracing::instrument(name = "auth.access_token", skip(self), fields(source = self.source.kind()))]
    async fn access_token(&self) -> Result<AccessToken, AuthError> {
        tracing::debug!("Generating OAuth access token");

        let key = self.source.load().await?;
        let assertion = self.sign_assertion(&key, Utc::now())?;

        let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];

        let response = self
            .http_client
            .post(&key.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let token_response: GoogleTokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Response(e.to_string()))?;

        let token = AccessToken::new(token_response.access_token, token_response.expires_in);
        tracing::debug!(token_len = token.token.len(), "Access token generated");

        Ok(token)
    }
}
