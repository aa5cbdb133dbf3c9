//! Google service-account authentication.
//!
//! - `credentials`: service-account key model and where it is loaded from
//! - `token`: JWT-bearer exchange for OAuth access tokens
//! - `cache`: optional reuse of an access token until it nears expiry

mod cache;
mod credentials;
mod token;

pub use cache::CachedTokenProvider;
pub use credentials::{CredentialSource, ServiceAccountKey, DEFAULT_TOKEN_URI};
pub use token::{AccessToken, ServiceAccountTokenProvider, TokenProvider, FCM_SCOPE};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid service account credential: {0}")]
    Credential(String),

    #[error("Failed to sign JWT assertion: {0}")]
    Signing(String),

    #[error("Token request failed: {0}")]
    Request(String),

    #[error("Token endpoint returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Failed to parse token response: {0}")]
    Response(String),
}
