use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tokio::sync::Mutex;

use super::{AccessToken, AuthError, TokenProvider};

/// Refresh this long before the cached token expires
const REFRESH_MARGIN_SECS: i64 = 60;

/// Reuses the token of the configured credential until it is about to expire.
///
/// A deployment has exactly one service account, so there is a single slot.
/// The lock is held across a refresh; concurrent callers wait for that exchange.
pub struct CachedTokenProvider {
    inner: Arc<dyn TokenProvider>,
    slot: Mutex<Option<AccessToken>>,
    margin: Duration,
}

impl CachedTokenProvider {
    pub fn new(inner: Arc<dyn TokenProvider>) -> Self {
        Self {
            inner,
            slot: Mutex::new(None),
            margin: Duration::seconds(REFRESH_MARGIN_SECS),
        }
    }
}

#[async_trait]
impl TokenProvider for CachedTokenProvider {
    async fn access_token(&self) -> Result<AccessToken, AuthError> {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref() {
            if !cached.expires_within(self.margin) {
                return Ok(cached.clone());
            }
        }

        // A failed refresh leaves nothing cached.
        *slot = None;
        let fresh = self.inner.access_token().await?;
        *slot = Some(fresh.clone());

        Ok(fresh)
    }
}
