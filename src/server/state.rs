use std::sync::Arc;

use crate::auth::{CachedTokenProvider, CredentialSource, ServiceAccountTokenProvider, TokenProvider};
use crate::config::Settings;
use crate::error::Result;
use crate::relay::{FcmClient, MessageSender, NotificationRelay};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub relay: Arc<NotificationRelay>,
}

impl AppState {
    /// Wire the production token provider and FCM client from settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let source = CredentialSource::from_config(&settings.firebase)?;

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("fcm-relay-service/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut tokens: Arc<dyn TokenProvider> = Arc::new(ServiceAccountTokenProvider::new(
            source,
            http_client.clone(),
        ));
        if settings.firebase.cache_tokens {
            tracing::info!("Access token caching enabled");
            tokens = Arc::new(CachedTokenProvider::new(tokens));
        }

        let sender = Arc::new(FcmClient::new(
            &settings.firebase.fcm_endpoint,
            &settings.firebase.project_id,
            http_client,
        ));

        Ok(Self::with_components(settings, tokens, sender))
    }

    /// Build state around caller-supplied collaborators.
    pub fn with_components(
        settings: Settings,
        tokens: Arc<dyn TokenProvider>,
        sender: Arc<dyn MessageSender>,
    ) -> Self {
        let relay = Arc::new(NotificationRelay::new(
            tokens,
            sender,
            settings.relay.include_data,
        ));

        Self {
            settings: Arc::new(settings),
            relay,
        }
    }
}
