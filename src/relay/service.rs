use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use uuid::Uuid;

use crate::auth::TokenProvider;
use crate::error::RelayError;
use crate::metrics::RelayMetrics;

use super::{MessageSender, NotificationRequest, RelayMessage};

/// Validate, authenticate, dispatch. One downstream call per accepted request,
/// nothing retained between requests.
pub struct NotificationRelay {
    tokens: Arc<dyn TokenProvider>,
    sender: Arc<dyn MessageSender>,
    include_data: bool,
}

impl NotificationRelay {
    pub fn new(
        tokens: Arc<dyn TokenProvider>,
        sender: Arc<dyn MessageSender>,
        include_data: bool,
    ) -> Self {
        Self {
            tokens,
            sender,
            include_data,
        }
    }

    /// Relay one notification and return the FCM response body.
    #[tracing::instrument(
        name = "relay.send",
        skip_all,
        fields(request_id = %Uuid::new_v4())
    )]
    pub async fn send(&self, request: NotificationRequest) -> Result<Value, RelayError> {
        let started = Instant::now();
        let result = self.relay(request).await;

        match &result {
            Ok(_) => {
                RelayMetrics::record_outcome("success");
                tracing::info!("Notification sent");
            }
            Err(e) => RelayMetrics::record_outcome(e.kind()),
        }
        RelayMetrics::observe_request(started.elapsed());

        result
    }

    async fn relay(&self, request: NotificationRequest) -> Result<Value, RelayError> {
        let notification = request.validate()?;

        let token_started = Instant::now();
        let token = self.tokens.access_token().await;
        RelayMetrics::observe_token_fetch(token_started.elapsed());
        let token = token?;

        let message = RelayMessage::build(notification, self.include_data);
        self.sender.send(&token.token, &message).await
    }
}
