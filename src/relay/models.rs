use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RelayError;

/// Default `data.type` when the caller does not provide one
pub const DEFAULT_NOTIFICATION_TYPE: &str = "general";

/// Inbound request body for `POST /send-notification`.
///
/// Every field is optional on the wire so that a missing field is reported
/// as a validation failure rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationRequest {
    /// FCM registration token of the target device
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(rename = "type", default)]
    pub notification_type: Option<String>,
    #[serde(rename = "senderUid", default)]
    pub sender_uid: Option<String>,
}

/// A request whose required fields are present and non-empty.
#[derive(Debug, Clone)]
pub struct ValidatedNotification {
    pub token: String,
    pub title: String,
    pub body: String,
    pub notification_type: Option<String>,
    pub sender_uid: Option<String>,
}

fn required(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

impl NotificationRequest {
    pub fn validate(self) -> Result<ValidatedNotification, RelayError> {
        match (
            required(self.token),
            required(self.title),
            required(self.body),
        ) {
            (Some(token), Some(title), Some(body)) => Ok(ValidatedNotification {
                token,
                title,
                body,
                notification_type: self.notification_type,
                sender_uid: self.sender_uid,
            }),
            _ => Err(RelayError::missing_fields()),
        }
    }
}

/// Outbound FCM HTTP v1 request body
#[derive(Debug, Clone, Serialize)]
pub struct RelayMessage {
    pub message: MessageContent,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageContent {
    pub token: String,
    pub notification: NotificationPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<MessageData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
}

/// FCM requires every `data` value to be a string.
#[derive(Debug, Clone, Serialize)]
pub struct MessageData {
    #[serde(rename = "type")]
    pub notification_type: String,
    #[serde(rename = "senderUid")]
    pub sender_uid: String,
}

impl RelayMessage {
    pub fn build(notification: ValidatedNotification, include_data: bool) -> Self {
        let data = include_data.then(|| MessageData {
            notification_type: notification
                .notification_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_NOTIFICATION_TYPE.to_string()),
            sender_uid: notification.sender_uid.unwrap_or_default(),
        });

        Self {
            message: MessageContent {
                token: notification.token,
                notification: NotificationPayload {
                    title: notification.title,
                    body: notification.body,
                },
                data,
            },
        }
    }
}

/// Response envelope returned to the caller
#[derive(Debug, Clone, Serialize)]
pub struct RelayResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl RelayResult {
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: Value) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}
