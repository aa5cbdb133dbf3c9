//! Notification relay: request model, FCM client and the send path.

mod client;
mod models;
mod service;

pub use client::{FcmClient, MessageSender};
pub use models::{
    MessageContent, MessageData, NotificationPayload, NotificationRequest, RelayMessage,
    RelayResult, ValidatedNotification, DEFAULT_NOTIFICATION_TYPE,
};
pub use service::NotificationRelay;
