// --- File: crates/calmirror_sync/src/webhook.rs ---
//! Decoding of Google push notifications.
//!
//! Notifications carry no body we use; the resource state and the channel id
//! arrive as headers. The channel id is the one handed out at subscription
//! time, `channel-<accountId>-<epochMillis>`.

use axum::http::HeaderMap;

pub const RESOURCE_STATE_HEADER: &str = "x-goog-resource-state";
pub const CHANNEL_ID_HEADER: &str = "x-goog-channel-id";
const RESOURCE_STATE_FALLBACK: &str = "resource-state";
const CHANNEL_ID_FALLBACK: &str = "channel-id";

/// Resource state sent once when a channel is opened.
pub const SYNC_STATE: &str = "sync";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookNotification {
    pub resource_state: Option<String>,
    pub channel_id: Option<String>,
}

impl WebhookNotification {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            resource_state: header_value(headers, RESOURCE_STATE_HEADER, RESOURCE_STATE_FALLBACK),
            channel_id: header_value(headers, CHANNEL_ID_HEADER, CHANNEL_ID_FALLBACK),
        }
    }

    pub fn is_sync_handshake(&self) -> bool {
        self.resource_state.as_deref() == Some(SYNC_STATE)
    }
}

fn header_value(headers: &HeaderMap, name: &str, fallback: &str) -> Option<String> {
    headers
        .get(name)
        .or_else(|| headers.get(fallback))
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Extracts the account id from a channel id, or `None` when it is malformed.
pub fn account_id_from_channel(channel_id: &str) -> Option<&str> {
    let mut parts = channel_id.split('-');
    if parts.next() != Some("channel") {
        return None;
    }
    parts.next().filter(|id| !id.is_empty())
}
