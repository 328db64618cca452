use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::WebhookId;

/// The delivery log keeps only this many entries; the oldest are evicted
/// first.
pub const DELIVERY_LOG_CAP: usize = 500;

/// Outcome of a single webhook delivery attempt. Append-only; there are no
/// retries, so one attempt produces exactly one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEntry {
    pub webhook_id: WebhookId,
    pub event: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub status_code: Option<u16>,
    pub error: Option<String>,
    pub url: String,
}

impl DeliveryEntry {
    pub fn from_status(
        webhook_id: WebhookId,
        event: String,
        url: String,
        status_code: u16,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            webhook_id,
            event,
            timestamp,
            success: (200..300).contains(&status_code),
            status_code: Some(status_code),
            error: None,
            url,
        }
    }

    pub fn from_error(
        webhook_id: WebhookId,
        event: String,
        url: String,
        error: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            webhook_id,
            event,
            timestamp,
            success: false,
            status_code: None,
            error: Some(error),
            url,
        }
    }
}
