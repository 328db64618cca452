pub mod payload;

use serde::{Deserialize, Serialize};

use crate::ids::WebhookId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookKind {
    Slack,
    Discord,
    Teams,
    Generic,
}

/// A registered endpoint interested in a set of change events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    id: WebhookId,
    name: String,
    url: String,
    kind: WebhookKind,
    events: Vec<String>,
    enabled: bool,
}

impl Webhook {
    pub fn new(name: String, url: String, kind: WebhookKind, events: Vec<String>) -> Self {
        Self {
            id: WebhookId::new(),
            name,
            url,
            kind,
            events,
            enabled: true,
        }
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_subscribed(&self, event: &str) -> bool {
        self.events.iter().any(|e| e == event)
    }

    /// Whether a delivery should be attempted for `event`.
    pub fn wants(&self, event: &str) -> bool {
        self.enabled && self.is_subscribed(event)
    }

    pub fn id(&self) -> &WebhookId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn kind(&self) -> WebhookKind {
        self.kind
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
