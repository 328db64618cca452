use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use summon_core::delivery::DeliveryEntry;
use summon_core::escalation::EscalationPolicy;
use summon_core::ids::UserId;
use summon_core::schedule::{ManualSchedule, Roster};
use summon_core::user::User;
use summon_core::webhook::Webhook;

use crate::error::{NotifyError, PortError};

/// Read-only lookup into the user directory. The directory itself is owned
/// by an external collaborator; ids referenced elsewhere may no longer
/// resolve here.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PortError>;
    async fn list_all(&self) -> Result<Vec<User>, PortError>;
}

#[async_trait]
pub trait RosterRepository: Send + Sync {
    async fn load(&self) -> Result<Roster, PortError>;
    async fn save(&self, roster: &Roster) -> Result<(), PortError>;
}

#[async_trait]
pub trait PolicyRepository: Send + Sync {
    async fn load(&self) -> Result<EscalationPolicy, PortError>;
    async fn save(&self, policy: &EscalationPolicy) -> Result<(), PortError>;
}

#[async_trait]
pub trait WebhookRepository: Send + Sync {
    async fn save(&self, webhook: &Webhook) -> Result<(), PortError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Webhook>, PortError>;
    async fn list_all(&self) -> Result<Vec<Webhook>, PortError>;
    async fn delete(&self, id: &str) -> Result<(), PortError>;
}

#[async_trait]
pub trait ManualScheduleRepository: Send + Sync {
    async fn load(&self) -> Result<ManualSchedule, PortError>;
    async fn save(&self, schedule: &ManualSchedule) -> Result<(), PortError>;
}

/// Sink for delivery outcomes. Implementations serialize concurrent appends
/// and evict the oldest entries past the cap.
#[async_trait]
pub trait DeliveryLogStore: Send + Sync {
    async fn append(&self, entry: DeliveryEntry) -> Result<(), PortError>;
    async fn recent(&self, limit: usize) -> Result<Vec<DeliveryEntry>, PortError>;
}

/// Transport used to deliver one rendered payload; returns the HTTP status.
#[async_trait]
pub trait WebhookSender: Send + Sync {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<u16, NotifyError>;
}

/// Fire-and-forget change notification. Callers never observe delivery
/// outcomes; implementations must not block.
pub trait ChangeNotifier: Send + Sync {
    fn notify(&self, event: &str, data: BTreeMap<String, Value>);
}
