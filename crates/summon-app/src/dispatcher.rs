use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};

use summon_core::delivery::DeliveryEntry;
use summon_core::events;
use summon_core::webhook::{payload, Webhook};
use summon_ports::error::PortError;
use summon_ports::outbound::{ChangeNotifier, DeliveryLogStore, WebhookRepository, WebhookSender};

use crate::error::AppError;

/// Fans change events out to every enabled webhook subscribed to them.
///
/// Every delivery runs as its own detached task: a slow or failing endpoint
/// never delays the others, and the triggering caller never waits. Outcomes
/// are only observable through the delivery log. There is no retry and no
/// backpressure; a burst of events produces a burst of concurrent
/// deliveries.
pub struct NotificationDispatcher<W, L, S> {
    webhooks: Arc<W>,
    log: Arc<L>,
    sender: Arc<S>,
}

impl<W, L, S> Clone for NotificationDispatcher<W, L, S> {
    fn clone(&self) -> Self {
        Self {
            webhooks: Arc::clone(&self.webhooks),
            log: Arc::clone(&self.log),
            sender: Arc::clone(&self.sender),
        }
    }
}

impl<W, L, S> NotificationDispatcher<W, L, S>
where
    W: WebhookRepository + 'static,
    L: DeliveryLogStore + 'static,
    S: WebhookSender + 'static,
{
    pub fn new(webhooks: Arc<W>, log: Arc<L>, sender: Arc<S>) -> Self {
        Self {
            webhooks,
            log,
            sender,
        }
    }

    /// Deliver `event` to every interested webhook and wait for the whole
    /// fan-out to settle. `notify` spawns this; tests call it directly.
    pub async fn deliver_all(&self, event: &str, data: &BTreeMap<String, Value>) {
        let hooks = match self.webhooks.list_all().await {
            Ok(hooks) => hooks,
            Err(e) => {
                tracing::error!(error = %e, event, "failed to list webhooks for dispatch");
                return;
            }
        };

        let mut deliveries = Vec::new();
        for hook in hooks.into_iter().filter(|h| h.wants(event)) {
            let dispatcher = self.clone();
            let event = event.to_string();
            let data = data.clone();
            deliveries.push(tokio::spawn(async move {
                dispatcher.deliver_one(&hook, &event, &data).await;
            }));
        }
        for delivery in deliveries {
            // a panic in one delivery stays confined to its task
            let _ = delivery.await;
        }
    }

    async fn deliver_one(&self, hook: &Webhook, event: &str, data: &BTreeMap<String, Value>) {
        let rendered = payload::render(hook.kind(), event, data, Utc::now());
        let entry = match self.sender.post_json(hook.url(), &rendered).await {
            Ok(status) => DeliveryEntry::from_status(
                hook.id().clone(),
                event.to_string(),
                hook.url().to_string(),
                status,
                Utc::now(),
            ),
            Err(e) => DeliveryEntry::from_error(
                hook.id().clone(),
                event.to_string(),
                hook.url().to_string(),
                e.to_string(),
                Utc::now(),
            ),
        };

        if entry.success {
            tracing::info!(webhook = %hook.id(), event, "webhook delivered");
        } else {
            tracing::warn!(
                webhook = %hook.id(),
                event,
                status = ?entry.status_code,
                error = ?entry.error,
                "webhook delivery failed"
            );
        }
        if let Err(e) = self.log.append(entry).await {
            tracing::error!(error = %e, webhook = %hook.id(), "failed to record delivery");
        }
    }

    /// Deliver a `webhook_test` payload to one webhook, regardless of its
    /// subscriptions. Unlike `notify` this waits for the attempt, so the
    /// outcome is in the log when it returns.
    pub async fn send_test(&self, id: &str) -> Result<(), AppError> {
        let hook = self
            .webhooks
            .find_by_id(id)
            .await?
            .ok_or(AppError::Port(PortError::NotFound))?;
        let data = BTreeMap::from([
            (
                "message".to_string(),
                json!("This is a test delivery from the on-call manager"),
            ),
            ("test".to_string(), json!(true)),
        ]);
        self.deliver_one(&hook, events::WEBHOOK_TEST, &data).await;
        Ok(())
    }
}

impl<W, L, S> ChangeNotifier for NotificationDispatcher<W, L, S>
where
    W: WebhookRepository + 'static,
    L: DeliveryLogStore + 'static,
    S: WebhookSender + 'static,
{
    fn notify(&self, event: &str, data: BTreeMap<String, Value>) {
        let dispatcher = self.clone();
        let event = event.to_string();
        tokio::spawn(async move {
            dispatcher.deliver_all(&event, &data).await;
        });
    }
}
