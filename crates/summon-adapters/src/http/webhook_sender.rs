use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use summon_ports::error::NotifyError;
use summon_ports::outbound::WebhookSender;

/// The only bound on a delivery attempt; there are no retries.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct HttpWebhookSender {
    client: reqwest::Client,
}

impl HttpWebhookSender {
    pub fn new() -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()
            .map_err(|e| NotifyError::DeliveryFailed(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebhookSender for HttpWebhookSender {
    async fn post_json(&self, url: &str, payload: &Value) -> Result<u16, NotifyError> {
        let response = self.client.post(url).json(payload).send().await.map_err(|e| {
            if e.is_timeout() {
                NotifyError::Timeout
            } else {
                NotifyError::DeliveryFailed(e.to_string())
            }
        })?;
        let status = response.status().as_u16();
        tracing::debug!(url, status, "webhook POST");
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_builds_with_timeout() {
        assert!(HttpWebhookSender::new().is_ok());
    }
}
