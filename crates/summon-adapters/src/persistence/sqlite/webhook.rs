use async_trait::async_trait;

use summon_core::webhook::Webhook;
use summon_ports::error::PortError;
use summon_ports::outbound::WebhookRepository;

use super::SqliteDb;

#[async_trait]
impl WebhookRepository for SqliteDb {
    async fn save(&self, webhook: &Webhook) -> Result<(), PortError> {
        let data =
            serde_json::to_string(webhook).map_err(|e| PortError::Persistence(e.to_string()))?;

        sqlx::query(
            "INSERT INTO webhooks (id, data) VALUES (?, ?)
             ON CONFLICT(id) DO UPDATE SET data = excluded.data",
        )
        .bind(webhook.id().to_string())
        .bind(&data)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Webhook>, PortError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT data FROM webhooks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        match row {
            Some((data,)) => {
                let webhook: Webhook = serde_json::from_str(&data)
                    .map_err(|e| PortError::Persistence(e.to_string()))?;
                Ok(Some(webhook))
            }
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<Webhook>, PortError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT data FROM webhooks")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        let mut webhooks = Vec::with_capacity(rows.len());
        for (data,) in rows {
            let webhook: Webhook =
                serde_json::from_str(&data).map_err(|e| PortError::Persistence(e.to_string()))?;
            webhooks.push(webhook);
        }
        Ok(webhooks)
    }

    async fn delete(&self, id: &str) -> Result<(), PortError> {
        sqlx::query("DELETE FROM webhooks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;
        Ok(())
    }
}
