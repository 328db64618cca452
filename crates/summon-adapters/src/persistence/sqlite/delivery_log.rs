use async_trait::async_trait;
use chrono::{DateTime, Utc};

use summon_core::delivery::{DeliveryEntry, DELIVERY_LOG_CAP};
use summon_core::ids::WebhookId;
use summon_ports::error::PortError;
use summon_ports::outbound::DeliveryLogStore;

use super::SqliteDb;

#[async_trait]
impl DeliveryLogStore for SqliteDb {
    async fn append(&self, entry: DeliveryEntry) -> Result<(), PortError> {
        sqlx::query(
            "INSERT INTO delivery_log
                (webhook_id, event, timestamp, success, status_code, error, url)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entry.webhook_id.to_string())
        .bind(&entry.event)
        .bind(entry.timestamp.to_rfc3339())
        .bind(entry.success)
        .bind(entry.status_code.map(i64::from))
        .bind(&entry.error)
        .bind(&entry.url)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        // evict everything past the cap, oldest first
        sqlx::query(
            "DELETE FROM delivery_log WHERE id NOT IN
                (SELECT id FROM delivery_log ORDER BY id DESC LIMIT ?)",
        )
        .bind(DELIVERY_LOG_CAP as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<DeliveryEntry>, PortError> {
        let rows: Vec<(String, String, String, bool, Option<i64>, Option<String>, String)> =
            sqlx::query_as(
                "SELECT webhook_id, event, timestamp, success, status_code, error, url
                 FROM delivery_log ORDER BY id DESC LIMIT ?",
            )
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        let mut entries = Vec::with_capacity(rows.len());
        for (webhook_id, event, timestamp, success, status_code, error, url) in rows {
            let webhook_id =
                WebhookId::parse(&webhook_id).map_err(|e| PortError::Persistence(e.to_string()))?;
            let timestamp: DateTime<Utc> = timestamp
                .parse::<DateTime<chrono::FixedOffset>>()
                .map_err(|e| PortError::Persistence(format!("bad timestamp {timestamp}: {e}")))?
                .with_timezone(&Utc);
            entries.push(DeliveryEntry {
                webhook_id,
                event,
                timestamp,
                success,
                status_code: status_code.map(|c| c as u16),
                error,
                url,
            });
        }
        // chronological order, newest last
        entries.reverse();
        Ok(entries)
    }
}
