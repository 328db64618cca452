use async_trait::async_trait;

use summon_core::escalation::EscalationPolicy;
use summon_ports::error::PortError;
use summon_ports::outbound::PolicyRepository;

use super::SqliteDb;

#[async_trait]
impl PolicyRepository for SqliteDb {
    async fn load(&self) -> Result<EscalationPolicy, PortError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT data FROM escalation_policy WHERE id = 1")
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| PortError::Persistence(e.to_string()))?;

        match row {
            Some((data,)) => {
                serde_json::from_str(&data).map_err(|e| PortError::Persistence(e.to_string()))
            }
            None => Ok(EscalationPolicy::default()),
        }
    }

    async fn save(&self, policy: &EscalationPolicy) -> Result<(), PortError> {
        let data =
            serde_json::to_string(policy).map_err(|e| PortError::Persistence(e.to_string()))?;

        sqlx::query(
            "INSERT INTO escalation_policy (id, data) VALUES (1, ?)
             ON CONFLICT(id) DO UPDATE SET data = excluded.data",
        )
        .bind(&data)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        Ok(())
    }
}
