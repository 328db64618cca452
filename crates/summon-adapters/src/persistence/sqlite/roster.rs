use async_trait::async_trait;

use summon_core::schedule::Roster;
use summon_ports::error::PortError;
use summon_ports::outbound::RosterRepository;

use super::SqliteDb;

#[async_trait]
impl RosterRepository for SqliteDb {
    async fn load(&self) -> Result<Roster, PortError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT data FROM roster WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        match row {
            Some((data,)) => {
                serde_json::from_str(&data).map_err(|e| PortError::Persistence(e.to_string()))
            }
            None => Ok(Roster::default()),
        }
    }

    async fn save(&self, roster: &Roster) -> Result<(), PortError> {
        let data =
            serde_json::to_string(roster).map_err(|e| PortError::Persistence(e.to_string()))?;

        sqlx::query(
            "INSERT INTO roster (id, data) VALUES (1, ?)
             ON CONFLICT(id) DO UPDATE SET data = excluded.data",
        )
        .bind(&data)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        Ok(())
    }
}
