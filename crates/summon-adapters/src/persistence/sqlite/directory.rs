use async_trait::async_trait;

use summon_core::ids::UserId;
use summon_core::user::User;
use summon_ports::error::PortError;
use summon_ports::outbound::UserDirectory;

use super::SqliteDb;

#[async_trait]
impl UserDirectory for SqliteDb {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PortError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT data FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        match row {
            Some((data,)) => {
                let user: User = serde_json::from_str(&data)
                    .map_err(|e| PortError::Persistence(e.to_string()))?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<User>, PortError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT data FROM users")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        let mut users = Vec::with_capacity(rows.len());
        for (data,) in rows {
            let user: User =
                serde_json::from_str(&data).map_err(|e| PortError::Persistence(e.to_string()))?;
            users.push(user);
        }
        Ok(users)
    }
}

impl SqliteDb {
    /// Directory sync entry point: the directory is owned externally, so the
    /// port stays read-only and imports land through this inherent method.
    pub async fn put_user(&self, user: &User) -> Result<(), PortError> {
        let data = serde_json::to_string(user).map_err(|e| PortError::Persistence(e.to_string()))?;

        sqlx::query(
            "INSERT INTO users (id, data) VALUES (?, ?)
             ON CONFLICT(id) DO UPDATE SET data = excluded.data",
        )
        .bind(user.id().to_string())
        .bind(&data)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Persistence(e.to_string()))?;

        Ok(())
    }
}
