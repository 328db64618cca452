use async_trait::async_trait;
use chrono::NaiveDate;

use summon_core::ids::UserId;
use summon_core::schedule::ManualSchedule;
use summon_ports::error::PortError;
use summon_ports::outbound::ManualScheduleRepository;

use super::SqliteDb;

#[async_trait]
impl ManualScheduleRepository for SqliteDb {
    async fn load(&self) -> Result<ManualSchedule, PortError> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT date, user_id FROM manual_schedule")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| PortError::Persistence(e.to_string()))?;

        let mut days = Vec::with_capacity(rows.len());
        for (date, user_id) in rows {
            let date: NaiveDate = date
                .parse()
                .map_err(|e| PortError::Persistence(format!("bad date {date}: {e}")))?;
            let user_id =
                UserId::parse(&user_id).map_err(|e| PortError::Persistence(e.to_string()))?;
            days.push((date, user_id));
        }
        Ok(days.into_iter().collect())
    }

    async fn save(&self, schedule: &ManualSchedule) -> Result<(), PortError> {
        sqlx::query("DELETE FROM manual_schedule")
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        for (date, user_id) in schedule.iter() {
            sqlx::query("INSERT INTO manual_schedule (date, user_id) VALUES (?, ?)")
                .bind(date.to_string())
                .bind(user_id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| PortError::Persistence(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn db() -> SqliteDb {
        SqliteDb::new("sqlite::memory:").await.unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn load_without_saved_state_is_empty() {
        let db = db().await;
        let schedule = db.load().await.unwrap();
        assert!(schedule.is_empty());
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let db = db().await;
        let alice = UserId::new();
        let bob = UserId::new();

        let mut schedule = ManualSchedule::new();
        schedule.set_day(date("2025-02-01"), alice.clone());
        schedule.set_day(date("2025-02-02"), bob.clone());
        db.save(&schedule).await.unwrap();

        let loaded = ManualScheduleRepository::load(&db).await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.assigned_on(date("2025-02-01")), Some(&alice));
        assert_eq!(loaded.assigned_on(date("2025-02-02")), Some(&bob));
    }

    #[tokio::test]
    async fn save_replaces_previous_days() {
        let db = db().await;
        let mut schedule = ManualSchedule::new();
        schedule.set_day(date("2025-02-01"), UserId::new());
        db.save(&schedule).await.unwrap();

        db.save(&ManualSchedule::new()).await.unwrap();

        let loaded = ManualScheduleRepository::load(&db).await.unwrap();
        assert!(loaded.is_empty());
    }
}
