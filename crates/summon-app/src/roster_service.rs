use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::json;

use summon_core::events;
use summon_core::ids::{OverrideId, RotationId, UserId};
use summon_core::schedule::{LegacyShift, PrimaryContact, Rotation, ShiftOverride};
use summon_core::user::User;
use summon_ports::outbound::{
    ChangeNotifier, ManualScheduleRepository, RosterRepository, UserDirectory,
};

use crate::error::AppError;

/// Write side: the administrative mutations that feed the resolution
/// engine. Changes that move the on-call assignment fire `oncall_changed`.
pub struct RosterService<R, M, U, N>
where
    R: RosterRepository,
    M: ManualScheduleRepository,
    U: UserDirectory,
    N: ChangeNotifier,
{
    roster: R,
    manual: M,
    users: U,
    notifier: N,
}

impl<R, M, U, N> RosterService<R, M, U, N>
where
    R: RosterRepository,
    M: ManualScheduleRepository,
    U: UserDirectory,
    N: ChangeNotifier,
{
    pub fn new(roster: R, manual: M, users: U, notifier: N) -> Self {
        Self {
            roster,
            manual,
            users,
            notifier,
        }
    }

    pub async fn add_override(&self, ovr: ShiftOverride) -> Result<OverrideId, AppError> {
        let mut roster = self.roster.load().await?;
        let id = ovr.id().clone();
        let user_id = ovr.user_id().clone();
        let reason = ovr.reason().to_string();
        let until = ovr.end();
        roster.add_override(ovr)?;
        self.roster.save(&roster).await?;

        let user = self.users.find_by_id(&user_id).await?;
        let data = BTreeMap::from([
            ("type".to_string(), json!("override")),
            ("user_id".to_string(), json!(user_id.to_string())),
            ("user_name".to_string(), json!(name_or_unknown(&user))),
            ("user_phone".to_string(), json!(phone_or_unknown(&user))),
            ("reason".to_string(), json!(reason)),
            ("until".to_string(), json!(until.to_rfc3339())),
        ]);
        self.notifier.notify(events::ONCALL_CHANGED, data);

        Ok(id)
    }

    pub async fn remove_override(&self, id: &OverrideId) -> Result<bool, AppError> {
        let mut roster = self.roster.load().await?;
        if !roster.remove_override(id) {
            return Ok(false);
        }
        self.roster.save(&roster).await?;
        Ok(true)
    }

    pub async fn add_rotation(&self, rotation: Rotation) -> Result<RotationId, AppError> {
        let mut roster = self.roster.load().await?;
        let id = rotation.id().clone();
        roster.add_rotation(rotation);
        self.roster.save(&roster).await?;
        Ok(id)
    }

    pub async fn remove_rotation(&self, id: &RotationId) -> Result<bool, AppError> {
        let mut roster = self.roster.load().await?;
        if !roster.remove_rotation(id) {
            return Ok(false);
        }
        self.roster.save(&roster).await?;
        Ok(true)
    }

    pub async fn add_legacy_shift(&self, shift: LegacyShift) -> Result<(), AppError> {
        let mut roster = self.roster.load().await?;
        roster.add_legacy_shift(shift);
        self.roster.save(&roster).await?;
        Ok(())
    }

    pub async fn set_primary(&self, primary: Option<PrimaryContact>) -> Result<(), AppError> {
        let mut roster = self.roster.load().await?;
        roster.set_primary(primary);
        self.roster.save(&roster).await?;
        Ok(())
    }

    pub async fn set_manual_day(&self, date: NaiveDate, user_id: UserId) -> Result<(), AppError> {
        let mut schedule = self.manual.load().await?;
        schedule.set_day(date, user_id.clone());
        self.manual.save(&schedule).await?;

        let user = self.users.find_by_id(&user_id).await?;
        let data = BTreeMap::from([
            ("type".to_string(), json!("manual_schedule")),
            ("date".to_string(), json!(date.to_string())),
            ("user_id".to_string(), json!(user_id.to_string())),
            ("user_name".to_string(), json!(name_or_unknown(&user))),
        ]);
        self.notifier.notify(events::ONCALL_CHANGED, data);

        Ok(())
    }

    pub async fn clear_manual_day(&self, date: NaiveDate) -> Result<bool, AppError> {
        let mut schedule = self.manual.load().await?;
        if !schedule.clear_day(date) {
            return Ok(false);
        }
        self.manual.save(&schedule).await?;
        Ok(true)
    }
}

fn name_or_unknown(user: &Option<User>) -> String {
    user.as_ref()
        .map(|u| u.name().to_string())
        .unwrap_or_else(|| "Unknown".into())
}

fn phone_or_unknown(user: &Option<User>) -> String {
    user.as_ref()
        .map(|u| u.phone().to_string())
        .unwrap_or_else(|| "Unknown".into())
}
