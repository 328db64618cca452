pub mod assignment;
pub mod legacy;
pub mod manual;
pub mod rotation;
pub mod shift_override;

use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{OverrideId, RotationId};
use crate::tz_serde;

pub use assignment::Assignment;
pub use legacy::{LegacyShift, PrimaryContact};
pub use manual::ManualSchedule;
pub use rotation::{Period, Rotation};
pub use shift_override::ShiftOverride;

/// The complete on-call state: every source the resolution engine consults,
/// in precedence order, plus the local time zone used for day and hour
/// arithmetic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    overrides: Vec<ShiftOverride>,
    rotations: Vec<Rotation>,
    legacy_shifts: Vec<LegacyShift>,
    primary: Option<PrimaryContact>,
    #[serde(with = "tz_serde")]
    timezone: Tz,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            overrides: vec![],
            rotations: vec![],
            legacy_shifts: vec![],
            primary: None,
            timezone: Tz::UTC,
        }
    }
}

impl Roster {
    pub fn new(timezone: Tz) -> Self {
        Self {
            timezone,
            ..Self::default()
        }
    }

    /// Resolve who is on call at `at`. Pure query; first match wins:
    /// overrides, then active rotations in stored order, then the legacy
    /// schedule, then the static primary contact.
    pub fn current_oncall(&self, at: DateTime<Utc>) -> Option<Assignment> {
        for ovr in &self.overrides {
            if ovr.is_active_at(at) {
                return Some(Assignment::Override {
                    user_id: ovr.user_id().clone(),
                    reason: ovr.reason().to_string(),
                    until: ovr.end(),
                });
            }
        }

        let local = at.with_timezone(&self.timezone);
        let today = local.date_naive();

        for rotation in &self.rotations {
            if rotation.is_active() && rotation.members().is_empty() {
                tracing::warn!(rotation = %rotation.id(), "rotation has no members, skipping");
                continue;
            }
            if let Some(user_id) = rotation.member_on(today) {
                return Some(Assignment::Rotation {
                    user_id: user_id.clone(),
                    rotation_id: rotation.id().clone(),
                    period: rotation.period(),
                });
            }
        }

        for shift in &self.legacy_shifts {
            if shift.covers(local.weekday(), local.hour()) {
                return Some(Assignment::LegacyShift {
                    number: shift.number.clone(),
                    name: shift.name.clone(),
                });
            }
        }

        self.primary.as_ref().map(|p| Assignment::Primary {
            number: p.number.clone(),
            name: p.name.clone(),
        })
    }

    pub fn add_override(&mut self, ovr: ShiftOverride) -> Result<(), DomainError> {
        if ovr.end() < ovr.start() {
            return Err(DomainError::InvalidOverridePeriod);
        }
        self.overrides.push(ovr);
        Ok(())
    }

    pub fn remove_override(&mut self, id: &OverrideId) -> bool {
        let before = self.overrides.len();
        self.overrides.retain(|o| o.id() != id);
        self.overrides.len() != before
    }

    pub fn add_rotation(&mut self, rotation: Rotation) {
        self.rotations.push(rotation);
    }

    pub fn remove_rotation(&mut self, id: &RotationId) -> bool {
        let before = self.rotations.len();
        self.rotations.retain(|r| r.id() != id);
        self.rotations.len() != before
    }

    pub fn add_legacy_shift(&mut self, shift: LegacyShift) {
        self.legacy_shifts.push(shift);
    }

    pub fn set_primary(&mut self, primary: Option<PrimaryContact>) {
        self.primary = primary;
    }

    pub fn set_timezone(&mut self, timezone: Tz) {
        self.timezone = timezone;
    }

    pub fn overrides(&self) -> &[ShiftOverride] {
        &self.overrides
    }

    pub fn rotations(&self) -> &[Rotation] {
        &self.rotations
    }

    pub fn legacy_shifts(&self) -> &[LegacyShift] {
        &self.legacy_shifts
    }

    pub fn primary(&self) -> Option<&PrimaryContact> {
        self.primary.as_ref()
    }

    pub fn timezone(&self) -> &Tz {
        &self.timezone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::UserId;
    use chrono::{NaiveDate, Weekday};

    fn ts(s: &str) -> DateTime<Utc> {
        chrono::DateTime::parse_from_rfc3339(s)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn make_members(n: usize) -> Vec<UserId> {
        (0..n).map(|_| UserId::new()).collect()
    }

    // Monday
    fn weekly_rotation(members: Vec<UserId>) -> Rotation {
        Rotation::new("team".into(), Period::Weekly, members, date("2025-01-06")).unwrap()
    }

    fn front_desk_shift() -> LegacyShift {
        LegacyShift {
            day: Weekday::Wed,
            start_hour: 9,
            end_hour: 17,
            number: "+15551230000".into(),
            name: "Front desk".into(),
        }
    }

    #[test]
    fn override_beats_rotation_and_reverts_after_end() {
        let members = make_members(2);
        let mut roster = Roster::default();
        roster.add_rotation(weekly_rotation(members.clone()));

        let override_user = UserId::new();
        roster
            .add_override(ShiftOverride::new(
                override_user.clone(),
                ts("2025-01-01T00:00:00Z"),
                ts("2025-01-03T00:00:00Z"),
                "incident follow-up".into(),
            ))
            .unwrap();

        let during = roster.current_oncall(ts("2025-01-02T12:00:00Z")).unwrap();
        assert_eq!(during.source(), "override");
        assert_eq!(during.user_id(), Some(&override_user));

        // the end instant itself is still covered
        let at_end = roster.current_oncall(ts("2025-01-03T00:00:00Z")).unwrap();
        assert_eq!(at_end.source(), "override");

        // one second later the rotation takes over again
        let after = roster.current_oncall(ts("2025-01-03T00:00:01Z")).unwrap();
        assert_eq!(after.source(), "weekly_rotation");
    }

    #[test]
    fn first_matching_override_in_stored_order_wins() {
        let mut roster = Roster::default();
        let first = UserId::new();
        let second = UserId::new();
        roster
            .add_override(ShiftOverride::new(
                first.clone(),
                ts("2025-01-01T00:00:00Z"),
                ts("2025-01-05T00:00:00Z"),
                "first".into(),
            ))
            .unwrap();
        roster
            .add_override(ShiftOverride::new(
                second,
                ts("2025-01-02T00:00:00Z"),
                ts("2025-01-04T00:00:00Z"),
                "second".into(),
            ))
            .unwrap();

        let assignment = roster.current_oncall(ts("2025-01-03T00:00:00Z")).unwrap();
        assert_eq!(assignment.user_id(), Some(&first));
    }

    #[test]
    fn inverted_override_period_is_rejected() {
        let mut roster = Roster::default();
        let result = roster.add_override(ShiftOverride::new(
            UserId::new(),
            ts("2025-01-03T00:00:00Z"),
            ts("2025-01-01T00:00:00Z"),
            "backwards".into(),
        ));
        assert_eq!(result, Err(DomainError::InvalidOverridePeriod));
    }

    #[test]
    fn first_active_rotation_wins() {
        let mut roster = Roster::default();
        let mut inactive = weekly_rotation(make_members(2));
        inactive.deactivate();
        let members = make_members(2);
        roster.add_rotation(inactive);
        roster.add_rotation(weekly_rotation(members.clone()));

        let assignment = roster.current_oncall(ts("2025-01-06T10:00:00Z")).unwrap();
        assert_eq!(assignment.source(), "weekly_rotation");
        assert_eq!(assignment.user_id(), Some(&members[0]));
    }

    #[test]
    fn rotation_without_members_is_skipped() {
        // construction forbids empty member lists, but stored data may
        // still carry them; they must degrade to non-matching
        let empty: Rotation = serde_json::from_value(serde_json::json!({
            "id": RotationId::new().to_string(),
            "name": "corrupt",
            "period": "daily",
            "members": [],
            "anchor": "2025-01-06",
            "active": true,
        }))
        .unwrap();

        let mut roster = Roster::default();
        roster.add_rotation(empty);
        roster.set_primary(Some(PrimaryContact {
            number: "+15550001111".into(),
            name: "Primary On-Call".into(),
        }));

        let assignment = roster.current_oncall(ts("2025-01-06T10:00:00Z")).unwrap();
        assert_eq!(assignment.source(), "primary");
    }

    #[test]
    fn legacy_schedule_matches_local_day_and_hour() {
        let mut roster = Roster::new("Europe/Zurich".parse().unwrap());
        roster.add_legacy_shift(front_desk_shift());

        // 2025-01-08 is a Wednesday; 08:30 UTC is 09:30 in Zurich
        let hit = roster.current_oncall(ts("2025-01-08T08:30:00Z")).unwrap();
        assert_eq!(hit.source(), "legacy_schedule");
        assert_eq!(hit.number(), Some("+15551230000"));

        // 16:30 UTC is 17:30 local, past the half-open window
        assert!(roster.current_oncall(ts("2025-01-08T16:30:00Z")).is_none());
    }

    #[test]
    fn primary_is_final_fallback() {
        let mut roster = Roster::default();
        roster.set_primary(Some(PrimaryContact {
            number: "+15550001111".into(),
            name: "Primary On-Call".into(),
        }));

        let assignment = roster.current_oncall(ts("2025-06-01T00:00:00Z")).unwrap();
        assert_eq!(assignment.source(), "primary");
        assert_eq!(assignment.number(), Some("+15550001111"));
    }

    #[test]
    fn empty_roster_resolves_to_nobody() {
        let roster = Roster::default();
        assert!(roster.current_oncall(ts("2025-06-01T00:00:00Z")).is_none());
    }

    #[test]
    fn remove_override_restores_rotation() {
        let members = make_members(2);
        let mut roster = Roster::default();
        roster.add_rotation(weekly_rotation(members));

        let ovr = ShiftOverride::new(
            UserId::new(),
            ts("2025-01-06T00:00:00Z"),
            ts("2025-01-08T00:00:00Z"),
            "swap".into(),
        );
        let ovr_id = ovr.id().clone();
        roster.add_override(ovr).unwrap();

        assert!(roster.remove_override(&ovr_id));
        let assignment = roster.current_oncall(ts("2025-01-07T00:00:00Z")).unwrap();
        assert_eq!(assignment.source(), "weekly_rotation");
    }

    #[test]
    fn remove_missing_override_reports_false() {
        let mut roster = Roster::default();
        assert!(!roster.remove_override(&OverrideId::new()));
    }

    #[test]
    fn roster_survives_serde_round_trip() {
        let mut roster = Roster::new("Europe/Zurich".parse().unwrap());
        roster.add_rotation(weekly_rotation(make_members(3)));
        roster.add_legacy_shift(front_desk_shift());

        let json = serde_json::to_string(&roster).unwrap();
        let back: Roster = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rotations().len(), 1);
        assert_eq!(back.legacy_shifts().len(), 1);
        assert_eq!(back.timezone(), roster.timezone());
    }
}
