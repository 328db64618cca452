use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{RotationId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    id: RotationId,
    name: String,
    period: Period,
    members: Vec<UserId>,
    anchor: NaiveDate,
    active: bool,
}

impl Rotation {
    pub fn new(
        name: String,
        period: Period,
        members: Vec<UserId>,
        anchor: NaiveDate,
    ) -> Result<Self, DomainError> {
        if members.is_empty() {
            return Err(DomainError::RotationRequiresMember);
        }
        Ok(Self {
            id: RotationId::new(),
            name,
            period,
            members,
            anchor,
            active: true,
        })
    }

    /// Which member is on duty on the given date.
    ///
    /// The elapsed-period count is floor-divided and floor-modded
    /// (`rem_euclid`), so dates before the anchor walk the rotation
    /// backwards instead of producing an out-of-range index.
    pub fn member_on(&self, date: NaiveDate) -> Option<&UserId> {
        if !self.active || self.members.is_empty() {
            return None;
        }
        let len = self.members.len() as i64;
        let elapsed = match self.period {
            Period::Daily => (date - self.anchor).num_days(),
            Period::Weekly => (date - self.anchor).num_days().div_euclid(7),
            Period::Monthly => {
                (i64::from(date.year()) * 12 + i64::from(date.month()))
                    - (i64::from(self.anchor.year()) * 12 + i64::from(self.anchor.month()))
            }
            Period::Yearly => i64::from(date.year()) - i64::from(self.anchor.year()),
        };
        let index = elapsed.rem_euclid(len) as usize;
        Some(&self.members[index])
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn id(&self) -> &RotationId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn members(&self) -> &[UserId] {
        &self.members
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn make_members(n: usize) -> Vec<UserId> {
        (0..n).map(|_| UserId::new()).collect()
    }

    // Monday
    fn anchor() -> NaiveDate {
        date("2025-01-06")
    }

    #[test]
    fn rotation_requires_at_least_one_member() {
        let result = Rotation::new("empty".into(), Period::Weekly, vec![], anchor());
        assert!(matches!(result, Err(DomainError::RotationRequiresMember)));
    }

    #[test]
    fn daily_rotation_advances_every_day() {
        let members = make_members(3);
        let rot = Rotation::new("daily".into(), Period::Daily, members.clone(), anchor()).unwrap();

        assert_eq!(rot.member_on(date("2025-01-06")), Some(&members[0]));
        assert_eq!(rot.member_on(date("2025-01-07")), Some(&members[1]));
        assert_eq!(rot.member_on(date("2025-01-08")), Some(&members[2]));
        assert_eq!(rot.member_on(date("2025-01-09")), Some(&members[0]));
    }

    #[test]
    fn weekly_rotation_holds_for_seven_days() {
        let members = make_members(3);
        let rot = Rotation::new("weekly".into(), Period::Weekly, members.clone(), anchor()).unwrap();

        // days 0-6 -> first member, 7-13 -> second, 14-20 -> third, 21 wraps
        assert_eq!(rot.member_on(date("2025-01-06")), Some(&members[0]));
        assert_eq!(rot.member_on(date("2025-01-12")), Some(&members[0]));
        assert_eq!(rot.member_on(date("2025-01-13")), Some(&members[1]));
        assert_eq!(rot.member_on(date("2025-01-19")), Some(&members[1]));
        assert_eq!(rot.member_on(date("2025-01-20")), Some(&members[2]));
        assert_eq!(rot.member_on(date("2025-01-26")), Some(&members[2]));
        assert_eq!(rot.member_on(date("2025-01-27")), Some(&members[0]));
    }

    #[test]
    fn monthly_rotation_ignores_day_of_month() {
        let members = make_members(2);
        let rot =
            Rotation::new("monthly".into(), Period::Monthly, members.clone(), date("2025-01-15"))
                .unwrap();

        assert_eq!(rot.member_on(date("2025-03-01")), Some(&members[0]));
        assert_eq!(rot.member_on(date("2025-03-31")), Some(&members[0]));
        assert_eq!(rot.member_on(date("2025-04-01")), Some(&members[1]));
    }

    #[test]
    fn yearly_rotation_advances_on_year_boundary() {
        let members = make_members(2);
        let rot =
            Rotation::new("yearly".into(), Period::Yearly, members.clone(), date("2024-06-01"))
                .unwrap();

        assert_eq!(rot.member_on(date("2024-12-31")), Some(&members[0]));
        assert_eq!(rot.member_on(date("2025-01-01")), Some(&members[1]));
    }

    #[test]
    fn rotation_is_periodic_for_all_kinds() {
        let members = make_members(3);
        let cases = [
            (Period::Daily, date("2025-01-09")),   // anchor + 3 days
            (Period::Weekly, date("2025-01-27")),  // anchor + 3 weeks
            (Period::Monthly, date("2025-04-06")), // anchor + 3 months
            (Period::Yearly, date("2028-01-06")),  // anchor + 3 years
        ];
        for (period, shifted) in cases {
            let rot = Rotation::new("p".into(), period, members.clone(), anchor()).unwrap();
            assert_eq!(rot.member_on(shifted), rot.member_on(anchor()));
        }
    }

    #[test]
    fn dates_before_anchor_use_floor_mod() {
        let members = make_members(3);
        let rot = Rotation::new("weekly".into(), Period::Weekly, members.clone(), anchor()).unwrap();

        // the day before the anchor belongs to week -1 -> last member
        assert_eq!(rot.member_on(date("2025-01-05")), Some(&members[2]));
        // a full week earlier -> second-to-last
        assert_eq!(rot.member_on(date("2024-12-29")), Some(&members[1]));
    }

    #[test]
    fn inactive_rotation_assigns_nobody() {
        let members = make_members(2);
        let mut rot = Rotation::new("off".into(), Period::Daily, members, anchor()).unwrap();
        rot.deactivate();
        assert_eq!(rot.member_on(date("2025-01-06")), None);
    }

    #[test]
    fn single_member_is_always_on_duty() {
        let members = make_members(1);
        let rot = Rotation::new("solo".into(), Period::Monthly, members.clone(), anchor()).unwrap();
        assert_eq!(rot.member_on(date("2023-02-28")), Some(&members[0]));
        assert_eq!(rot.member_on(date("2030-12-01")), Some(&members[0]));
    }
}
