use std::collections::HashMap;

use chrono::{Days, NaiveDate};

use summon_core::ids::UserId;
use summon_core::schedule::Roster;
use summon_core::user::User;
use summon_ports::outbound::{ManualScheduleRepository, RosterRepository, UserDirectory};
use summon_ports::types::{CalendarDay, CalendarSource};

use crate::error::AppError;

/// Day-by-day preview for the planning calendar. Manual assignments win,
/// then active rotations fill the remaining days. This path intentionally
/// diverges from live resolution, which never consults the manual map.
pub struct CalendarService<R, M, U>
where
    R: RosterRepository,
    M: ManualScheduleRepository,
    U: UserDirectory,
{
    roster: R,
    manual: M,
    users: U,
}

impl<R, M, U> CalendarService<R, M, U>
where
    R: RosterRepository,
    M: ManualScheduleRepository,
    U: UserDirectory,
{
    pub fn new(roster: R, manual: M, users: U) -> Self {
        Self {
            roster,
            manual,
            users,
        }
    }

    pub async fn calendar(
        &self,
        start: NaiveDate,
        days: u32,
    ) -> Result<Vec<CalendarDay>, AppError> {
        let manual = self.manual.load().await?;
        let roster = self.roster.load().await?;
        let names: HashMap<UserId, User> = self
            .users
            .list_all()
            .await?
            .into_iter()
            .map(|u| (u.id().clone(), u))
            .collect();

        let mut schedule = Vec::with_capacity(days as usize);
        for offset in 0..days {
            let date = start + Days::new(u64::from(offset));
            let day = if let Some(user_id) = manual.assigned_on(date) {
                CalendarDay {
                    date,
                    user_id: Some(user_id.clone()),
                    oncall_name: display_name(&names, user_id),
                    source: CalendarSource::Manual,
                }
            } else if let Some(user_id) = rotation_preview(&roster, date) {
                CalendarDay {
                    date,
                    oncall_name: display_name(&names, &user_id),
                    user_id: Some(user_id),
                    source: CalendarSource::Rotation,
                }
            } else {
                CalendarDay {
                    date,
                    user_id: None,
                    oncall_name: String::new(),
                    source: CalendarSource::None,
                }
            };
            schedule.push(day);
        }
        Ok(schedule)
    }
}

/// First active rotation whose anchor is not in the future of `date`.
fn rotation_preview(roster: &Roster, date: NaiveDate) -> Option<UserId> {
    roster
        .rotations()
        .iter()
        .filter(|r| r.is_active() && date >= r.anchor())
        .find_map(|r| r.member_on(date).cloned())
}

fn display_name(names: &HashMap<UserId, User>, id: &UserId) -> String {
    names
        .get(id)
        .map(|u| u.name().to_string())
        .unwrap_or_else(|| "Unknown".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use summon_core::schedule::{ManualSchedule, Period, Rotation};
    use summon_ports::error::PortError;

    struct MockRosterRepo {
        roster: Mutex<Roster>,
    }

    #[async_trait]
    impl RosterRepository for MockRosterRepo {
        async fn load(&self) -> Result<Roster, PortError> {
            Ok(self.roster.lock().unwrap().clone())
        }
        async fn save(&self, roster: &Roster) -> Result<(), PortError> {
            *self.roster.lock().unwrap() = roster.clone();
            Ok(())
        }
    }

    struct MockManualRepo {
        schedule: Mutex<ManualSchedule>,
    }

    #[async_trait]
    impl ManualScheduleRepository for MockManualRepo {
        async fn load(&self) -> Result<ManualSchedule, PortError> {
            Ok(self.schedule.lock().unwrap().clone())
        }
        async fn save(&self, schedule: &ManualSchedule) -> Result<(), PortError> {
            *self.schedule.lock().unwrap() = schedule.clone();
            Ok(())
        }
    }

    struct MockDirectory {
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl UserDirectory for MockDirectory {
        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PortError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id() == id)
                .cloned())
        }
        async fn list_all(&self) -> Result<Vec<User>, PortError> {
            Ok(self.users.lock().unwrap().clone())
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn make_service(
        roster: Roster,
        manual: ManualSchedule,
        users: Vec<User>,
    ) -> CalendarService<MockRosterRepo, MockManualRepo, MockDirectory> {
        CalendarService::new(
            MockRosterRepo {
                roster: Mutex::new(roster),
            },
            MockManualRepo {
                schedule: Mutex::new(manual),
            },
            MockDirectory {
                users: Mutex::new(users),
            },
        )
    }

    #[tokio::test]
    async fn manual_assignment_beats_rotation() {
        let alice = User::new("alice".into(), "+41791234567".into());
        let bob = User::new("bob".into(), "+41797654321".into());

        let mut roster = Roster::default();
        roster.add_rotation(
            Rotation::new(
                "solo".into(),
                Period::Daily,
                vec![alice.id().clone()],
                date("2025-01-06"),
            )
            .unwrap(),
        );
        let mut manual = ManualSchedule::new();
        manual.set_day(date("2025-01-07"), bob.id().clone());

        let svc = make_service(roster, manual, vec![alice.clone(), bob.clone()]);
        let days = svc.calendar(date("2025-01-06"), 2).await.unwrap();

        assert_eq!(days[0].source, CalendarSource::Rotation);
        assert_eq!(days[0].oncall_name, "alice");
        assert_eq!(days[1].source, CalendarSource::Manual);
        assert_eq!(days[1].oncall_name, "bob");
    }

    #[tokio::test]
    async fn days_before_rotation_anchor_stay_unassigned() {
        let alice = User::new("alice".into(), "+41791234567".into());
        let mut roster = Roster::default();
        roster.add_rotation(
            Rotation::new(
                "solo".into(),
                Period::Weekly,
                vec![alice.id().clone()],
                date("2025-01-06"),
            )
            .unwrap(),
        );

        let svc = make_service(roster, ManualSchedule::new(), vec![alice]);
        let days = svc.calendar(date("2025-01-05"), 2).await.unwrap();

        assert_eq!(days[0].source, CalendarSource::None);
        assert!(days[0].user_id.is_none());
        assert_eq!(days[0].oncall_name, "");
        assert_eq!(days[1].source, CalendarSource::Rotation);
    }

    #[tokio::test]
    async fn unknown_users_render_as_unknown() {
        let departed = UserId::new();
        let mut manual = ManualSchedule::new();
        manual.set_day(date("2025-01-06"), departed);

        let svc = make_service(Roster::default(), manual, vec![]);
        let days = svc.calendar(date("2025-01-06"), 1).await.unwrap();

        assert_eq!(days[0].source, CalendarSource::Manual);
        assert_eq!(days[0].oncall_name, "Unknown");
    }

    #[tokio::test]
    async fn inactive_rotations_are_ignored() {
        let alice = User::new("alice".into(), "+41791234567".into());
        let mut rotation = Rotation::new(
            "off".into(),
            Period::Daily,
            vec![alice.id().clone()],
            date("2025-01-06"),
        )
        .unwrap();
        rotation.deactivate();
        let mut roster = Roster::default();
        roster.add_rotation(rotation);

        let svc = make_service(roster, ManualSchedule::new(), vec![alice]);
        let days = svc.calendar(date("2025-01-06"), 1).await.unwrap();
        assert_eq!(days[0].source, CalendarSource::None);
    }
}
