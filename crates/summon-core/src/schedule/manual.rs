use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Day-granularity manual assignments, consulted only by the calendar
/// preview. Live resolution never reads this map; the two tracks are kept
/// separate on purpose.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManualSchedule {
    days: BTreeMap<NaiveDate, UserId>,
}

impl ManualSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assigned_on(&self, date: NaiveDate) -> Option<&UserId> {
        self.days.get(&date)
    }

    pub fn set_day(&mut self, date: NaiveDate, user_id: UserId) {
        self.days.insert(date, user_id);
    }

    pub fn clear_day(&mut self, date: NaiveDate) -> bool {
        self.days.remove(&date).is_some()
    }

    pub fn merge(&mut self, other: ManualSchedule) {
        self.days.extend(other.days);
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &UserId)> + '_ {
        self.days.iter()
    }
}

impl FromIterator<(NaiveDate, UserId)> for ManualSchedule {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, UserId)>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}
