use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// One entry of the static legacy schedule: a raw phone number that answers
/// on a given weekday between `start_hour` (inclusive) and `end_hour`
/// (exclusive), in the roster's local time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyShift {
    pub day: Weekday,
    pub start_hour: u32,
    pub end_hour: u32,
    pub number: String,
    pub name: String,
}

impl LegacyShift {
    pub fn covers(&self, day: Weekday, hour: u32) -> bool {
        self.day == day && self.start_hour <= hour && hour < self.end_hour
    }
}

/// Static final fallback when nothing else resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryContact {
    pub number: String,
    pub name: String,
}
