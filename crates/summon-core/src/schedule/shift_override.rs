use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{OverrideId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftOverride {
    id: OverrideId,
    user_id: UserId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    reason: String,
}

impl ShiftOverride {
    pub fn new(user_id: UserId, start: DateTime<Utc>, end: DateTime<Utc>, reason: String) -> Self {
        Self {
            id: OverrideId::new(),
            user_id,
            start,
            end,
            reason,
        }
    }

    pub fn id(&self) -> &OverrideId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Bounds are inclusive: an override covers both its start and end instant.
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        chrono::DateTime::parse_from_rfc3339(s)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn make_override(start: &str, end: &str) -> ShiftOverride {
        ShiftOverride::new(UserId::new(), ts(start), ts(end), "vacation cover".into())
    }

    #[test]
    fn active_inside_window() {
        let ovr = make_override("2025-01-01T00:00:00Z", "2025-01-03T00:00:00Z");
        assert!(ovr.is_active_at(ts("2025-01-02T12:00:00Z")));
    }

    #[test]
    fn bounds_are_inclusive() {
        let ovr = make_override("2025-01-01T00:00:00Z", "2025-01-03T00:00:00Z");
        assert!(ovr.is_active_at(ts("2025-01-01T00:00:00Z")));
        assert!(ovr.is_active_at(ts("2025-01-03T00:00:00Z")));
    }

    #[test]
    fn inactive_outside_window() {
        let ovr = make_override("2025-01-01T00:00:00Z", "2025-01-03T00:00:00Z");
        assert!(!ovr.is_active_at(ts("2024-12-31T23:59:59Z")));
        assert!(!ovr.is_active_at(ts("2025-01-03T00:00:01Z")));
    }
}
