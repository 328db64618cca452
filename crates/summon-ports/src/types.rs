use chrono::NaiveDate;
use serde::Serialize;

use summon_core::ids::UserId;
use summon_core::schedule::Assignment;
use summon_core::user::User;

/// A resolved assignment, enriched with the full user record when the
/// directory still knows the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedOncall {
    #[serde(flatten)]
    pub assignment: Assignment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainLevel {
    pub level: u32,
    pub user: User,
    #[serde(rename = "timeout")]
    pub timeout_secs: u32,
    pub attempts: u32,
}

/// The full call-forwarding plan: the resolved primary plus the configured
/// escalation levels that still resolve to known users.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EscalationChain {
    pub primary: ResolvedOncall,
    pub escalation_enabled: bool,
    pub chain: Vec<ChainLevel>,
}

/// What the telephony side dials: the primary number (when known) and the
/// `(number, timeout)` pairs for levels 2 and up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallPlan {
    pub primary: Option<String>,
    pub levels: Vec<CallLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallLevel {
    pub number: String,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSource {
    Manual,
    Rotation,
    None,
}

/// One day of the calendar preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub user_id: Option<UserId>,
    pub oncall_name: String,
    pub source: CalendarSource,
}
