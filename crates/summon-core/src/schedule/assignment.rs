use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::ids::{RotationId, UserId};

use super::rotation::Period;

/// The outcome of a resolution: who answers, and which precedence source
/// decided it.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    Override {
        user_id: UserId,
        reason: String,
        until: DateTime<Utc>,
    },
    Rotation {
        user_id: UserId,
        rotation_id: RotationId,
        period: Period,
    },
    LegacyShift {
        number: String,
        name: String,
    },
    Primary {
        number: String,
        name: String,
    },
}

impl Assignment {
    pub fn source(&self) -> &'static str {
        match self {
            Self::Override { .. } => "override",
            Self::Rotation { period, .. } => match period {
                Period::Daily => "daily_rotation",
                Period::Weekly => "weekly_rotation",
                Period::Monthly => "monthly_rotation",
                Period::Yearly => "yearly_rotation",
            },
            Self::LegacyShift { .. } => "legacy_schedule",
            Self::Primary { .. } => "primary",
        }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Self::Override { user_id, .. } | Self::Rotation { user_id, .. } => Some(user_id),
            Self::LegacyShift { .. } | Self::Primary { .. } => None,
        }
    }

    pub fn number(&self) -> Option<&str> {
        match self {
            Self::LegacyShift { number, .. } | Self::Primary { number, .. } => Some(number),
            Self::Override { .. } | Self::Rotation { .. } => None,
        }
    }
}

// The wire shape tags the source as `type` and flattens the per-source
// fields next to it, which a derived enum representation cannot express.
impl Serialize for Assignment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Override {
                user_id,
                reason,
                until,
            } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("type", self.source())?;
                map.serialize_entry("user_id", user_id)?;
                map.serialize_entry("reason", reason)?;
                map.serialize_entry("until", until)?;
                map.end()
            }
            Self::Rotation {
                user_id,
                rotation_id,
                ..
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", self.source())?;
                map.serialize_entry("user_id", user_id)?;
                map.serialize_entry("rotation_id", rotation_id)?;
                map.end()
            }
            Self::LegacyShift { number, name } | Self::Primary { number, name } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", self.source())?;
                map.serialize_entry("number", number)?;
                map.serialize_entry("name", name)?;
                map.end()
            }
        }
    }
}
