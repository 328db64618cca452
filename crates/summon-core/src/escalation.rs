use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::UserId;

/// One configured escalation step. Level 1 is always the resolved primary,
/// so configured levels start at 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationLevel {
    level: u32,
    user_id: UserId,
    timeout_secs: u32,
    attempts: u32,
}

impl EscalationLevel {
    pub fn new(level: u32, user_id: UserId, timeout_secs: u32, attempts: u32) -> Self {
        Self {
            level,
            user_id,
            timeout_secs,
            attempts,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn timeout_secs(&self) -> u32 {
        self.timeout_secs
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationPolicy {
    enabled: bool,
    levels: Vec<EscalationLevel>,
}

impl EscalationPolicy {
    pub fn new(enabled: bool, levels: Vec<EscalationLevel>) -> Result<Self, DomainError> {
        let mut previous = 1;
        for level in &levels {
            if level.level() <= previous {
                return Err(DomainError::InvalidEscalationLevels);
            }
            previous = level.level();
        }
        Ok(Self { enabled, levels })
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            levels: vec![],
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn levels(&self) -> &[EscalationLevel] {
        &self.levels
    }
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}
