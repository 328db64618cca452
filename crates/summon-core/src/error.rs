use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("rotation requires at least one member")]
    RotationRequiresMember,
    #[error("invalid override period")]
    InvalidOverridePeriod,
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("escalation levels must be strictly increasing, starting at 2")]
    InvalidEscalationLevels,
}
