use chrono::{DateTime, Utc};

use summon_ports::outbound::{PolicyRepository, RosterRepository, UserDirectory};
use summon_ports::types::{CallLevel, CallPlan, ChainLevel, EscalationChain, ResolvedOncall};

use crate::error::AppError;

/// Read side: resolves the current assignment and builds the escalation
/// chain. Loads a fresh state snapshot per call, so concurrent
/// administrative writes are tolerated without locking.
pub struct OncallService<R, P, U>
where
    R: RosterRepository,
    P: PolicyRepository,
    U: UserDirectory,
{
    roster: R,
    policy: P,
    users: U,
}

impl<R, P, U> OncallService<R, P, U>
where
    R: RosterRepository,
    P: PolicyRepository,
    U: UserDirectory,
{
    pub fn new(roster: R, policy: P, users: U) -> Self {
        Self {
            roster,
            policy,
            users,
        }
    }

    pub async fn current_oncall(
        &self,
        at: DateTime<Utc>,
    ) -> Result<Option<ResolvedOncall>, AppError> {
        let roster = self.roster.load().await?;
        let Some(assignment) = roster.current_oncall(at) else {
            return Ok(None);
        };
        // a missing directory entry is not an error; the assignment simply
        // stays unenriched
        let user = match assignment.user_id() {
            Some(id) => self.users.find_by_id(id).await?,
            None => None,
        };
        Ok(Some(ResolvedOncall { assignment, user }))
    }

    pub async fn escalation_chain(&self, at: DateTime<Utc>) -> Result<EscalationChain, AppError> {
        let primary = self
            .current_oncall(at)
            .await?
            .ok_or(AppError::NoOnCallConfigured)?;

        let policy = self.policy.load().await?;
        if !policy.is_enabled() {
            return Ok(EscalationChain {
                primary,
                escalation_enabled: false,
                chain: vec![],
            });
        }

        let mut chain = Vec::with_capacity(policy.levels().len());
        for level in policy.levels() {
            // levels whose user vanished from the directory are dropped
            if let Some(user) = self.users.find_by_id(level.user_id()).await? {
                chain.push(ChainLevel {
                    level: level.level(),
                    user,
                    timeout_secs: level.timeout_secs(),
                    attempts: level.attempts(),
                });
            }
        }

        Ok(EscalationChain {
            primary,
            escalation_enabled: true,
            chain,
        })
    }

    /// The dial plan the telephony side consumes: the primary number when
    /// one can be determined, plus `(number, timeout)` pairs for levels 2+.
    pub async fn call_plan(&self, at: DateTime<Utc>) -> Result<CallPlan, AppError> {
        let chain = self.escalation_chain(at).await?;
        let primary = chain
            .primary
            .user
            .as_ref()
            .map(|u| u.phone().to_string())
            .or_else(|| chain.primary.assignment.number().map(str::to_string));
        let levels = chain
            .chain
            .iter()
            .map(|level| CallLevel {
                number: level.user.phone().to_string(),
                timeout_secs: level.timeout_secs,
            })
            .collect();
        Ok(CallPlan { primary, levels })
    }
}
