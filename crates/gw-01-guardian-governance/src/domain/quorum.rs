//! # Quorum Evaluator
//!
//! Majority is `floor(g / 2) + 1` over the guardian count captured when a
//! pending action was created. Route checks decide whether an operation
//! must go through guardians or may be performed by the owner alone.

use crate::errors::{GovernanceError, GovernanceResult};

/// Approvals required for a guardian set of `guardian_count`.
#[must_use]
pub fn majority(guardian_count: usize) -> usize {
    guardian_count / 2 + 1
}

/// Outcome of evaluating a pending action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuorumDecision {
    /// More approvals needed.
    Pending { approvals: usize, required: usize },
    /// Majority met; finalize in this call.
    Reached { approvals: usize, required: usize },
}

impl QuorumDecision {
    /// Compare live approvals against the snapshot majority.
    #[must_use]
    pub fn evaluate(approvals: usize, quorum_snapshot: usize) -> Self {
        let required = majority(quorum_snapshot);
        if approvals >= required {
            Self::Reached {
                approvals,
                required,
            }
        } else {
            Self::Pending {
                approvals,
                required,
            }
        }
    }

    /// Whether finalization should run.
    #[must_use]
    pub fn is_reached(&self) -> bool {
        matches!(self, Self::Reached { .. })
    }
}

/// Guardian-approval paths need at least one guardian.
pub fn require_guardian_route(guardian_count: usize) -> GovernanceResult<()> {
    if guardian_count == 0 {
        return Err(GovernanceError::InvalidRouteWithoutGuardian);
    }
    Ok(())
}

/// Owner-only direct paths are closed once any guardian exists.
pub fn require_direct_route(guardian_count: usize) -> GovernanceResult<()> {
    if guardian_count > 0 {
        return Err(GovernanceError::InvalidRouteWithGuardian);
    }
    Ok(())
}
