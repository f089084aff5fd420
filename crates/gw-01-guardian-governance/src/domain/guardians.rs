//! # Guardian Registry
//!
//! Active guardians plus time-locked pending additions.
//!
//! ```text
//! propose ──(security period)──→ confirmable ──(security window)──→ expired
//!    │                               │
//!    └──── cancel ───────────────────┴──→ confirm → ACTIVE ──remove──→ gone
//! ```

use super::state::AccountGovernanceState;
use crate::config::GovernanceConfig;
use crate::errors::{GovernanceError, GovernanceResult, Role};
use crate::events::GovernanceEvent;
use shared_types::{Address, Timestamp};
use std::collections::{BTreeMap, BTreeSet};

/// Set of active guardians and pending additions keyed by maturity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuardianRegistry {
    active: BTreeSet<Address>,
    pending: BTreeMap<Address, Timestamp>,
}

impl GuardianRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// O(log n) membership test.
    pub fn contains(&self, identity: &Address) -> bool {
        self.active.contains(identity)
    }

    pub fn count(&self) -> usize {
        self.active.len()
    }

    /// Active guardians in address order.
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.active.iter()
    }

    /// Maturity timestamp of a pending addition.
    pub fn pending_maturity(&self, identity: &Address) -> Option<Timestamp> {
        self.pending.get(identity).copied()
    }

    /// Record a pending addition maturing at `matures_at`.
    ///
    /// An expired pending entry for the same identity is overwritten.
    pub fn propose(
        &mut self,
        identity: Address,
        owner: Address,
        now: Timestamp,
        matures_at: Timestamp,
        window: u64,
    ) -> GovernanceResult<()> {
        if identity.is_zero() {
            return Err(GovernanceError::ZeroAddress);
        }
        if identity == owner {
            return Err(GovernanceError::GuardianCannotBeOwner(identity));
        }
        if self.active.contains(&identity) {
            return Err(GovernanceError::DuplicateGuardian(identity));
        }
        if let Some(existing) = self.pending.get(&identity) {
            if now <= existing.saturating_add(window) {
                return Err(GovernanceError::DuplicateGuardian(identity));
            }
        }
        self.pending.insert(identity, matures_at);
        Ok(())
    }

    /// Promote a matured pending addition to the active set.
    pub fn confirm(
        &mut self,
        identity: Address,
        owner: Address,
        now: Timestamp,
        window: u64,
    ) -> GovernanceResult<()> {
        let matures_at = self
            .pending
            .get(&identity)
            .copied()
            .ok_or(GovernanceError::UnknownPendingGuardian(identity))?;

        if now < matures_at {
            return Err(GovernanceError::NotYetMature {
                guardian: identity,
                matures_at,
            });
        }
        if now > matures_at.saturating_add(window) {
            return Err(GovernanceError::PendingGuardianExpired(identity));
        }
        // Ownership may have moved to this identity through recovery
        if identity == owner {
            return Err(GovernanceError::GuardianCannotBeOwner(identity));
        }

        self.pending.remove(&identity);
        self.active.insert(identity);
        Ok(())
    }

    /// Drop a pending addition.
    pub fn cancel(&mut self, identity: &Address) -> GovernanceResult<()> {
        self.pending
            .remove(identity)
            .map(|_| ())
            .ok_or(GovernanceError::UnknownPendingGuardian(*identity))
    }

    /// Remove an active guardian.
    pub fn remove(&mut self, identity: &Address) -> GovernanceResult<()> {
        if self.active.remove(identity) {
            Ok(())
        } else {
            Err(GovernanceError::NotAGuardian(*identity))
        }
    }

    /// Forget `identity` entirely, active or pending. Returns whether it was active.
    pub(crate) fn purge(&mut self, identity: &Address) -> bool {
        self.pending.remove(identity);
        self.active.remove(identity)
    }
}

// =============================================================================
// ACCOUNT OPERATIONS
// =============================================================================

impl AccountGovernanceState {
    /// Owner proposes a guardian; it becomes confirmable after the security period.
    pub fn propose_guardian(
        &mut self,
        caller: Address,
        identity: Address,
        now: Timestamp,
        config: &GovernanceConfig,
    ) -> GovernanceResult<Timestamp> {
        self.require_owner(caller)?;
        self.require_unlocked(now)?;

        let matures_at = now.saturating_add(config.guardian_security_period);
        let owner = self.owner();
        self.guardians.propose(
            identity,
            owner,
            now,
            matures_at,
            config.guardian_security_window,
        )?;

        self.emit(GovernanceEvent::GuardianAdditionProposed {
            guardian: identity,
            matures_at,
        });
        Ok(matures_at)
    }

    /// Anyone may confirm a matured addition inside the security window.
    pub fn confirm_guardian_addition(
        &mut self,
        identity: Address,
        now: Timestamp,
        config: &GovernanceConfig,
    ) -> GovernanceResult<()> {
        self.require_unlocked(now)?;
        let owner = self.owner();
        self.guardians
            .confirm(identity, owner, now, config.guardian_security_window)?;

        self.emit(GovernanceEvent::GuardianAdded { guardian: identity });
        Ok(())
    }

    /// Owner withdraws a pending addition.
    pub fn cancel_guardian_addition(
        &mut self,
        caller: Address,
        identity: Address,
    ) -> GovernanceResult<()> {
        self.require_owner(caller)?;
        self.guardians.cancel(&identity)?;

        self.emit(GovernanceEvent::GuardianAdditionCancelled { guardian: identity });
        Ok(())
    }

    /// Owner removes an active guardian.
    pub fn remove_guardian(
        &mut self,
        caller: Address,
        identity: Address,
        now: Timestamp,
    ) -> GovernanceResult<()> {
        self.require_owner(caller)?;
        self.require_unlocked(now)?;
        self.guardians.remove(&identity)?;

        self.emit(GovernanceEvent::GuardianRemoved { guardian: identity });
        Ok(())
    }

    pub(crate) fn require_owner(&self, caller: Address) -> GovernanceResult<()> {
        if caller != self.owner() {
            return Err(GovernanceError::Unauthorized {
                required: Role::Owner,
            });
        }
        Ok(())
    }
}
