//! # Account Lock
//!
//! A single guardian or the owner can freeze the account; no quorum is
//! needed to lock. An explicit lock lifts on a valid `"Unlock"` signature at
//! the current lock nonce, or lapses on its own after `lock_period`.
//!
//! A recovery in flight also locks the account. That lock cannot be lifted
//! by unlock; only finalization, cancellation or hardstop end it.

use super::entities::Workflow;
use super::nonces::NonceSlot;
use super::state::AccountGovernanceState;
use crate::config::GovernanceConfig;
use crate::errors::{GovernanceError, GovernanceResult, Role};
use crate::events::GovernanceEvent;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Selector, Timestamp};

/// An explicit lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    pub locked_by: Address,
    pub locked_at: Timestamp,
    pub release_at: Timestamp,
    pub selector: Selector,
}

impl LockRecord {
    pub fn is_active(&self, now: Timestamp) -> bool {
        now < self.release_at
    }
}

/// `(release_at, selector)` of the active explicit lock, zero values if none.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLock {
    pub release_at: Timestamp,
    pub selector: Selector,
}

impl AccountGovernanceState {
    /// Freeze the account. `selector` records what triggered the lock.
    pub fn lock(
        &mut self,
        caller: Address,
        selector: Selector,
        now: Timestamp,
        config: &GovernanceConfig,
    ) -> GovernanceResult<Timestamp> {
        let principal = self
            .resolve_principal(caller)
            .ok_or(GovernanceError::Unauthorized {
                required: Role::OwnerOrGuardian,
            })?;
        if let Some(existing) = self.active_lock(now) {
            return Err(GovernanceError::AccountAlreadyLocked {
                release_at: existing.release_at,
            });
        }

        let release_at = now.saturating_add(config.lock_period);
        self.lock = Some(LockRecord {
            locked_by: principal.address(),
            locked_at: now,
            release_at,
            selector,
        });

        let action_hash = self.action_hash(&Workflow::Lock { selector });
        let nonce = self.nonces.current(NonceSlot::Lock);
        self.emit(GovernanceEvent::Locked {
            by: principal.address(),
            selector,
            release_at,
            action_hash,
            nonce,
        });
        Ok(release_at)
    }

    /// Lift an explicit lock with `approver`'s signature over `"Unlock"`.
    ///
    /// `signer` is the address the submitted signature recovered to.
    pub fn unlock(
        &mut self,
        approver: Address,
        signer: Option<Address>,
        now: Timestamp,
    ) -> GovernanceResult<()> {
        if !self.is_locked(now) {
            return Err(GovernanceError::CannotUnlock);
        }
        let principal = self
            .resolve_principal(approver)
            .ok_or(GovernanceError::InvalidApprover(approver))?;
        if signer != Some(principal.address()) {
            return Err(GovernanceError::InvalidSignature);
        }
        // Only an explicit lock can be lifted; a recovery lock stays
        if self.active_lock(now).is_none() {
            return Err(GovernanceError::CannotUnlock);
        }

        let action_hash = self.action_hash(&Workflow::Unlock);
        self.lock = None;
        let nonce = self.consume_nonce(NonceSlot::Lock);
        self.emit(GovernanceEvent::Unlocked {
            by: principal.address(),
            action_hash,
            nonce,
        });
        Ok(())
    }

    pub(crate) fn active_lock(&self, now: Timestamp) -> Option<&LockRecord> {
        self.lock.as_ref().filter(|lock| lock.is_active(now))
    }

    /// Release timestamp and selector of the active explicit lock.
    pub fn pending_lock(&self, now: Timestamp) -> PendingLock {
        self.active_lock(now)
            .map_or_else(PendingLock::default, |lock| PendingLock {
                release_at: lock.release_at,
                selector: lock.selector,
            })
    }
}
