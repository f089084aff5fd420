//! # Account Recovery
//!
//! ```text
//!             approvals            quorum             recovery_period + finalize
//! [NONE] ───────────────→ [PENDING] ──────→ [EXECUTED] ─────────────────────────→ [FINALIZED]
//!                                                │
//!                                                ├── cancellation quorum ──→ [CANCELLED]
//!                                                └── owner hardstop ───────→ [HARDSTOPPED]
//! ```
//!
//! Execution, cancellation and hardstop all sign against and consume the
//! recovery nonce. Finalization does not: it only completes an execution
//! that already consumed one. The account is locked from the first live
//! approval until the recovery is finalized, cancelled or hardstopped.

use super::entities::{ActionStatus, ApprovalChannel, Workflow, WorkflowKind};
use super::ledger::{ApprovalReceipt, SignatureBatch};
use super::nonces::NonceSlot;
use super::quorum::require_guardian_route;
use super::state::AccountGovernanceState;
use crate::config::GovernanceConfig;
use crate::errors::{GovernanceError, GovernanceResult};
use crate::events::GovernanceEvent;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash, Timestamp};

/// An executed recovery waiting out its maturation period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryRecord {
    pub new_owner: Address,
    pub executed_at: Timestamp,
    pub matures_at: Timestamp,
    /// Recovery nonce consumed by the execution
    pub nonce: u64,
    pub action_hash: Hash,
}

impl RecoveryRecord {
    pub fn is_mature(&self, now: Timestamp) -> bool {
        now >= self.matures_at
    }
}

/// `(new_owner, matures_at)`, zero-valued when no recovery is executed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRecovery {
    pub new_owner: Address,
    pub matures_at: Timestamp,
}

impl From<Option<&RecoveryRecord>> for PendingRecovery {
    fn from(record: Option<&RecoveryRecord>) -> Self {
        record.map_or_else(Self::default, |record| Self {
            new_owner: record.new_owner,
            matures_at: record.matures_at,
        })
    }
}

impl AccountGovernanceState {
    // =========================================================================
    // EXECUTION
    // =========================================================================

    /// A guardian approves recovery to `new_owner` from its own account.
    pub fn approve_account_recovery(
        &mut self,
        caller: Address,
        new_owner: Address,
        now: Timestamp,
        config: &GovernanceConfig,
    ) -> GovernanceResult<ApprovalReceipt> {
        self.check_recovery_target(new_owner)?;
        let guardian = self.require_guardian(caller)?;

        let workflow = Workflow::Recovery { new_owner };
        let receipt =
            self.record_approvals(&workflow, &[guardian], ApprovalChannel::OnChain, now, config)?;
        self.settle_recovery(new_owner, receipt, now, config);
        Ok(receipt)
    }

    /// A relayer submits guardian signatures approving recovery to `new_owner`.
    pub fn execute_recovery(
        &mut self,
        new_owner: Address,
        batch: &SignatureBatch,
        now: Timestamp,
        config: &GovernanceConfig,
    ) -> GovernanceResult<ApprovalReceipt> {
        self.check_recovery_target(new_owner)?;
        let approvers = batch.authorize_guardians(&self.guardians)?;

        let workflow = Workflow::Recovery { new_owner };
        let receipt =
            self.record_approvals(&workflow, &approvers, ApprovalChannel::OffChain, now, config)?;
        self.settle_recovery(new_owner, receipt, now, config);
        Ok(receipt)
    }

    fn check_recovery_target(&self, new_owner: Address) -> GovernanceResult<()> {
        require_guardian_route(self.guardians.count())?;
        if new_owner.is_zero() {
            return Err(GovernanceError::ZeroAddress);
        }
        if self.recovery.is_some() {
            return Err(GovernanceError::RecoveryAlreadyOngoing);
        }
        Ok(())
    }

    fn settle_recovery(
        &mut self,
        new_owner: Address,
        receipt: ApprovalReceipt,
        now: Timestamp,
        config: &GovernanceConfig,
    ) {
        if !receipt.finalized {
            return;
        }
        self.resolve_action(WorkflowKind::Recovery, ActionStatus::Finalized);
        let nonce = self.consume_nonce(NonceSlot::Recovery);
        let matures_at = now.saturating_add(config.recovery_period);
        self.recovery = Some(RecoveryRecord {
            new_owner,
            executed_at: now,
            matures_at,
            nonce,
            action_hash: receipt.action_hash,
        });
        self.emit(GovernanceEvent::RecoveryExecuted {
            new_owner,
            matures_at,
            action_hash: receipt.action_hash,
            nonce,
        });
    }

    // =========================================================================
    // CANCELLATION
    // =========================================================================

    /// A guardian approves cancelling the executed recovery to `new_owner`.
    pub fn approve_cancel_recovery(
        &mut self,
        caller: Address,
        new_owner: Address,
        now: Timestamp,
        config: &GovernanceConfig,
    ) -> GovernanceResult<ApprovalReceipt> {
        self.check_cancel_target(new_owner)?;
        let guardian = self.require_guardian(caller)?;

        let workflow = Workflow::RecoveryCancel { new_owner };
        let receipt =
            self.record_approvals(&workflow, &[guardian], ApprovalChannel::OnChain, now, config)?;
        self.settle_cancel(new_owner, receipt);
        Ok(receipt)
    }

    /// A relayer submits guardian signatures cancelling the executed recovery.
    pub fn cancel_recovery(
        &mut self,
        new_owner: Address,
        batch: &SignatureBatch,
        now: Timestamp,
        config: &GovernanceConfig,
    ) -> GovernanceResult<ApprovalReceipt> {
        self.check_cancel_target(new_owner)?;
        let approvers = batch.authorize_guardians(&self.guardians)?;

        let workflow = Workflow::RecoveryCancel { new_owner };
        let receipt =
            self.record_approvals(&workflow, &approvers, ApprovalChannel::OffChain, now, config)?;
        self.settle_cancel(new_owner, receipt);
        Ok(receipt)
    }

    fn check_cancel_target(&self, new_owner: Address) -> GovernanceResult<()> {
        require_guardian_route(self.guardians.count())?;
        let record = self
            .recovery
            .as_ref()
            .ok_or(GovernanceError::NonexistentRecovery)?;
        if record.new_owner != new_owner {
            return Err(GovernanceError::RecoveryPayloadMismatch {
                expected: record.new_owner,
                actual: new_owner,
            });
        }
        Ok(())
    }

    fn settle_cancel(&mut self, new_owner: Address, receipt: ApprovalReceipt) {
        if !receipt.finalized {
            return;
        }
        self.resolve_action(WorkflowKind::RecoveryCancel, ActionStatus::Cancelled);
        let nonce = self.consume_nonce(NonceSlot::Recovery);
        self.recovery = None;
        self.emit(GovernanceEvent::RecoveryCancelled {
            new_owner,
            action_hash: receipt.action_hash,
            nonce,
        });
    }

    // =========================================================================
    // HARDSTOP
    // =========================================================================

    /// Owner aborts any recovery in flight with a signature over `"HardstopRecovery"`.
    ///
    /// `signer` is the address the submitted signature recovered to.
    pub fn hardstop_recovery(
        &mut self,
        signer: Option<Address>,
        now: Timestamp,
    ) -> GovernanceResult<()> {
        let pending = self
            .ledger
            .get(WorkflowKind::Recovery)
            .filter(|action| action.live_count(&self.guardians, now) > 0)
            .and_then(|action| match action.workflow {
                Workflow::Recovery { new_owner } => Some(new_owner),
                _ => None,
            });
        let stopped = self.recovery.map(|record| record.new_owner).or(pending);
        if stopped.is_none() {
            return Err(GovernanceError::NonexistentRecovery);
        }
        if signer != Some(self.owner()) {
            return Err(GovernanceError::InvalidSignature);
        }

        let action_hash = self.action_hash(&Workflow::Hardstop);
        self.resolve_action(WorkflowKind::Recovery, ActionStatus::Hardstopped);
        let nonce = self.consume_nonce(NonceSlot::Recovery);
        self.recovery = None;
        self.lock = None;
        self.emit(GovernanceEvent::RecoveryHardstopped {
            new_owner: stopped,
            action_hash,
            nonce,
        });
        Ok(())
    }

    // =========================================================================
    // FINALIZATION
    // =========================================================================

    /// Anyone completes a matured recovery; ownership moves to the new owner.
    pub fn finalize_recovery(&mut self, now: Timestamp) -> GovernanceResult<Address> {
        let record = self
            .recovery
            .filter(|record| record.is_mature(now))
            .ok_or(GovernanceError::NonexistentRecovery)?;

        let previous_owner = self.owner();
        self.owner = record.new_owner;
        self.guardians.purge(&record.new_owner);
        self.recovery = None;
        self.lock = None;

        self.emit(GovernanceEvent::RecoveryFinalized {
            previous_owner,
            new_owner: record.new_owner,
            action_hash: record.action_hash,
            nonce: record.nonce,
        });
        Ok(record.new_owner)
    }

    /// `(new_owner, matures_at)` of the executed recovery, zero values if none.
    pub fn pending_recovery(&self) -> PendingRecovery {
        PendingRecovery::from(self.recovery.as_ref())
    }
}
