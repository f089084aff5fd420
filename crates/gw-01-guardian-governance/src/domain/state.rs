//! # Account Governance State
//!
//! Everything the engine owns for one account. Workflow operations are
//! implemented as methods in the sibling modules (`guardians`, `cut`,
//! `recovery`, `lock`); this module holds the shared plumbing they use.

use super::cut::ModuleTable;
use super::entities::{ActionStatus, ApprovalChannel, Principal, Workflow, WorkflowKind};
use super::guardians::GuardianRegistry;
use super::ledger::{ApprovalLedger, ApprovalReceipt};
use super::lock::LockRecord;
use super::message;
use super::nonces::{NonceSequencer, NonceSlot};
use super::quorum::QuorumDecision;
use super::recovery::RecoveryRecord;
use crate::config::GovernanceConfig;
use crate::errors::{GovernanceError, GovernanceResult, Role};
use crate::events::GovernanceEvent;
use shared_types::{Address, ChainId, Hash, Timestamp};

/// Authoritative governance state of one account.
#[derive(Clone, Debug)]
pub struct AccountGovernanceState {
    account: Address,
    chain_id: ChainId,
    pub(crate) owner: Address,
    pub(crate) guardians: GuardianRegistry,
    pub(crate) nonces: NonceSequencer,
    pub(crate) ledger: ApprovalLedger,
    pub(crate) modules: ModuleTable,
    pub(crate) recovery: Option<RecoveryRecord>,
    pub(crate) lock: Option<LockRecord>,
    events: Vec<GovernanceEvent>,
}

impl AccountGovernanceState {
    /// Fresh state: no guardians, no modules, all nonces at zero.
    pub fn new(account: Address, chain_id: ChainId, owner: Address) -> GovernanceResult<Self> {
        if account.is_zero() || owner.is_zero() {
            return Err(GovernanceError::ZeroAddress);
        }
        Ok(Self {
            account,
            chain_id,
            owner,
            guardians: GuardianRegistry::new(),
            nonces: NonceSequencer::new(),
            ledger: ApprovalLedger::new(),
            modules: ModuleTable::new(),
            recovery: None,
            lock: None,
            events: Vec::new(),
        })
    }

    /// Install bootstrap modules.
    pub fn with_modules(mut self, modules: ModuleTable) -> Self {
        self.modules = modules;
        self
    }

    // =========================================================================
    // READS
    // =========================================================================

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn guardians(&self) -> &GuardianRegistry {
        &self.guardians
    }

    pub fn modules(&self) -> &ModuleTable {
        &self.modules
    }

    pub fn ledger(&self) -> &ApprovalLedger {
        &self.ledger
    }

    pub fn current_nonce(&self, kind: WorkflowKind) -> u64 {
        self.nonces.current(kind.nonce_slot())
    }

    /// Live approvals on the pending action for exactly `workflow`.
    pub fn approval_count(&self, workflow: &Workflow, now: Timestamp) -> usize {
        let hash = self.action_hash(workflow);
        self.ledger
            .matching(workflow.kind(), &hash)
            .map_or(0, |action| action.live_count(&self.guardians, now))
    }

    /// Whether `principal` holds a live approval on exactly `workflow`.
    pub fn is_approved(&self, workflow: &Workflow, principal: &Address, now: Timestamp) -> bool {
        let hash = self.action_hash(workflow);
        self.ledger
            .matching(workflow.kind(), &hash)
            .map_or(false, |action| action.has_live_approval(principal, now))
    }

    /// Outbound execution is frozen by an explicit lock or a recovery in flight.
    pub fn is_locked(&self, now: Timestamp) -> bool {
        self.active_lock(now).is_some()
            || self.recovery.is_some()
            || self
                .ledger
                .has_live_action(WorkflowKind::Recovery, &self.guardians, now)
    }

    /// Hash a signer must sign for `workflow` at its current nonce.
    pub fn action_hash(&self, workflow: &Workflow) -> Hash {
        let nonce = self.nonces.current(workflow.nonce_slot());
        message::action_hash(workflow, self.account, self.chain_id, nonce)
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    pub(crate) fn emit(&mut self, event: GovernanceEvent) {
        self.events.push(event);
    }

    /// Events buffered since the last drain.
    pub fn events(&self) -> &[GovernanceEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<GovernanceEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // SHARED PLUMBING
    // =========================================================================

    /// Owner or current guardian, if `caller` is either.
    pub fn resolve_principal(&self, caller: Address) -> Option<Principal> {
        if caller == self.owner {
            Some(Principal::Owner(caller))
        } else if self.guardians.contains(&caller) {
            Some(Principal::Guardian(caller))
        } else {
            None
        }
    }

    pub(crate) fn require_unlocked(&self, now: Timestamp) -> GovernanceResult<()> {
        if self.is_locked(now) {
            return Err(GovernanceError::AccountLocked);
        }
        Ok(())
    }

    /// Advance `slot` and drop pending actions signed against the old value.
    pub(crate) fn consume_nonce(&mut self, slot: NonceSlot) -> u64 {
        let consumed = self.nonces.consume(slot);
        self.ledger.discard_slot(slot);
        consumed
    }

    /// Close the pending action for `kind` and report its final status.
    pub(crate) fn resolve_action(&mut self, kind: WorkflowKind, status: ActionStatus) {
        if let Some(action) = self.ledger.resolve(kind, status) {
            self.emit(GovernanceEvent::ActionResolved {
                workflow: kind,
                status: action.status,
                action_hash: action.action_hash,
                nonce: action.nonce,
                approvals: action.approvals.len(),
            });
        }
    }

    /// Record already-authorized approvals and evaluate quorum.
    ///
    /// The caller acts on `finalized` in the same operation.
    pub(crate) fn record_approvals(
        &mut self,
        workflow: &Workflow,
        principals: &[Address],
        channel: ApprovalChannel,
        now: Timestamp,
        config: &GovernanceConfig,
    ) -> GovernanceResult<ApprovalReceipt> {
        let kind = workflow.kind();
        let nonce = self.nonces.current(workflow.nonce_slot());
        let action_hash = message::action_hash(workflow, self.account, self.chain_id, nonce);

        self.ledger
            .prepare(workflow, action_hash, nonce, &self.guardians, now)?;
        self.ledger.apply_approvals(
            kind,
            principals,
            channel,
            now,
            config.approval_validity_period,
        )?;

        let decision = self
            .ledger
            .get(kind)
            .map(|action| action.decision(&self.guardians, now))
            .ok_or(GovernanceError::NonExistentApproval)?;
        let (approvals, required) = match decision {
            QuorumDecision::Pending {
                approvals,
                required,
            }
            | QuorumDecision::Reached {
                approvals,
                required,
            } => (approvals, required),
        };

        for principal in principals {
            self.emit(GovernanceEvent::ApprovalRecorded {
                workflow: kind,
                approver: *principal,
                channel,
                action_hash,
                nonce,
                approvals,
                required,
            });
        }

        Ok(ApprovalReceipt {
            action_hash,
            nonce,
            approvals,
            required,
            finalized: decision.is_reached(),
        })
    }

    /// Withdraw an approval from the pending action for exactly `workflow`.
    ///
    /// Returns the live approvals left on it.
    pub fn revoke_approval(
        &mut self,
        caller: Address,
        workflow: &Workflow,
        principal: Address,
        now: Timestamp,
    ) -> GovernanceResult<usize> {
        let caller = self
            .resolve_principal(caller)
            .ok_or(GovernanceError::Unauthorized {
                required: Role::OwnerOrGuardian,
            })?;
        let kind = workflow.kind();
        let hash = self.action_hash(workflow);

        let (action_hash, nonce, remaining) = {
            let action = self.ledger.revoke(kind, &hash, caller, principal)?;
            (
                action.action_hash,
                action.nonce,
                action.live_count(&self.guardians, now),
            )
        };
        self.ledger.prune_empty(kind);

        self.emit(GovernanceEvent::ApprovalRevoked {
            workflow: kind,
            approver: principal,
            action_hash,
            nonce,
            approvals: remaining,
        });
        Ok(remaining)
    }
}
