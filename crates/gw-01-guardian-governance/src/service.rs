//! Governance Service - orchestration over one account's state
//!
//! Each call takes the account lock, runs the domain operation on a draft
//! copy of the state, and swaps the draft in only if the operation
//! succeeded. Rejections leave the state exactly as it was.

use crate::config::GovernanceConfig;
use crate::domain::quorum::require_guardian_route;
use crate::domain::{
    AccountGovernanceState, ApprovalReceipt, ModuleCut, PendingLock, PendingRecovery,
    SignatureBatch, Workflow, WorkflowKind,
};
use crate::errors::GovernanceResult;
use crate::events::GovernanceEvent;
use crate::metrics;
use crate::ports::inbound::GovernanceApi;
use crate::ports::outbound::{Clock, FacetRegistry, SignerRecovery};
use parking_lot::Mutex;
use shared_types::{Address, Hash, Selector, Timestamp};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Counters kept by the service.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceStats {
    pub operations_committed: u64,
    pub operations_rejected: u64,
    pub approvals_recorded: u64,
    pub actions_finalized: u64,
}

/// Governance engine for one account.
pub struct GovernanceService<F, S, C>
where
    F: FacetRegistry,
    S: SignerRecovery,
    C: Clock,
{
    config: GovernanceConfig,
    state: Mutex<AccountGovernanceState>,
    registry: Arc<F>,
    signer: Arc<S>,
    clock: Arc<C>,
    stats: Mutex<ServiceStats>,
}

impl<F, S, C> GovernanceService<F, S, C>
where
    F: FacetRegistry,
    S: SignerRecovery,
    C: Clock,
{
    /// Create a service around existing account state.
    pub fn new(
        config: GovernanceConfig,
        state: AccountGovernanceState,
        registry: Arc<F>,
        signer: Arc<S>,
        clock: Arc<C>,
    ) -> Self {
        info!(
            account = %state.account(),
            chain_id = state.chain_id(),
            owner = %state.owner(),
            "[gw-01] Governance service started"
        );
        Self {
            config,
            state: Mutex::new(state),
            registry,
            signer,
            clock,
            stats: Mutex::new(ServiceStats::default()),
        }
    }

    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    pub fn stats(&self) -> ServiceStats {
        self.stats.lock().clone()
    }

    /// Copy of the current committed state.
    pub fn snapshot(&self) -> AccountGovernanceState {
        self.state.lock().clone()
    }

    /// Run `op` on a draft and commit it only on success.
    fn transact<T, Op>(&self, operation: &'static str, op: Op) -> GovernanceResult<T>
    where
        Op: FnOnce(&mut AccountGovernanceState, Timestamp) -> GovernanceResult<T>,
    {
        let now = self.clock.now();
        let mut state = self.state.lock();
        let mut draft = state.clone();
        let already_buffered = draft.events().len();

        match op(&mut draft, now) {
            Ok(value) => {
                for event in &draft.events()[already_buffered..] {
                    self.observe(event);
                }
                metrics::set_account_locked(draft.is_locked(now));
                *state = draft;
                self.stats.lock().operations_committed += 1;
                Ok(value)
            }
            Err(error) => {
                warn!(
                    operation,
                    kind = error.kind().as_str(),
                    retryable = error.is_retryable(),
                    "[gw-01] Rejected: {}",
                    error
                );
                metrics::record_rejection(error.kind().as_str());
                self.stats.lock().operations_rejected += 1;
                Err(error)
            }
        }
    }

    fn observe(&self, event: &GovernanceEvent) {
        match event {
            GovernanceEvent::ApprovalRecorded {
                workflow,
                approver,
                channel,
                approvals,
                required,
                nonce,
                ..
            } => {
                debug!(
                    workflow = workflow.as_str(),
                    approver = %approver,
                    channel = ?channel,
                    nonce,
                    "[gw-01] Approval recorded ({}/{})",
                    approvals,
                    required
                );
                metrics::record_approval_recorded(workflow.as_str());
                self.stats.lock().approvals_recorded += 1;
            }
            other => {
                info!(topic = other.topic(), event = ?other, "[gw-01] {}", other.name());
            }
        }

        if let Some(workflow) = event.finalized_workflow() {
            metrics::record_action_finalized(workflow.as_str());
            self.stats.lock().actions_finalized += 1;
        }
    }

    fn batch(
        &self,
        message_hash: Hash,
        approvers: &[Address],
        signatures: &[Vec<u8>],
    ) -> GovernanceResult<SignatureBatch> {
        SignatureBatch::recover(approvers, signatures, |signature| {
            self.signer.recover_signer(&message_hash, signature)
        })
    }

    fn is_registered(&self, module: Address, selectors: &[Selector]) -> bool {
        self.registry.is_registered(module, selectors)
    }
}

impl<F, S, C> GovernanceApi for GovernanceService<F, S, C>
where
    F: FacetRegistry,
    S: SignerRecovery,
    C: Clock,
{
    // =========================================================================
    // Guardian registry
    // =========================================================================

    #[instrument(skip(self), fields(caller = %caller, guardian = %guardian))]
    fn propose_guardian(&self, caller: Address, guardian: Address) -> GovernanceResult<Timestamp> {
        self.transact("propose_guardian", |state, now| {
            state.propose_guardian(caller, guardian, now, &self.config)
        })
    }

    #[instrument(skip(self), fields(guardian = %guardian))]
    fn confirm_guardian_addition(&self, guardian: Address) -> GovernanceResult<()> {
        self.transact("confirm_guardian_addition", |state, now| {
            state.confirm_guardian_addition(guardian, now, &self.config)
        })
    }

    #[instrument(skip(self), fields(caller = %caller, guardian = %guardian))]
    fn cancel_guardian_addition(&self, caller: Address, guardian: Address) -> GovernanceResult<()> {
        self.transact("cancel_guardian_addition", |state, _| {
            state.cancel_guardian_addition(caller, guardian)
        })
    }

    #[instrument(skip(self), fields(caller = %caller, guardian = %guardian))]
    fn remove_guardian(&self, caller: Address, guardian: Address) -> GovernanceResult<()> {
        self.transact("remove_guardian", |state, now| {
            state.remove_guardian(caller, guardian, now)
        })
    }

    fn is_guardian(&self, identity: Address) -> bool {
        self.state.lock().guardians().contains(&identity)
    }

    fn guardian_count(&self) -> usize {
        self.state.lock().guardians().count()
    }

    fn guardians(&self) -> Vec<Address> {
        self.state.lock().guardians().iter().copied().collect()
    }

    // =========================================================================
    // Module cuts
    // =========================================================================

    #[instrument(skip(self, cut), fields(caller = %caller, cut_hash = %cut.hash()))]
    fn module_cut(&self, caller: Address, cut: &ModuleCut) -> GovernanceResult<()> {
        let is_registered = |module: Address, selectors: &[Selector]| self.is_registered(module, selectors);
        self.transact("module_cut", |state, now| {
            state.module_cut(caller, cut, &is_registered, now)
        })
    }

    #[instrument(skip(self, cut), fields(caller = %caller, cut_hash = %cut.hash()))]
    fn approve_module_cut(
        &self,
        caller: Address,
        cut: &ModuleCut,
    ) -> GovernanceResult<ApprovalReceipt> {
        let is_registered = |module: Address, selectors: &[Selector]| self.is_registered(module, selectors);
        self.transact("approve_module_cut", |state, now| {
            state.approve_module_cut(caller, cut, &is_registered, now, &self.config)
        })
    }

    #[instrument(skip(self, cut, approvers, signatures), fields(cut_hash = %cut.hash(), approvers = approvers.len()))]
    fn module_cut_with_guardians(
        &self,
        cut: &ModuleCut,
        approvers: &[Address],
        signatures: &[Vec<u8>],
    ) -> GovernanceResult<ApprovalReceipt> {
        let is_registered = |module: Address, selectors: &[Selector]| self.is_registered(module, selectors);
        self.transact("module_cut_with_guardians", |state, now| {
            require_guardian_route(state.guardians().count())?;
            let message_hash = state.action_hash(&Workflow::Cut(cut.clone()));
            let batch = self.batch(message_hash, approvers, signatures)?;
            state.module_cut_with_guardians(cut, &batch, &is_registered, now, &self.config)
        })
    }

    #[instrument(skip(self, cut), fields(caller = %caller, principal = %principal))]
    fn revoke_module_cut_approval(
        &self,
        caller: Address,
        cut: &ModuleCut,
        principal: Address,
    ) -> GovernanceResult<usize> {
        self.revoke_approval(caller, &Workflow::Cut(cut.clone()), principal)
    }

    // =========================================================================
    // Recovery
    // =========================================================================

    #[instrument(skip(self), fields(caller = %caller, new_owner = %new_owner))]
    fn approve_account_recovery(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> GovernanceResult<ApprovalReceipt> {
        self.transact("approve_account_recovery", |state, now| {
            state.approve_account_recovery(caller, new_owner, now, &self.config)
        })
    }

    #[instrument(skip(self, approvers, signatures), fields(new_owner = %new_owner, approvers = approvers.len()))]
    fn execute_recovery(
        &self,
        new_owner: Address,
        approvers: &[Address],
        signatures: &[Vec<u8>],
    ) -> GovernanceResult<ApprovalReceipt> {
        self.transact("execute_recovery", |state, now| {
            require_guardian_route(state.guardians().count())?;
            let message_hash = state.action_hash(&Workflow::Recovery { new_owner });
            let batch = self.batch(message_hash, approvers, signatures)?;
            state.execute_recovery(new_owner, &batch, now, &self.config)
        })
    }

    #[instrument(skip(self), fields(caller = %caller, new_owner = %new_owner))]
    fn approve_cancel_recovery(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> GovernanceResult<ApprovalReceipt> {
        self.transact("approve_cancel_recovery", |state, now| {
            state.approve_cancel_recovery(caller, new_owner, now, &self.config)
        })
    }

    #[instrument(skip(self, approvers, signatures), fields(new_owner = %new_owner, approvers = approvers.len()))]
    fn cancel_recovery(
        &self,
        new_owner: Address,
        approvers: &[Address],
        signatures: &[Vec<u8>],
    ) -> GovernanceResult<ApprovalReceipt> {
        self.transact("cancel_recovery", |state, now| {
            require_guardian_route(state.guardians().count())?;
            let message_hash = state.action_hash(&Workflow::RecoveryCancel { new_owner });
            let batch = self.batch(message_hash, approvers, signatures)?;
            state.cancel_recovery(new_owner, &batch, now, &self.config)
        })
    }

    #[instrument(skip(self), fields(caller = %caller, new_owner = %new_owner, principal = %principal))]
    fn revoke_recovery_approval(
        &self,
        caller: Address,
        new_owner: Address,
        principal: Address,
    ) -> GovernanceResult<usize> {
        self.revoke_approval(caller, &Workflow::Recovery { new_owner }, principal)
    }

    #[instrument(skip(self, signature))]
    fn hardstop_recovery(&self, signature: &[u8]) -> GovernanceResult<()> {
        self.transact("hardstop_recovery", |state, now| {
            let message_hash = state.action_hash(&Workflow::Hardstop);
            let signer = self.signer.recover_signer(&message_hash, signature);
            state.hardstop_recovery(signer, now)
        })
    }

    #[instrument(skip(self))]
    fn finalize_recovery(&self) -> GovernanceResult<Address> {
        self.transact("finalize_recovery", |state, now| state.finalize_recovery(now))
    }

    fn get_pending_recovery(&self) -> PendingRecovery {
        self.state.lock().pending_recovery()
    }

    // =========================================================================
    // Lock
    // =========================================================================

    #[instrument(skip(self), fields(caller = %caller, selector = %selector))]
    fn lock(&self, caller: Address, selector: Selector) -> GovernanceResult<Timestamp> {
        self.transact("lock", |state, now| {
            state.lock(caller, selector, now, &self.config)
        })
    }

    #[instrument(skip(self, signature), fields(approver = %approver))]
    fn unlock(&self, approver: Address, signature: &[u8]) -> GovernanceResult<()> {
        self.transact("unlock", |state, now| {
            let message_hash = state.action_hash(&Workflow::Unlock);
            let signer = self.signer.recover_signer(&message_hash, signature);
            state.unlock(approver, signer, now)
        })
    }

    fn get_pending_lock(&self) -> PendingLock {
        let now = self.clock.now();
        self.state.lock().pending_lock(now)
    }

    // =========================================================================
    // Approvals and reads
    // =========================================================================

    #[instrument(skip(self, workflow), fields(caller = %caller, workflow = workflow.kind().as_str(), principal = %principal))]
    fn revoke_approval(
        &self,
        caller: Address,
        workflow: &Workflow,
        principal: Address,
    ) -> GovernanceResult<usize> {
        self.transact("revoke_approval", |state, now| {
            state.revoke_approval(caller, workflow, principal, now)
        })
    }

    fn approval_count(&self, workflow: &Workflow) -> usize {
        let now = self.clock.now();
        self.state.lock().approval_count(workflow, now)
    }

    fn is_approved(&self, workflow: &Workflow, principal: Address) -> bool {
        let now = self.clock.now();
        self.state.lock().is_approved(workflow, &principal, now)
    }

    fn action_hash(&self, workflow: &Workflow) -> Hash {
        self.state.lock().action_hash(workflow)
    }

    fn is_locked(&self) -> bool {
        let now = self.clock.now();
        self.state.lock().is_locked(now)
    }

    fn current_owner(&self) -> Address {
        self.state.lock().owner()
    }

    fn current_nonce(&self, workflow: WorkflowKind) -> u64 {
        self.state.lock().current_nonce(workflow)
    }

    fn take_events(&self) -> Vec<GovernanceEvent> {
        self.state.lock().take_events()
    }
}
