//! Driving Ports (API - Inbound)
//!
//! Every mutating call is atomic: it either applies all of its state
//! changes or returns an error and leaves the account untouched.

use crate::domain::{ApprovalReceipt, ModuleCut, PendingLock, PendingRecovery, Workflow, WorkflowKind};
use crate::errors::GovernanceResult;
use crate::events::GovernanceEvent;
use shared_types::{Address, Hash, Selector, Timestamp};

/// Governance API for one account.
///
/// `caller` parameters identify the principal making a direct call.
/// Off-chain batches pair each approver with the signature it produced over
/// [`GovernanceApi::action_hash`] for the same workflow.
pub trait GovernanceApi: Send + Sync {
    // =========================================================================
    // Guardian registry
    // =========================================================================

    /// Owner proposes `guardian`. Returns the maturity timestamp.
    fn propose_guardian(&self, caller: Address, guardian: Address) -> GovernanceResult<Timestamp>;

    /// Anyone confirms a matured addition.
    fn confirm_guardian_addition(&self, guardian: Address) -> GovernanceResult<()>;

    /// Owner withdraws a pending addition.
    fn cancel_guardian_addition(&self, caller: Address, guardian: Address) -> GovernanceResult<()>;

    /// Owner removes an active guardian.
    fn remove_guardian(&self, caller: Address, guardian: Address) -> GovernanceResult<()>;

    fn is_guardian(&self, identity: Address) -> bool;

    fn guardian_count(&self) -> usize;

    fn guardians(&self) -> Vec<Address>;

    // =========================================================================
    // Module cuts
    // =========================================================================

    /// Owner cuts directly; only while no guardians exist.
    fn module_cut(&self, caller: Address, cut: &ModuleCut) -> GovernanceResult<()>;

    /// A guardian approves a cut on-chain.
    fn approve_module_cut(&self, caller: Address, cut: &ModuleCut)
        -> GovernanceResult<ApprovalReceipt>;

    /// A relayer submits guardian signatures over a cut.
    fn module_cut_with_guardians(
        &self,
        cut: &ModuleCut,
        approvers: &[Address],
        signatures: &[Vec<u8>],
    ) -> GovernanceResult<ApprovalReceipt>;

    fn revoke_module_cut_approval(
        &self,
        caller: Address,
        cut: &ModuleCut,
        principal: Address,
    ) -> GovernanceResult<usize>;

    // =========================================================================
    // Recovery
    // =========================================================================

    /// A guardian approves recovery to `new_owner` on-chain.
    fn approve_account_recovery(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> GovernanceResult<ApprovalReceipt>;

    /// A relayer submits guardian signatures approving recovery to `new_owner`.
    fn execute_recovery(
        &self,
        new_owner: Address,
        approvers: &[Address],
        signatures: &[Vec<u8>],
    ) -> GovernanceResult<ApprovalReceipt>;

    /// A guardian approves cancelling the executed recovery on-chain.
    fn approve_cancel_recovery(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> GovernanceResult<ApprovalReceipt>;

    /// A relayer submits guardian signatures cancelling the executed recovery.
    fn cancel_recovery(
        &self,
        new_owner: Address,
        approvers: &[Address],
        signatures: &[Vec<u8>],
    ) -> GovernanceResult<ApprovalReceipt>;

    fn revoke_recovery_approval(
        &self,
        caller: Address,
        new_owner: Address,
        principal: Address,
    ) -> GovernanceResult<usize>;

    /// Owner-signed abort of any recovery in flight.
    fn hardstop_recovery(&self, signature: &[u8]) -> GovernanceResult<()>;

    /// Anyone completes a matured recovery. Returns the new owner.
    fn finalize_recovery(&self) -> GovernanceResult<Address>;

    fn get_pending_recovery(&self) -> PendingRecovery;

    // =========================================================================
    // Lock
    // =========================================================================

    /// A guardian or the owner freezes the account. Returns the release time.
    fn lock(&self, caller: Address, selector: Selector) -> GovernanceResult<Timestamp>;

    /// Lift an explicit lock with `approver`'s signature over `"Unlock"`.
    fn unlock(&self, approver: Address, signature: &[u8]) -> GovernanceResult<()>;

    fn get_pending_lock(&self) -> PendingLock;

    // =========================================================================
    // Approvals and reads
    // =========================================================================

    /// Owner, or the approving guardian, withdraws an approval.
    fn revoke_approval(
        &self,
        caller: Address,
        workflow: &Workflow,
        principal: Address,
    ) -> GovernanceResult<usize>;

    fn approval_count(&self, workflow: &Workflow) -> usize;

    fn is_approved(&self, workflow: &Workflow, principal: Address) -> bool;

    /// Digest signers must sign for `workflow` at its current nonce.
    fn action_hash(&self, workflow: &Workflow) -> Hash;

    /// Must be consulted before any outbound transfer or arbitrary call.
    fn is_locked(&self) -> bool;

    fn current_owner(&self) -> Address;

    fn current_nonce(&self, workflow: WorkflowKind) -> u64;

    /// Drain events emitted since the last call.
    fn take_events(&self) -> Vec<GovernanceEvent>;
}
