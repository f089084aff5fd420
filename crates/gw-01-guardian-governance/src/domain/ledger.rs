//! # Approval Ledger
//!
//! Zero or one [`PendingAction`] per approval-driven workflow. Approvals
//! from both channels land in the same map, so a principal holds at most one
//! live approval per action no matter how it was submitted.
//!
//! ## Competing payloads
//!
//! A second payload for the same workflow is rejected with
//! `ConflictingPendingAction` while the first still has live approvals. Once
//! every approval on it has expired or been revoked, the new payload replaces it.
//!
//! ## Batches
//!
//! Off-chain batches are checked in full before any approval is written:
//! shape, signer authorization and signature recovery, then duplicate
//! approvals, and only then the insert.

use super::entities::{ActionStatus, Approval, ApprovalChannel, Principal, Workflow, WorkflowKind};
use super::guardians::GuardianRegistry;
use super::nonces::NonceSlot;
use super::quorum::{majority, QuorumDecision};
use crate::errors::{GovernanceError, GovernanceResult, Role};
use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash, Timestamp};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// PENDING ACTION
// =============================================================================

/// One in-flight privileged operation collecting approvals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingAction {
    pub workflow: Workflow,
    pub action_hash: Hash,
    pub nonce: u64,
    /// Guardian count when the action was created
    pub quorum_snapshot: usize,
    pub approvals: BTreeMap<Address, Approval>,
    pub status: ActionStatus,
    pub created_at: Timestamp,
}

impl PendingAction {
    /// Approvals required to finalize.
    pub fn required(&self) -> usize {
        majority(self.quorum_snapshot)
    }

    /// Live approvals held by principals that are still guardians.
    pub fn live_count(&self, guardians: &GuardianRegistry, now: Timestamp) -> usize {
        self.approvals
            .iter()
            .filter(|(principal, approval)| approval.is_live(now) && guardians.contains(principal))
            .count()
    }

    pub fn has_live_approval(&self, principal: &Address, now: Timestamp) -> bool {
        self.approvals
            .get(principal)
            .map_or(false, |approval| approval.is_live(now))
    }

    pub fn decision(&self, guardians: &GuardianRegistry, now: Timestamp) -> QuorumDecision {
        QuorumDecision::evaluate(self.live_count(guardians, now), self.quorum_snapshot)
    }
}

/// Result of recording approvals, returned to the submitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalReceipt {
    pub action_hash: Hash,
    pub nonce: u64,
    pub approvals: usize,
    pub required: usize,
    /// Quorum was reached and the action took effect in this call
    pub finalized: bool,
}

// =============================================================================
// SIGNATURE BATCH
// =============================================================================

/// A claimed approver and the address its signature recovered to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignedApproval {
    pub approver: Address,
    pub recovered: Option<Address>,
}

/// Off-chain approvals with signers already recovered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignatureBatch {
    entries: Vec<SignedApproval>,
}

impl SignatureBatch {
    /// Check the batch shape, then recover every signer with `recover`.
    pub fn recover<S, F>(
        approvers: &[Address],
        signatures: &[S],
        recover: F,
    ) -> GovernanceResult<Self>
    where
        S: AsRef<[u8]>,
        F: Fn(&[u8]) -> Option<Address>,
    {
        check_batch_shape(approvers, signatures.len())?;
        let entries = approvers
            .iter()
            .zip(signatures)
            .map(|(approver, signature)| SignedApproval {
                approver: *approver,
                recovered: recover(signature.as_ref()),
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[SignedApproval] {
        &self.entries
    }

    /// Every entry must be a current guardian whose signature recovers to itself.
    pub fn authorize_guardians(&self, guardians: &GuardianRegistry) -> GovernanceResult<Vec<Address>> {
        self.entries
            .iter()
            .map(|entry| {
                if !guardians.contains(&entry.approver) {
                    return Err(GovernanceError::InvalidGuardian(entry.approver));
                }
                if entry.recovered != Some(entry.approver) {
                    return Err(GovernanceError::InvalidGuardianSignature(entry.approver));
                }
                Ok(entry.approver)
            })
            .collect()
    }
}

/// Reject mismatched, empty or self-duplicating approver lists.
pub fn check_batch_shape(approvers: &[Address], signature_count: usize) -> GovernanceResult<()> {
    if approvers.len() != signature_count {
        return Err(GovernanceError::InvalidArrayLength {
            approvers: approvers.len(),
            signatures: signature_count,
        });
    }
    if approvers.is_empty() {
        return Err(GovernanceError::ZeroApproverLength);
    }
    let mut seen = BTreeSet::new();
    for approver in approvers {
        if !seen.insert(*approver) {
            return Err(GovernanceError::DuplicateApprover(*approver));
        }
    }
    Ok(())
}

// =============================================================================
// LEDGER
// =============================================================================

/// Pending actions keyed by workflow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApprovalLedger {
    actions: BTreeMap<WorkflowKind, PendingAction>,
}

impl ApprovalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: WorkflowKind) -> Option<&PendingAction> {
        self.actions.get(&kind)
    }

    /// Pending action for `kind` if it is for exactly `action_hash`.
    pub fn matching(&self, kind: WorkflowKind, action_hash: &Hash) -> Option<&PendingAction> {
        self.actions
            .get(&kind)
            .filter(|action| action.action_hash == *action_hash)
    }

    /// Find or open the pending action for `workflow` at `nonce`.
    pub fn prepare(
        &mut self,
        workflow: &Workflow,
        action_hash: Hash,
        nonce: u64,
        guardians: &GuardianRegistry,
        now: Timestamp,
    ) -> GovernanceResult<()> {
        let kind = workflow.kind();
        if let Some(existing) = self.actions.get(&kind) {
            if existing.action_hash == action_hash {
                return Ok(());
            }
            if existing.live_count(guardians, now) > 0 {
                return Err(GovernanceError::ConflictingPendingAction { workflow: kind });
            }
        }

        self.actions.insert(
            kind,
            PendingAction {
                workflow: workflow.clone(),
                action_hash,
                nonce,
                quorum_snapshot: guardians.count(),
                approvals: BTreeMap::new(),
                status: ActionStatus::Pending,
                created_at: now,
            },
        );
        Ok(())
    }

    /// Record approvals on the prepared action for `kind`.
    ///
    /// Fails with `DuplicateApproval` if any principal already holds a live
    /// approval; nothing is written in that case. Expired approvals are renewed.
    pub fn apply_approvals(
        &mut self,
        kind: WorkflowKind,
        principals: &[Address],
        channel: ApprovalChannel,
        now: Timestamp,
        validity: u64,
    ) -> GovernanceResult<()> {
        let action = self
            .actions
            .get_mut(&kind)
            .ok_or(GovernanceError::NonExistentApproval)?;

        if let Some(duplicate) = principals
            .iter()
            .find(|principal| action.has_live_approval(principal, now))
        {
            return Err(GovernanceError::DuplicateApproval(*duplicate));
        }

        let approval = Approval {
            approved_at: now,
            valid_until: now.saturating_add(validity),
            channel,
        };
        for principal in principals {
            action.approvals.insert(*principal, approval);
        }
        Ok(())
    }

    /// Withdraw `principal`'s approval from the action for exactly `action_hash`.
    ///
    /// The owner may revoke any approval, a guardian only its own. Returns the
    /// revoked action's hash and nonce. The action is dropped once empty.
    pub fn revoke(
        &mut self,
        kind: WorkflowKind,
        action_hash: &Hash,
        caller: Principal,
        principal: Address,
    ) -> GovernanceResult<&PendingAction> {
        if let Principal::Guardian(guardian) = caller {
            if guardian != principal {
                return Err(GovernanceError::Unauthorized {
                    required: Role::Owner,
                });
            }
        }

        let action = self
            .actions
            .get_mut(&kind)
            .filter(|action| action.action_hash == *action_hash)
            .ok_or(GovernanceError::NonExistentApproval)?;

        if action.approvals.remove(&principal).is_none() {
            return Err(GovernanceError::CannotRevokeUnapproved(principal));
        }
        Ok(action)
    }

    /// Drop the action for `kind` if it holds no approvals at all.
    pub fn prune_empty(&mut self, kind: WorkflowKind) {
        if self
            .actions
            .get(&kind)
            .map_or(false, |action| action.approvals.is_empty())
        {
            self.actions.remove(&kind);
        }
    }

    /// Remove the action for `kind`, stamping its final status.
    pub fn resolve(&mut self, kind: WorkflowKind, status: ActionStatus) -> Option<PendingAction> {
        self.actions.remove(&kind).map(|mut action| {
            action.status = status;
            action
        })
    }

    /// Drop every action signed against `slot`; their hashes are stale once it advances.
    pub fn discard_slot(&mut self, slot: NonceSlot) {
        self.actions.retain(|kind, _| kind.nonce_slot() != slot);
    }

    /// Whether `kind` has an action with any live guardian approval.
    pub fn has_live_action(
        &self,
        kind: WorkflowKind,
        guardians: &GuardianRegistry,
        now: Timestamp,
    ) -> bool {
        self.actions
            .get(&kind)
            .map_or(false, |action| action.live_count(guardians, now) > 0)
    }
}
