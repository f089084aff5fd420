//! Outgoing events for indexers and observers
//!
//! Every event that concerns a signed action carries its canonical hash and
//! nonce so observers can correlate approvals with the resolution.

use crate::domain::entities::{ActionStatus, ApprovalChannel, WorkflowKind};
use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash, Selector, Timestamp};

/// Event topics
pub mod topics {
    pub const GUARDIAN: &str = "governance.guardian";
    pub const APPROVAL: &str = "governance.approval";
    pub const MODULE_CUT: &str = "governance.module_cut";
    pub const RECOVERY: &str = "governance.recovery";
    pub const LOCK: &str = "governance.lock";
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GovernanceEvent {
    GuardianAdditionProposed {
        guardian: Address,
        matures_at: Timestamp,
    },
    GuardianAdditionCancelled {
        guardian: Address,
    },
    GuardianAdded {
        guardian: Address,
    },
    GuardianRemoved {
        guardian: Address,
    },
    ApprovalRecorded {
        workflow: WorkflowKind,
        approver: Address,
        channel: ApprovalChannel,
        action_hash: Hash,
        nonce: u64,
        /// Live approvals after this one
        approvals: usize,
        required: usize,
    },
    ApprovalRevoked {
        workflow: WorkflowKind,
        approver: Address,
        action_hash: Hash,
        nonce: u64,
        approvals: usize,
    },
    /// A pending action left the ledger.
    ActionResolved {
        workflow: WorkflowKind,
        status: ActionStatus,
        action_hash: Hash,
        nonce: u64,
        /// Approvals held when it was closed
        approvals: usize,
    },
    ModuleCutApplied {
        cut_hash: Hash,
        action_hash: Hash,
        nonce: u64,
    },
    RecoveryExecuted {
        new_owner: Address,
        matures_at: Timestamp,
        action_hash: Hash,
        nonce: u64,
    },
    RecoveryFinalized {
        previous_owner: Address,
        new_owner: Address,
        action_hash: Hash,
        nonce: u64,
    },
    RecoveryCancelled {
        new_owner: Address,
        action_hash: Hash,
        nonce: u64,
    },
    RecoveryHardstopped {
        new_owner: Option<Address>,
        action_hash: Hash,
        nonce: u64,
    },
    Locked {
        by: Address,
        selector: Selector,
        release_at: Timestamp,
        action_hash: Hash,
        nonce: u64,
    },
    Unlocked {
        by: Address,
        action_hash: Hash,
        nonce: u64,
    },
}

impl GovernanceEvent {
    /// Topic the event is published under.
    pub fn topic(&self) -> &'static str {
        match self {
            Self::GuardianAdditionProposed { .. }
            | Self::GuardianAdditionCancelled { .. }
            | Self::GuardianAdded { .. }
            | Self::GuardianRemoved { .. } => topics::GUARDIAN,
            Self::ApprovalRecorded { .. }
            | Self::ApprovalRevoked { .. }
            | Self::ActionResolved { .. } => topics::APPROVAL,
            Self::ModuleCutApplied { .. } => topics::MODULE_CUT,
            Self::RecoveryExecuted { .. }
            | Self::RecoveryFinalized { .. }
            | Self::RecoveryCancelled { .. }
            | Self::RecoveryHardstopped { .. } => topics::RECOVERY,
            Self::Locked { .. } | Self::Unlocked { .. } => topics::LOCK,
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GuardianAdditionProposed { .. } => "GuardianAdditionProposed",
            Self::GuardianAdditionCancelled { .. } => "GuardianAdditionCancelled",
            Self::GuardianAdded { .. } => "GuardianAdded",
            Self::GuardianRemoved { .. } => "GuardianRemoved",
            Self::ApprovalRecorded { .. } => "ApprovalRecorded",
            Self::ApprovalRevoked { .. } => "ApprovalRevoked",
            Self::ActionResolved { .. } => "ActionResolved",
            Self::ModuleCutApplied { .. } => "ModuleCutApplied",
            Self::RecoveryExecuted { .. } => "RecoveryExecuted",
            Self::RecoveryFinalized { .. } => "RecoveryFinalized",
            Self::RecoveryCancelled { .. } => "RecoveryCancelled",
            Self::RecoveryHardstopped { .. } => "RecoveryHardstopped",
            Self::Locked { .. } => "Locked",
            Self::Unlocked { .. } => "Unlocked",
        }
    }

    /// Workflow whose action this event resolves, if any.
    pub fn finalized_workflow(&self) -> Option<WorkflowKind> {
        match self {
            Self::ModuleCutApplied { .. } => Some(WorkflowKind::Cut),
            Self::RecoveryExecuted { .. } => Some(WorkflowKind::Recovery),
            Self::RecoveryCancelled { .. } => Some(WorkflowKind::RecoveryCancel),
            Self::RecoveryHardstopped { .. } => Some(WorkflowKind::Hardstop),
            Self::Unlocked { .. } => Some(WorkflowKind::Unlock),
            _ => None,
        }
    }
}
