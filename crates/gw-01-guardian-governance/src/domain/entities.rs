//! # Governance Entities
//!
//! Principals, approval records and the workflow variants every approval
//! is bound to.

use super::cut::ModuleCut;
use super::nonces::NonceSlot;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Selector, Timestamp};

/// Caller identity resolved against the guardian registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Principal {
    /// The current account owner.
    Owner(Address),
    /// A current guardian.
    Guardian(Address),
}

impl Principal {
    /// Underlying address.
    #[must_use]
    pub fn address(&self) -> Address {
        match self {
            Self::Owner(address) | Self::Guardian(address) => *address,
        }
    }
}

/// How an approval reached the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalChannel {
    /// The principal called the engine directly.
    OnChain,
    /// A relayer submitted the principal's pre-signed message.
    OffChain,
}

/// One principal's approval of a pending action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub approved_at: Timestamp,
    pub valid_until: Timestamp,
    pub channel: ApprovalChannel,
}

impl Approval {
    /// Whether the approval still counts toward quorum at `now`.
    #[must_use]
    pub fn is_live(&self, now: Timestamp) -> bool {
        now < self.valid_until
    }
}

/// Lifecycle of a pending action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionStatus {
    Pending,
    Finalized,
    Cancelled,
    Hardstopped,
}

/// Workflow discriminant, used as the ledger key and for labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WorkflowKind {
    Cut,
    Recovery,
    RecoveryCancel,
    Lock,
    Unlock,
    Hardstop,
}

impl WorkflowKind {
    /// Label used for logs and metrics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cut => "cut",
            Self::Recovery => "recovery",
            Self::RecoveryCancel => "recovery_cancel",
            Self::Lock => "lock",
            Self::Unlock => "unlock",
            Self::Hardstop => "hardstop",
        }
    }

    /// Nonce counter this workflow signs against and consumes.
    #[must_use]
    pub fn nonce_slot(&self) -> NonceSlot {
        match self {
            Self::Cut => NonceSlot::Cut,
            Self::Recovery | Self::RecoveryCancel | Self::Hardstop => NonceSlot::Recovery,
            Self::Lock | Self::Unlock => NonceSlot::Lock,
        }
    }
}

/// A privileged action together with its workflow-specific payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Workflow {
    /// Install, replace or remove module selectors.
    Cut(ModuleCut),
    /// Hand ownership to `new_owner` after the recovery period.
    Recovery { new_owner: Address },
    /// Abort the executed recovery to `new_owner`.
    RecoveryCancel { new_owner: Address },
    /// Freeze the account, recording the selector that triggered it.
    Lock { selector: Selector },
    /// Lift an explicit lock.
    Unlock,
    /// Owner-only abort of any recovery in flight.
    Hardstop,
}

impl Workflow {
    /// Discriminant of this workflow.
    #[must_use]
    pub fn kind(&self) -> WorkflowKind {
        match self {
            Self::Cut(_) => WorkflowKind::Cut,
            Self::Recovery { .. } => WorkflowKind::Recovery,
            Self::RecoveryCancel { .. } => WorkflowKind::RecoveryCancel,
            Self::Lock { .. } => WorkflowKind::Lock,
            Self::Unlock => WorkflowKind::Unlock,
            Self::Hardstop => WorkflowKind::Hardstop,
        }
    }

    /// Domain-separation tag hashed into every signed message.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Cut(_) => "ModuleCut",
            Self::Recovery { .. } => "ExecuteRecovery",
            Self::RecoveryCancel { .. } => "CancelRecovery",
            Self::Lock { .. } => "Lock",
            Self::Unlock => "Unlock",
            Self::Hardstop => "HardstopRecovery",
        }
    }

    /// 32-byte payload word hashed after the tag.
    #[must_use]
    pub fn payload(&self) -> [u8; 32] {
        match self {
            Self::Cut(cut) => cut.hash().0,
            Self::Recovery { new_owner } | Self::RecoveryCancel { new_owner } => {
                new_owner.to_word()
            }
            Self::Lock { selector } => {
                // bytes4 is left-aligned in an ABI word
                let mut word = [0u8; 32];
                word[..4].copy_from_slice(selector.as_bytes());
                word
            }
            Self::Unlock | Self::Hardstop => [0u8; 32],
        }
    }

    /// Nonce counter this workflow signs against.
    #[must_use]
    pub fn nonce_slot(&self) -> NonceSlot {
        self.kind().nonce_slot()
    }
}
