//! # Error Types
//!
//! Every rejection the engine can produce. Each variant maps to one
//! [`ErrorKind`] so relayers can tell "fix the inputs and resubmit" apart
//! from "abandon, the same inputs will fail again".

use crate::domain::entities::WorkflowKind;
use serde::{Deserialize, Serialize};
use shared_types::{Address, Selector, Timestamp};
use thiserror::Error;

/// Result type for governance operations.
pub type GovernanceResult<T> = Result<T, GovernanceError>;

/// Role a caller must hold for an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// The account owner.
    Owner,
    /// A current guardian.
    Guardian,
    /// Either the owner or a current guardian.
    OwnerOrGuardian,
}

/// Error taxonomy reported alongside every rejection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Caller lacks the required role.
    Authorization,
    /// Wrong route for the current guardian-set size.
    Quorum,
    /// Duplicate approval or stale nonce.
    Replay,
    /// Malformed or non-recovering signature, or unauthorized signer.
    Signature,
    /// Target module/selectors absent from the facet registry.
    Registration,
    /// Operation not valid in the current lifecycle state.
    State,
}

impl ErrorKind {
    /// Label used for logs and metrics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authorization => "authorization",
            Self::Quorum => "quorum",
            Self::Replay => "replay",
            Self::Signature => "signature",
            Self::Registration => "registration",
            Self::State => "state",
        }
    }
}

/// Errors that can occur while processing a governance operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GovernanceError {
    // =========================================================================
    // Authorization
    // =========================================================================
    /// Caller does not hold the required role.
    #[error("Unauthorized: requires {required:?}")]
    Unauthorized { required: Role },

    // =========================================================================
    // Quorum routing
    // =========================================================================
    /// Owner-only direct path used while guardians exist.
    #[error("Invalid route: guardians exist, use the guardian-approved route")]
    InvalidRouteWithGuardian,

    /// Guardian-approval path used while no guardians exist.
    #[error("Invalid route: no guardians registered")]
    InvalidRouteWithoutGuardian,

    // =========================================================================
    // Replay
    // =========================================================================
    /// Same principal listed twice in one submission.
    #[error("Duplicate approver in submission: {0}")]
    DuplicateApprover(Address),

    /// Principal already approved this nonce through either channel.
    #[error("Duplicate approval from {0} for the current nonce")]
    DuplicateApproval(Address),

    // =========================================================================
    // Signature
    // =========================================================================
    /// Approver and signature arrays differ in length.
    #[error("Invalid array length: {approvers} approvers, {signatures} signatures")]
    InvalidArrayLength { approvers: usize, signatures: usize },

    /// Empty approver list.
    #[error("Approver list is empty")]
    ZeroApproverLength,

    /// Listed principal is not a current guardian.
    #[error("Not a current guardian: {0}")]
    InvalidGuardian(Address),

    /// Listed principal is neither a current guardian nor the owner.
    #[error("Not an authorized approver: {0}")]
    InvalidApprover(Address),

    /// Signature does not recover to the listed guardian.
    #[error("Invalid guardian signature for {0}")]
    InvalidGuardianSignature(Address),

    /// Signature does not recover to the expected signer.
    #[error("Invalid signature")]
    InvalidSignature,

    // =========================================================================
    // Registration
    // =========================================================================
    /// Module address and selector set are not in the facet registry.
    #[error("Unregistered facet and selectors for module {module}")]
    UnregisteredFacetAndSelectors { module: Address },

    // =========================================================================
    // State: guardian registry
    // =========================================================================
    /// Zero address supplied where an identity is required.
    #[error("Zero address is not a valid identity")]
    ZeroAddress,

    /// The owner cannot be a guardian.
    #[error("Owner cannot be a guardian: {0}")]
    GuardianCannotBeOwner(Address),

    /// Identity is already a guardian or already pending.
    #[error("Guardian already active or pending: {0}")]
    DuplicateGuardian(Address),

    /// No pending addition for this identity.
    #[error("No pending guardian addition for {0}")]
    UnknownPendingGuardian(Address),

    /// Security period has not elapsed yet.
    #[error("Guardian {guardian} not mature until {matures_at}")]
    NotYetMature {
        guardian: Address,
        matures_at: Timestamp,
    },

    /// Confirmation window closed.
    #[error("Pending guardian addition expired for {0}")]
    PendingGuardianExpired(Address),

    /// Identity is not an active guardian.
    #[error("Not a guardian: {0}")]
    NotAGuardian(Address),

    // =========================================================================
    // State: approvals
    // =========================================================================
    /// A different payload is already collecting approvals for this workflow.
    #[error("Conflicting pending action for workflow {workflow:?}")]
    ConflictingPendingAction { workflow: WorkflowKind },

    /// No pending action matches the request.
    #[error("No pending approval for this action")]
    NonExistentApproval,

    /// Principal holds no approval on the pending action.
    #[error("Cannot revoke: {0} has not approved")]
    CannotRevokeUnapproved(Address),

    // =========================================================================
    // State: recovery
    // =========================================================================
    /// Nothing executed, or executed but not matured.
    #[error("No matured recovery to act on")]
    NonexistentRecovery,

    /// A recovery is already executed and maturing.
    #[error("A recovery is already ongoing")]
    RecoveryAlreadyOngoing,

    /// Cancellation names a different owner than the executed recovery.
    #[error("Recovery mismatch: pending new owner {expected}, got {actual}")]
    RecoveryPayloadMismatch { expected: Address, actual: Address },

    // =========================================================================
    // State: lock
    // =========================================================================
    /// Unlock requested while no releasable lock is in force.
    #[error("Account cannot be unlocked")]
    CannotUnlock,

    /// Lock requested while an unexpired lock is in force.
    #[error("Account already locked until {release_at}")]
    AccountAlreadyLocked { release_at: Timestamp },

    /// Owner-only mutation attempted while the account is locked.
    #[error("Account is locked")]
    AccountLocked,

    // =========================================================================
    // State: module table
    // =========================================================================
    /// Cut entry carries no selectors.
    #[error("Cut entry for module {0} has no selectors")]
    EmptySelectors(Address),

    /// Add targets a selector that is already routed.
    #[error("Selector already installed: {0}")]
    SelectorAlreadyInstalled(Selector),

    /// Replace/Remove targets a selector that is not routed.
    #[error("Selector not installed: {0}")]
    SelectorNotInstalled(Selector),
}

impl GovernanceError {
    /// Taxonomy bucket of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Authorization,

            Self::InvalidRouteWithGuardian | Self::InvalidRouteWithoutGuardian => ErrorKind::Quorum,

            Self::DuplicateApprover(_) | Self::DuplicateApproval(_) => ErrorKind::Replay,

            Self::InvalidArrayLength { .. }
            | Self::ZeroApproverLength
            | Self::InvalidGuardian(_)
            | Self::InvalidApprover(_)
            | Self::InvalidGuardianSignature(_)
            | Self::InvalidSignature => ErrorKind::Signature,

            Self::UnregisteredFacetAndSelectors { .. } => ErrorKind::Registration,

            Self::ZeroAddress
            | Self::GuardianCannotBeOwner(_)
            | Self::DuplicateGuardian(_)
            | Self::UnknownPendingGuardian(_)
            | Self::NotYetMature { .. }
            | Self::PendingGuardianExpired(_)
            | Self::NotAGuardian(_)
            | Self::ConflictingPendingAction { .. }
            | Self::NonExistentApproval
            | Self::CannotRevokeUnapproved(_)
            | Self::NonexistentRecovery
            | Self::RecoveryAlreadyOngoing
            | Self::RecoveryPayloadMismatch { .. }
            | Self::CannotUnlock
            | Self::AccountAlreadyLocked { .. }
            | Self::AccountLocked
            | Self::EmptySelectors(_)
            | Self::SelectorAlreadyInstalled(_)
            | Self::SelectorNotInstalled(_) => ErrorKind::State,
        }
    }

    /// Whether resubmitting with corrected inputs can succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Replay | ErrorKind::Signature)
    }
}

/// Errors raised while validating a [`crate::config::GovernanceConfig`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A time period must be strictly positive.
    #[error("Configuration period `{0}` must be greater than zero")]
    ZeroPeriod(&'static str),

    /// An environment variable could not be parsed.
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}
