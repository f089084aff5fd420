//! Domain module for guardian governance
//!
//! ## Building blocks
//! - guardians: Guardian registry with time-locked additions
//! - nonces: Per-workflow replay counters
//! - message: Canonical signed-action hash
//! - ledger: Pending actions and approvals from both channels
//! - quorum: Majority arithmetic and route checks
//!
//! ## Workflows
//! - cut: Module selector table and cut finalization
//! - recovery: Ownership recovery lifecycle
//! - lock: Account freeze and unlock
//!
//! `state` ties these together as [`AccountGovernanceState`].

pub mod cut;
pub mod entities;
pub mod guardians;
pub mod ledger;
pub mod lock;
pub mod message;
pub mod nonces;
pub mod quorum;
pub mod recovery;
pub mod state;

pub use cut::{CutAction, FacetCut, ModuleCut, ModuleTable, RegistrationCheck};
pub use entities::{
    ActionStatus, Approval, ApprovalChannel, Principal, Workflow, WorkflowKind,
};
pub use guardians::GuardianRegistry;
pub use ledger::{ApprovalReceipt, PendingAction, SignatureBatch, SignedApproval};
pub use lock::{LockRecord, PendingLock};
pub use nonces::{NonceSequencer, NonceSlot};
pub use quorum::{majority, QuorumDecision};
pub use recovery::{PendingRecovery, RecoveryRecord};
pub use state::AccountGovernanceState;
