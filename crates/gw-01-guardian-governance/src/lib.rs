//! # gw-01-guardian-governance
//!
//! Guardian-quorum governance engine for a smart-contract wallet account.
//!
//! ## Overview
//!
//! This subsystem provides:
//! - **Guardian Registry**: Time-locked additions with a confirmation window
//! - **Dual-Channel Approvals**: On-chain calls and off-chain signature batches
//!   accumulate on the same pending action
//! - **Majority Quorum**: `floor(g/2) + 1` guardians, snapshotted per action
//! - **Replay Protection**: Per-workflow nonces bound into every signed digest
//! - **Recovery**: Delayed owner rotation with cancel, hardstop and finalize
//! - **Lock**: Account freeze that outbound calls must respect
//! - **Module Cuts**: Atomic selector table changes gated by a facet registry
//!
//! ## Architecture
//!
//! ```text
//! caller / relayer ──→ GovernanceApi (service)
//!                          │
//!                          ├── SignerRecovery ──→ secp256k1 recovery
//!                          ├── FacetRegistry  ──→ registered modules
//!                          └── Clock          ──→ unix seconds
//! ```
//!
//! Every mutating call runs against a draft of the account state and is
//! committed only when it succeeds.
//!
//! ## Signed Digest
//!
//! ```text
//! keccak256("\x19Ethereum Signed Message:\n32" ‖
//!     keccak256(keccak256(tag) ‖ payload ‖ account ‖ chain_id ‖ nonce))
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use gw_01_guardian_governance::{GovernanceConfig, GovernanceService, AccountGovernanceState};
//! use gw_01_guardian_governance::adapters::{EcdsaSignerRecovery, InMemoryFacetRegistry, SystemClock};
//! use gw_01_guardian_governance::ports::inbound::GovernanceApi;
//!
//! let state = AccountGovernanceState::new(account, chain_id, owner)?;
//! let service = GovernanceService::new(
//!     GovernanceConfig::from_env()?,
//!     state,
//!     Arc::new(InMemoryFacetRegistry::new()),
//!     Arc::new(EcdsaSignerRecovery::new()),
//!     Arc::new(SystemClock),
//! );
//!
//! service.propose_guardian(owner, guardian)?;
//! // ... one security period later
//! service.confirm_guardian_addition(guardian)?;
//!
//! if service.is_locked() {
//!     // refuse outbound transfers
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod metrics;
pub mod ports;
pub mod service;

pub use config::GovernanceConfig;
pub use domain::{
    AccountGovernanceState, ApprovalChannel, ApprovalReceipt, CutAction, FacetCut, ModuleCut,
    ModuleTable, NonceSlot, PendingLock, PendingRecovery, Principal, Workflow, WorkflowKind,
};
pub use errors::{ConfigError, ErrorKind, GovernanceError, GovernanceResult, Role};
pub use events::GovernanceEvent;
pub use ports::inbound::GovernanceApi;
pub use ports::outbound::{Clock, FacetRegistry, SignerRecovery};
pub use service::{GovernanceService, ServiceStats};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
