//! Ports module for guardian governance
//!
//! - inbound: the API the account's execution path and relayers call
//! - outbound: collaborators the engine consults

pub mod inbound;
pub mod outbound;

pub use inbound::GovernanceApi;
pub use outbound::{Clock, FacetRegistry, SignerRecovery};
