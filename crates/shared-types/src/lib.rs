//! # Shared Types Crate
//!
//! Value objects used across the Guardian-Wallet workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identities, hashes and selectors are defined
//!   once here and reused by the crypto layer and the governance engine.
//! - **Ethereum Layout**: addresses are 20 bytes, hashes 32 bytes, selectors
//!   4 bytes, matching the execution environment the wallet runs on.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
