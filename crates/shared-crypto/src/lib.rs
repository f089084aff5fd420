//! # Shared Crypto - Signer Recovery Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | Keccak-256, EIP-191 | Message digests for signed approvals |
//! | `ecdsa` | secp256k1 | Guardian/owner signing and signer recovery |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic nonces, low-S enforcement (EIP-2)
//! - **Recovery**: malformed input never panics; it is reported as an error
//!   so callers can decide whether a bad signature is fatal

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod hashing;

// Re-exports
pub use ecdsa::{recover_address, RecoverableSignature, Secp256k1KeyPair, SIGNATURE_LENGTH};
pub use errors::CryptoError;
pub use hashing::{eth_signed_message_hash, keccak256, keccak256_concat};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
