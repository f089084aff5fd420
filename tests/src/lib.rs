//! # Guardian-Wallet Test Suite
//!
//! Unified test crate driving the governance engine through its public API
//! with real secp256k1 keys.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── harness.rs        # Wallet fixture: keys, clock, registry, service
//! └── integration/      # End-to-end governance flows
//!     ├── recovery_flows.rs
//!     ├── cut_flows.rs
//!     └── lock_flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p gw-tests
//!
//! # By category
//! cargo test -p gw-tests integration::recovery_flows::
//!
//! # Benchmarks
//! cargo bench -p gw-tests
//! ```

#![allow(unused_variables)]
#![allow(dead_code)]

pub mod harness;
