//! Driven Ports (SPI - Outbound Dependencies)

use shared_types::{Address, Hash, Selector, Timestamp};

/// Facet/module registry consulted before any cut touches state.
pub trait FacetRegistry: Send + Sync {
    /// Whether `module` is registered for exactly `selectors`.
    fn is_registered(&self, module: Address, selectors: &[Selector]) -> bool;
}

/// Signature/identity collaborator.
///
/// Malformed input (wrong length, invalid point, malleable S) yields `None`;
/// implementations must never panic.
pub trait SignerRecovery: Send + Sync {
    fn recover_signer(&self, message_hash: &Hash, signature: &[u8]) -> Option<Address>;
}

/// Source of the current time in unix seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
