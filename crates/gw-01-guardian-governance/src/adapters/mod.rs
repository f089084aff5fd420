//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implementations of the outbound ports.

mod clock;
mod facet_registry;
mod signer_recovery;

pub use clock::{ManualClock, SystemClock};
pub use facet_registry::InMemoryFacetRegistry;
pub use signer_recovery::EcdsaSignerRecovery;
