//! Facet Registry Adapter
//!
//! In-memory registry of approved module addresses and their selector sets.

use crate::ports::outbound::FacetRegistry;
use parking_lot::RwLock;
use shared_types::{Address, Selector};
use std::collections::{BTreeSet, HashMap};

/// Registry backed by a map of module → allowed selectors.
///
/// A cut entry is accepted when every selector it names is registered for
/// its module.
#[derive(Debug, Default)]
pub struct InMemoryFacetRegistry {
    facets: RwLock<HashMap<Address, BTreeSet<Selector>>>,
}

impl InMemoryFacetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Approve `selectors` for `module`, extending any existing registration.
    pub fn register(&self, module: Address, selectors: impl IntoIterator<Item = Selector>) {
        self.facets
            .write()
            .entry(module)
            .or_default()
            .extend(selectors);
    }

    /// Withdraw every registration for `module`.
    pub fn deregister(&self, module: &Address) -> bool {
        self.facets.write().remove(module).is_some()
    }
}

impl FacetRegistry for InMemoryFacetRegistry {
    fn is_registered(&self, module: Address, selectors: &[Selector]) -> bool {
        self.facets.read().get(&module).map_or(false, |allowed| {
            selectors.iter().all(|selector| allowed.contains(selector))
        })
    }
}
