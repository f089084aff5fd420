//! Per-workflow replay counters.

use serde::{Deserialize, Serialize};

/// Independent nonce counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NonceSlot {
    /// Module cuts.
    Cut,
    /// Recovery execution, cancellation and hardstop.
    Recovery,
    /// Unlock.
    Lock,
}

/// Monotonic counters, one per [`NonceSlot`].
///
/// Counters only move forward through [`NonceSequencer::consume`], which is
/// crate-private: the only callers are the finalization paths.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NonceSequencer {
    cut: u64,
    recovery: u64,
    lock: u64,
}

impl NonceSequencer {
    /// Fresh counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value the next signed message for `slot` must commit to.
    pub fn current(&self, slot: NonceSlot) -> u64 {
        match slot {
            NonceSlot::Cut => self.cut,
            NonceSlot::Recovery => self.recovery,
            NonceSlot::Lock => self.lock,
        }
    }

    /// Advance `slot` by one and return the value that was consumed.
    pub(crate) fn consume(&mut self, slot: NonceSlot) -> u64 {
        let counter = match slot {
            NonceSlot::Cut => &mut self.cut,
            NonceSlot::Recovery => &mut self.recovery,
            NonceSlot::Lock => &mut self.lock,
        };
        let consumed = *counter;
        *counter += 1;
        consumed
    }
}
