//! Signer Recovery Adapter
//!
//! Implements `SignerRecovery` with secp256k1 recoverable signatures from
//! `shared-crypto` (65-byte `r ‖ s ‖ v`, low-S only).

use crate::ports::outbound::SignerRecovery;
use shared_crypto::{recover_address, RecoverableSignature};
use shared_types::{Address, Hash};
use tracing::debug;

/// ECDSA (secp256k1) signer recovery.
#[derive(Clone, Copy, Debug, Default)]
pub struct EcdsaSignerRecovery;

impl EcdsaSignerRecovery {
    pub fn new() -> Self {
        Self
    }
}

impl SignerRecovery for EcdsaSignerRecovery {
    fn recover_signer(&self, message_hash: &Hash, signature: &[u8]) -> Option<Address> {
        let parsed = match RecoverableSignature::from_slice(signature) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("[gw-01] Rejecting signature: {}", e);
                return None;
            }
        };

        match recover_address(message_hash, &parsed) {
            Ok(address) => Some(address),
            Err(e) => {
                debug!("[gw-01] Signer recovery failed: {}", e);
                None
            }
        }
    }
}
