//! # Keccak-256 Hashing
//!
//! Digest helpers used to build domain-separated approval messages.

use sha3::{Digest, Keccak256};
use shared_types::Hash;

/// Prefix applied by `personal_sign` style wallets (EIP-191, version 0x45).
const ETH_SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Keccak-256 of a single input.
pub fn keccak256(data: &[u8]) -> Hash {
    keccak256_concat(&[data])
}

/// Keccak-256 over the concatenation of several inputs.
pub fn keccak256_concat(inputs: &[&[u8]]) -> Hash {
    let mut hasher = Keccak256::new();
    for input in inputs {
        hasher.update(input);
    }
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    Hash::new(hash)
}

/// Wrap a 32-byte digest the way off-chain wallets do before signing.
pub fn eth_signed_message_hash(hash: &Hash) -> Hash {
    keccak256_concat(&[ETH_SIGNED_MESSAGE_PREFIX, hash.as_bytes().as_slice()])
}
