//! # Canonical Action Hash
//!
//! Every signature the engine accepts commits to
//!
//! ```text
//! eth_signed( keccak256( keccak256(tag) ‖ payload ‖ pad32(account) ‖ be256(chain_id) ‖ be256(nonce) ) )
//! ```
//!
//! The tag separates workflows, the account and chain id separate wallets
//! and networks, and the nonce separates successive actions.

use super::entities::Workflow;
use shared_crypto::{eth_signed_message_hash, keccak256, keccak256_concat};
use shared_types::{u64_to_word, Address, ChainId, Hash};

/// Hash a signer must sign to approve `workflow` at `nonce`.
pub fn action_hash(workflow: &Workflow, account: Address, chain_id: ChainId, nonce: u64) -> Hash {
    eth_signed_message_hash(&struct_hash(workflow, account, chain_id, nonce))
}

/// The unprefixed digest, before EIP-191 wrapping.
pub fn struct_hash(workflow: &Workflow, account: Address, chain_id: ChainId, nonce: u64) -> Hash {
    let tag = keccak256(workflow.tag().as_bytes());
    let payload = workflow.payload();
    let account = account.to_word();
    let chain_id = u64_to_word(chain_id);
    let nonce = u64_to_word(nonce);

    keccak256_concat(&[
        tag.as_bytes().as_slice(),
        payload.as_slice(),
        account.as_slice(),
        chain_id.as_slice(),
        nonce.as_slice(),
    ])
}
