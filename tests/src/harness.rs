//! # Wallet Fixture
//!
//! One account with an owner key, N confirmed guardian keys, a manual clock
//! and an in-memory facet registry, wired into a `GovernanceService`.

use gw_01_guardian_governance::adapters::{EcdsaSignerRecovery, InMemoryFacetRegistry, ManualClock};
use gw_01_guardian_governance::domain::message;
use gw_01_guardian_governance::{
    AccountGovernanceState, GovernanceApi, GovernanceConfig, GovernanceService, ModuleTable,
    Workflow,
};
use shared_crypto::Secp256k1KeyPair;
use shared_types::{Address, ChainId, Hash, Timestamp};
use std::sync::Arc;

pub const ACCOUNT: Address = Address::new([0xAC; 20]);
pub const CHAIN_ID: ChainId = 1;
pub const GENESIS: Timestamp = 1_700_000_000;

pub type Service = GovernanceService<InMemoryFacetRegistry, EcdsaSignerRecovery, ManualClock>;

pub struct Wallet {
    pub owner: Secp256k1KeyPair,
    pub guardians: Vec<Secp256k1KeyPair>,
    pub clock: Arc<ManualClock>,
    pub registry: Arc<InMemoryFacetRegistry>,
    pub service: Service,
}

impl Wallet {
    /// Account with `guardian_count` guardians already confirmed.
    pub fn with_guardians(guardian_count: usize) -> Self {
        Self::build(guardian_count, ModuleTable::new())
    }

    /// Same as [`Wallet::with_guardians`] but with pre-installed routes.
    pub fn build(guardian_count: usize, modules: ModuleTable) -> Self {
        wallet_telemetry::init_for_tests();

        let owner = Secp256k1KeyPair::generate();
        let clock = Arc::new(ManualClock::new(GENESIS));
        let registry = Arc::new(InMemoryFacetRegistry::new());
        let state = AccountGovernanceState::new(ACCOUNT, CHAIN_ID, owner.address())
            .expect("owner is non-zero")
            .with_modules(modules);
        let service = GovernanceService::new(
            GovernanceConfig::default(),
            state,
            Arc::clone(&registry),
            Arc::new(EcdsaSignerRecovery::new()),
            Arc::clone(&clock),
        );

        let guardians: Vec<_> = (0..guardian_count)
            .map(|_| Secp256k1KeyPair::generate())
            .collect();
        for guardian in &guardians {
            service
                .propose_guardian(owner.address(), guardian.address())
                .expect("propose guardian");
        }
        if !guardians.is_empty() {
            clock.advance(service.config().guardian_security_period);
        }
        for guardian in &guardians {
            service
                .confirm_guardian_addition(guardian.address())
                .expect("confirm guardian");
        }
        service.take_events();

        Self {
            owner,
            guardians,
            clock,
            registry,
            service,
        }
    }

    pub fn owner_address(&self) -> Address {
        self.owner.address()
    }

    pub fn guardian(&self, index: usize) -> Address {
        self.guardians[index].address()
    }

    /// Approvers and signatures from the given guardians over `workflow` at
    /// its current nonce.
    pub fn guardian_batch(&self, indices: &[usize], workflow: &Workflow) -> (Vec<Address>, Vec<Vec<u8>>) {
        let hash = self.service.action_hash(workflow);
        indices
            .iter()
            .map(|&i| (self.guardian(i), sign(&self.guardians[i], &hash)))
            .unzip()
    }

    /// Digest for `workflow` at an explicit nonce.
    pub fn hash_at(&self, workflow: &Workflow, nonce: u64) -> Hash {
        message::action_hash(workflow, ACCOUNT, CHAIN_ID, nonce)
    }
}

pub fn sign(key: &Secp256k1KeyPair, hash: &Hash) -> Vec<u8> {
    key.sign_prehash(hash).expect("signing succeeds").to_vec()
}
