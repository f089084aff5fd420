//! # Guardian-Wallet Governance Benchmarks
//!
//! | Path | Work per call |
//! |------|---------------|
//! | Action hash | 3 keccak256 |
//! | Signature batch | 1 secp256k1 recovery per approver |
//! | Batch submission | recovery + authorization + ledger write |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gw_01_guardian_governance::adapters::EcdsaSignerRecovery;
use gw_01_guardian_governance::domain::{message, SignatureBatch};
use gw_01_guardian_governance::{GovernanceApi, SignerRecovery, Workflow};
use gw_tests::harness::{sign, Wallet, ACCOUNT, CHAIN_ID};
use shared_crypto::Secp256k1KeyPair;
use shared_types::Address;
use std::time::Duration;

fn bench_action_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("gw-01-action-hash");
    let workflow = Workflow::Recovery {
        new_owner: Address::new([0xEE; 20]),
    };

    group.bench_function("recovery", |b| {
        b.iter(|| message::action_hash(black_box(&workflow), ACCOUNT, CHAIN_ID, black_box(7)))
    });
    group.finish();
}

fn bench_signature_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("gw-01-signature-batch");
    group.measurement_time(Duration::from_secs(10));

    let recovery = EcdsaSignerRecovery::new();
    let workflow = Workflow::Lock {
        selector: shared_types::Selector::new([1, 2, 3, 4]),
    };
    let hash = message::action_hash(&workflow, ACCOUNT, CHAIN_ID, 0);

    for size in [1usize, 3, 7, 15] {
        let keys: Vec<_> = (0..size).map(|_| Secp256k1KeyPair::generate()).collect();
        let approvers: Vec<_> = keys.iter().map(Secp256k1KeyPair::address).collect();
        let signatures: Vec<_> = keys.iter().map(|key| sign(key, &hash)).collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("recover", size), &size, |b, _| {
            b.iter(|| {
                SignatureBatch::recover(&approvers, &signatures, |signature| {
                    recovery.recover_signer(&hash, signature)
                })
            })
        });
    }
    group.finish();
}

fn bench_recovery_submission(c: &mut Criterion) {
    let mut group = c.benchmark_group("gw-01-recovery-submission");

    for guardians in [3usize, 9] {
        let quorum = guardians / 2 + 1;
        group.bench_with_input(
            BenchmarkId::new("execute_recovery", guardians),
            &guardians,
            |b, &guardians| {
                b.iter_batched(
                    || {
                        let wallet = Wallet::with_guardians(guardians);
                        let new_owner = Address::new([0xEE; 20]);
                        let indices: Vec<_> = (0..quorum).collect();
                        let batch = wallet.guardian_batch(&indices, &Workflow::Recovery { new_owner });
                        (wallet, new_owner, batch)
                    },
                    |(wallet, new_owner, (approvers, signatures))| {
                        wallet
                            .service
                            .execute_recovery(new_owner, &approvers, &signatures)
                    },
                    criterion::BatchSize::SmallInput,
                )
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_action_hash,
    bench_signature_batch,
    bench_recovery_submission
);
criterion_main!(benches);
