//! Concurrent and randomized admission.

mod common;

use common::*;
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashMap;
use transaction_pool::ports::{ContentHasher, TransactionPoolApi};
use transaction_pool::{OutputId, PoolError, Sha256ContentHasher, Transaction};

const OUTPUTS: u8 = 16;
const SPENDERS_PER_OUTPUT: u64 = 8;

fn funded() -> BalanceValidator {
    let outputs: Vec<_> = (0..OUTPUTS).map(|b| (confirmed(b), 1_000)).collect();
    BalanceValidator::with_confirmed(&outputs)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_double_spends_admit_one_each() {
    let (pool, _) = pool_with(Chain::default(), funded());

    let mut handles = Vec::new();
    for byte in 0..OUTPUTS {
        for attempt in 0..SPENDERS_PER_OUTPUT {
            let pool = pool.clone();
            // Distinct amounts give each spender its own content id
            let tx = transfer(&[confirmed(byte)], &[attempt + 1]);
            handles.push(tokio::task::spawn_blocking(move || {
                pool.accept_transaction(tx)
            }));
        }
    }

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(PoolError::ConflictingTransaction { .. }) => {}
            Err(other) => panic!("unexpected rejection: {other}"),
        }
    }

    assert_eq!(accepted, OUTPUTS as usize);
    let status = pool.status();
    assert_eq!(status.standard_count, OUTPUTS as usize);
    assert_eq!(status.consumed_claims, OUTPUTS as usize);

    // Every confirmed output has exactly one claimant
    let mut claimants: HashMap<OutputId, usize> = HashMap::new();
    for pooled in pool.transactions() {
        for input in &pooled.transaction.inputs {
            *claimants.entry(input.output_id).or_default() += 1;
        }
    }
    assert!(claimants.values().all(|count| *count == 1));
    assert!(pool.is_consistent());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_chain_and_proofs() {
    let (pool, _) = pool_with(Chain::with_contracts(&[(1, 7), (2, 9)]), funded());

    let proof_pool = pool.clone();
    let proofs_task = tokio::task::spawn_blocking(move || {
        (0..20u8)
            .filter(|i| {
                let mut tx = proofs(&[1 + i % 2]);
                tx.arbitrary_data = vec![*i];
                proof_pool.accept_transaction(tx).is_ok()
            })
            .count()
    });

    let chain_pool = pool.clone();
    let chain_task = tokio::task::spawn_blocking(move || {
        let mut previous = chain_pool
            .accept_transaction(transfer(&[confirmed(0)], &[1_000]))
            .unwrap();
        for _ in 0..10 {
            previous = chain_pool
                .accept_transaction(transfer(&[OutputId::derive(&previous, 0)], &[1_000]))
                .unwrap();
        }
        previous
    });

    assert_eq!(proofs_task.await.unwrap(), 20);
    let tip = chain_task.await.unwrap();

    assert_eq!(pool.storage_proof_bucket(7).len(), 10);
    assert_eq!(pool.storage_proof_bucket(9).len(), 10);
    assert_eq!(pool.status().standard_count, 11);
    assert_eq!(pool.status().root_count, 1);
    assert!(pool.dependents(&tip).unwrap().is_empty());
    assert!(pool.is_consistent());
}

/// Builds a random forest of spends over the funded outputs, shuffles the
/// submission order and resubmits until nothing new is accepted.
#[test]
fn test_random_admission_order_keeps_graph_consistent() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..20 {
        let (pool, _) = pool_with(Chain::default(), funded());

        let mut spendable: Vec<OutputId> = (0..OUTPUTS).map(confirmed).collect();
        let mut planned: Vec<Transaction> = Vec::new();
        let hasher = Sha256ContentHasher;
        for _ in 0..40 {
            if spendable.is_empty() {
                break;
            }
            let take = rng.gen_range(1..=spendable.len().min(3));
            let inputs: Vec<_> = (0..take)
                .map(|_| spendable.swap_remove(rng.gen_range(0..spendable.len())))
                .collect();
            let tx = transfer(&inputs, &[0, 0]);
            let id = hasher.content_id(&tx);
            spendable.push(OutputId::derive(&id, 0));
            spendable.push(OutputId::derive(&id, 1));
            planned.push(tx);
        }

        planned.shuffle(&mut rng);
        let mut pending = planned.clone();
        loop {
            let before = pending.len();
            pending.retain(|tx| pool.accept_transaction(tx.clone()).is_err());
            if pending.len() == before {
                break;
            }
        }

        assert!(pending.is_empty(), "every planned spend eventually admits");
        assert_eq!(pool.status().standard_count, planned.len());
        assert!(pool.is_consistent());

        for pooled in pool.transactions() {
            for requirement in &pooled.requirements {
                assert!(pool.dependents(requirement).unwrap().contains(&pooled.id));
            }
            for dependent in &pooled.dependents {
                assert!(pool.requirements(dependent).unwrap().contains(&pooled.id));
            }
        }
    }
}
