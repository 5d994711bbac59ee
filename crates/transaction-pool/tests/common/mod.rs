//! Shared collaborators for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use transaction_pool::ports::{ChainState, StandardnessPolicy, TransactionValidator};
use transaction_pool::{
    ChainStateError, ContractId, FileContract, Input, Output, OutputId, PoolConfig, PoolContext,
    Sha256ContentHasher, StandardnessError, StorageProof, Transaction, TransactionPoolService,
    ValidationError,
};

pub type Pool = TransactionPoolService<SizePolicy, Chain, BalanceValidator, Sha256ContentHasher>;

/// Rejects transactions with more than `max_inputs` inputs.
pub struct SizePolicy {
    pub max_inputs: usize,
}

impl StandardnessPolicy for SizePolicy {
    fn is_standard(&self, transaction: &Transaction) -> Result<(), StandardnessError> {
        if transaction.inputs.len() > self.max_inputs {
            return Err(StandardnessError::new(format!(
                "{} inputs exceeds {}",
                transaction.inputs.len(),
                self.max_inputs
            )));
        }
        Ok(())
    }
}

/// Contract table that counts lookups.
#[derive(Default)]
pub struct Chain {
    contracts: HashMap<ContractId, FileContract>,
    lookups: AtomicUsize,
}

impl Chain {
    pub fn with_contracts(starts: &[(u8, u64)]) -> Self {
        let contracts = starts
            .iter()
            .map(|(byte, start)| {
                (
                    ContractId([*byte; 32]),
                    FileContract {
                        file_merkle_root: [*byte; 32],
                        file_size: 4096,
                        start: *start,
                        end: start + 144,
                        payout: 1_000,
                    },
                )
            })
            .collect();
        Self {
            contracts,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl ChainState for Chain {
    fn contract(&self, id: &ContractId) -> Result<FileContract, ChainStateError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.contracts
            .get(id)
            .cloned()
            .ok_or(ChainStateError::ContractNotFound(*id))
    }
}

/// Checks that inputs cover outputs plus fees. Inputs resolve against a
/// fixed confirmed output set, then against the pool.
#[derive(Default)]
pub struct BalanceValidator {
    confirmed: HashMap<OutputId, u64>,
}

impl BalanceValidator {
    pub fn with_confirmed(outputs: &[(OutputId, u64)]) -> Self {
        Self {
            confirmed: outputs.iter().copied().collect(),
        }
    }
}

impl TransactionValidator for BalanceValidator {
    fn validate(
        &self,
        transaction: &Transaction,
        pool: PoolContext<'_>,
    ) -> Result<(), ValidationError> {
        let mut inputs = 0u64;
        for input in &transaction.inputs {
            let value = match self.confirmed.get(&input.output_id) {
                Some(value) => *value,
                None => pool
                    .unconfirmed_output(&input.output_id)
                    .map(|output| output.value)
                    .ok_or(ValidationError::UnknownOutput(input.output_id))?,
            };
            inputs += value;
        }

        let outputs = transaction.outputs.iter().map(|o| o.value).sum::<u64>()
            + transaction.miner_fees.iter().sum::<u64>();
        if inputs < outputs {
            return Err(ValidationError::Unbalanced { inputs, outputs });
        }
        Ok(())
    }
}

pub fn confirmed(byte: u8) -> OutputId {
    OutputId([byte; 32])
}

pub fn pool_with(chain: Chain, validator: BalanceValidator) -> (Pool, Arc<Chain>) {
    let chain = Arc::new(chain);
    let pool = TransactionPoolService::new(
        PoolConfig::for_testing(),
        Arc::new(SizePolicy { max_inputs: 8 }),
        Arc::clone(&chain),
        Arc::new(validator),
        Arc::new(Sha256ContentHasher),
    );
    (pool, chain)
}

/// Spends `inputs`, paying `values` to fresh outputs.
pub fn transfer(inputs: &[OutputId], values: &[u64]) -> Transaction {
    Transaction {
        inputs: inputs.iter().copied().map(Input::new).collect(),
        outputs: values
            .iter()
            .map(|value| Output {
                value: *value,
                spend_hash: [0x11; 32],
            })
            .collect(),
        ..Default::default()
    }
}

pub fn proofs(contracts: &[u8]) -> Transaction {
    Transaction {
        storage_proofs: contracts
            .iter()
            .map(|byte| StorageProof {
                contract_id: ContractId([*byte; 32]),
                segment: vec![*byte; 64],
                hash_set: vec![[*byte; 32]],
            })
            .collect(),
        ..Default::default()
    }
}
