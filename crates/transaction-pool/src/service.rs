//! Transaction Pool Service - admission pipeline
//!
//! ```text
//!  candidate ──► standardness ──► has storage proofs? ──yes──► contract lookup ──► proof index
//!                    │                    │
//!                 NotStandard             no
//!                                         ▼
//!                 duplicate? ──► conflict check ──► capacity ──► validator ──► commit
//! ```
//!
//! The whole pipeline runs under the write lock, so no two admissions can
//! both pass the conflict check for the same output.

use crate::config::PoolConfig;
use crate::domain::{
    BlockHeight, InvariantViolation, OutputId, PoolError, PoolResult, PoolStatus,
    PooledTransaction, RemovedTransaction, Transaction, TransactionId, TransactionPool,
};
use crate::ports::{
    ChainState, ContentHasher, StandardnessPolicy, TransactionPoolApi, TransactionValidator,
};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Transaction pool service.
///
/// Cheap to clone; clones share the same pool.
pub struct TransactionPoolService<P, C, V, H>
where
    P: StandardnessPolicy,
    C: ChainState,
    V: TransactionValidator,
    H: ContentHasher,
{
    config: PoolConfig,
    pool: Arc<RwLock<TransactionPool>>,
    standardness: Arc<P>,
    chain: Arc<C>,
    validator: Arc<V>,
    hasher: Arc<H>,
}

impl<P, C, V, H> Clone for TransactionPoolService<P, C, V, H>
where
    P: StandardnessPolicy,
    C: ChainState,
    V: TransactionValidator,
    H: ContentHasher,
{
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            pool: Arc::clone(&self.pool),
            standardness: Arc::clone(&self.standardness),
            chain: Arc::clone(&self.chain),
            validator: Arc::clone(&self.validator),
            hasher: Arc::clone(&self.hasher),
        }
    }
}

impl<P, C, V, H> TransactionPoolService<P, C, V, H>
where
    P: StandardnessPolicy,
    C: ChainState,
    V: TransactionValidator,
    H: ContentHasher,
{
    /// Create new transaction pool service
    pub fn new(
        config: PoolConfig,
        standardness: Arc<P>,
        chain: Arc<C>,
        validator: Arc<V>,
        hasher: Arc<H>,
    ) -> Self {
        Self {
            config,
            pool: Arc::new(RwLock::new(TransactionPool::new())),
            standardness,
            chain,
            validator,
            hasher,
        }
    }

    /// Configuration the service was built with.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Files a storage-proof transaction under the greatest start height of
    /// the contracts it proves.
    ///
    /// Skips the standardness check; `accept_transaction` is the normal
    /// entry point.
    ///
    /// # Errors
    /// - `ContractNotFound`: a proof names a contract the chain lacks
    /// - `DuplicateTransaction`: already filed in that bucket
    /// - `PoolFull`: proof capacity reached
    /// - `InvariantViolation`: the transaction carries no storage proofs
    pub fn store_proof_transaction(&self, transaction: Transaction) -> PoolResult<TransactionId> {
        let mut pool = self.pool.write();
        let id = self.hasher.content_id(&transaction);
        self.store_proof_locked(&mut pool, id, transaction)
    }

    /// Returns true if a pooled transaction consumes `output_id`.
    pub fn is_output_claimed(&self, output_id: &OutputId) -> bool {
        self.pool.read().conflicts().claims(output_id)
    }

    /// Runs every cross-index consistency check.
    pub fn is_consistent(&self) -> bool {
        self.pool.read().is_consistent()
    }

    fn store_proof_locked(
        &self,
        pool: &mut TransactionPool,
        id: TransactionId,
        transaction: Transaction,
    ) -> PoolResult<TransactionId> {
        if !transaction.has_storage_proofs() {
            return Err(self
                .config
                .invariant_policy
                .enforce(InvariantViolation::MissingStorageProofs(id)));
        }

        let mut greatest_height: BlockHeight = 0;
        for proof in &transaction.storage_proofs {
            let contract = self.chain.contract(&proof.contract_id).map_err(|e| {
                debug!("[txpool] proof transaction {:?} rejected: {}", id, e);
                PoolError::from(e)
            })?;
            greatest_height = greatest_height.max(contract.start_height());
        }

        if pool.storage_proofs().contains(greatest_height, &id) {
            debug!(
                "[txpool] proof transaction {:?} already filed at height {}",
                id, greatest_height
            );
            return Err(PoolError::DuplicateTransaction(id));
        }
        if pool.proof_count() >= self.config.max_proof_transactions {
            warn!(
                "[txpool] proof index full ({} transactions)",
                self.config.max_proof_transactions
            );
            return Err(PoolError::PoolFull {
                capacity: self.config.max_proof_transactions,
            });
        }

        pool.insert_proof(greatest_height, id, transaction)?;
        info!(
            "[txpool] accepted proof transaction {:?} at height {}",
            id, greatest_height
        );
        Ok(id)
    }

    fn accept_standard_locked(
        &self,
        pool: &mut TransactionPool,
        id: TransactionId,
        transaction: Transaction,
    ) -> PoolResult<TransactionId> {
        if pool.graph().contains(&id) {
            debug!("[txpool] transaction {:?} already pooled", id);
            return Err(PoolError::DuplicateTransaction(id));
        }

        if let Some((output_id, claimed_by)) = pool.find_conflict(&transaction) {
            debug!(
                "[txpool] transaction {:?} conflicts with {:?} on {:?}",
                id, claimed_by, output_id
            );
            return Err(PoolError::ConflictingTransaction {
                output_id,
                claimed_by,
            });
        }

        if pool.standard_count() >= self.config.max_transactions {
            warn!(
                "[txpool] pool full ({} transactions)",
                self.config.max_transactions
            );
            return Err(PoolError::PoolFull {
                capacity: self.config.max_transactions,
            });
        }

        if let Err(e) = self.validator.validate(&transaction, pool.context()) {
            debug!("[txpool] transaction {:?} invalid: {}", id, e);
            return Err(e.into());
        }

        let inputs = transaction.inputs.len();
        let outputs = transaction.outputs.len();
        pool.commit(id, transaction).map_err(|source| {
            self.config
                .invariant_policy
                .enforce(InvariantViolation::CommitFailed { id, source })
        })?;

        let requirements = pool
            .graph()
            .get(&id)
            .map_or(0, |node| node.requirements.len());
        info!(
            "[txpool] accepted transaction {:?} ({} inputs, {} outputs, {} pooled requirements)",
            id, inputs, outputs, requirements
        );
        Ok(id)
    }
}

impl<P, C, V, H> TransactionPoolApi for TransactionPoolService<P, C, V, H>
where
    P: StandardnessPolicy,
    C: ChainState,
    V: TransactionValidator,
    H: ContentHasher,
{
    fn accept_transaction(&self, transaction: Transaction) -> PoolResult<TransactionId> {
        let mut pool = self.pool.write();

        if let Err(e) = self.standardness.is_standard(&transaction) {
            debug!("[txpool] rejecting nonstandard transaction: {}", e);
            return Err(e.into());
        }

        let id = self.hasher.content_id(&transaction);
        if transaction.has_storage_proofs() {
            return self.store_proof_locked(&mut pool, id, transaction);
        }
        self.accept_standard_locked(&mut pool, id, transaction)
    }

    fn remove_confirmed(&self, ids: &[TransactionId]) -> Vec<RemovedTransaction> {
        let mut pool = self.pool.write();
        let removed: Vec<_> = ids
            .iter()
            .filter_map(|id| pool.remove_confirmed(id))
            .collect();

        if !removed.is_empty() {
            info!(
                "[txpool] removed {} confirmed transactions ({} remain)",
                removed.len(),
                pool.status().total()
            );
        }
        removed
    }

    fn evict(&self, id: &TransactionId) -> Vec<TransactionId> {
        let mut pool = self.pool.write();
        let evicted = pool.evict(id);
        if !evicted.is_empty() {
            info!(
                "[txpool] evicted {:?} with {} descendants",
                id,
                evicted.len() - 1
            );
        }
        evicted
    }

    fn contains(&self, id: &TransactionId) -> bool {
        self.pool.read().contains(id)
    }

    fn transaction(&self, id: &TransactionId) -> Option<PooledTransaction> {
        self.pool.read().graph().get(id).cloned()
    }

    fn requirements(&self, id: &TransactionId) -> Option<BTreeSet<TransactionId>> {
        self.pool
            .read()
            .graph()
            .get(id)
            .map(|node| node.requirements.clone())
    }

    fn dependents(&self, id: &TransactionId) -> Option<BTreeSet<TransactionId>> {
        self.pool
            .read()
            .graph()
            .get(id)
            .map(|node| node.dependents.clone())
    }

    fn transactions(&self) -> Vec<PooledTransaction> {
        self.pool
            .read()
            .graph()
            .in_admission_order()
            .into_iter()
            .cloned()
            .collect()
    }

    fn storage_proof_bucket(&self, height: BlockHeight) -> HashMap<TransactionId, Transaction> {
        self.pool
            .read()
            .storage_proofs()
            .bucket(height)
            .cloned()
            .unwrap_or_default()
    }

    fn status(&self) -> PoolStatus {
        self.pool.read().status()
    }
}
