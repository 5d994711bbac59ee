//! # Storage-Proof Index
//!
//! Transactions carrying storage proofs, bucketed by the greatest start
//! height among the contracts they prove and deduplicated by content id
//! within a bucket. A reverse map from id to heights answers membership
//! and removal without scanning buckets.

use super::entities::{BlockHeight, Transaction, TransactionId};
use super::errors::PoolError;
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Default)]
pub struct StorageProofIndex {
    buckets: BTreeMap<BlockHeight, HashMap<TransactionId, Transaction>>,
    heights_by_id: HashMap<TransactionId, BTreeSet<BlockHeight>>,
}

impl StorageProofIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `id` is filed under `height`.
    pub fn contains(&self, height: BlockHeight, id: &TransactionId) -> bool {
        self.buckets
            .get(&height)
            .is_some_and(|bucket| bucket.contains_key(id))
    }

    /// Returns true if `id` is filed under any height.
    pub fn contains_id(&self, id: &TransactionId) -> bool {
        self.heights_by_id.contains_key(id)
    }

    /// Files `transaction` under `height`.
    ///
    /// # Errors
    /// `DuplicateTransaction` if `id` is already in that bucket. The index is
    /// unchanged on error.
    pub fn insert(
        &mut self,
        height: BlockHeight,
        id: TransactionId,
        transaction: Transaction,
    ) -> Result<(), PoolError> {
        if self.contains(height, &id) {
            return Err(PoolError::DuplicateTransaction(id));
        }
        self.buckets
            .entry(height)
            .or_default()
            .insert(id, transaction);
        self.heights_by_id.entry(id).or_default().insert(height);
        Ok(())
    }

    /// Transactions filed under `height`.
    pub fn bucket(&self, height: BlockHeight) -> Option<&HashMap<TransactionId, Transaction>> {
        self.buckets.get(&height)
    }

    /// Heights with at least one transaction, ascending.
    pub fn heights(&self) -> impl Iterator<Item = BlockHeight> + '_ {
        self.buckets.keys().copied()
    }

    /// Removes `id` from the lowest bucket holding it. Empty buckets are
    /// dropped.
    pub fn remove(&mut self, id: &TransactionId) -> Option<(BlockHeight, Transaction)> {
        let heights = self.heights_by_id.get_mut(id)?;
        let height = heights.pop_first()?;
        if heights.is_empty() {
            self.heights_by_id.remove(id);
        }

        let bucket = self.buckets.get_mut(&height)?;
        let transaction = bucket.remove(id)?;
        if bucket.is_empty() {
            self.buckets.remove(&height);
        }
        Some((height, transaction))
    }

    /// Total number of transactions across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}
