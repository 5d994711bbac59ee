//! # Inbound Port - TransactionPoolApi
//!
//! Primary driving port used by the networking and block-assembly layers.

use crate::domain::{
    BlockHeight, PoolResult, PoolStatus, PooledTransaction, RemovedTransaction, Transaction,
    TransactionId,
};
use std::collections::{BTreeSet, HashMap};

/// Primary API for the transaction pool.
///
/// Every method takes `&self`; implementations serialize writers internally.
///
/// # Example
///
/// ```rust,ignore
/// use transaction_pool::ports::TransactionPoolApi;
///
/// fn relay(pool: &impl TransactionPoolApi, tx: Transaction) {
///     match pool.accept_transaction(tx) {
///         Ok(id) => broadcast(id),
///         Err(e) if e.is_rejection() => debug!("dropped: {e}"),
///         Err(e) => error!("pool bug: {e}"),
///     }
/// }
/// ```
pub trait TransactionPoolApi: Send + Sync {
    /// Runs the admission pipeline on `transaction`.
    ///
    /// # Errors
    /// - `NotStandard`: the standardness policy rejected it
    /// - `ContractNotFound`: a storage proof names an unknown contract
    /// - `DuplicateTransaction`: already pooled
    /// - `ConflictingTransaction`: an input is already spent in the pool
    /// - `Invalid`: the validator rejected it
    /// - `PoolFull`: capacity reached
    /// - `InvariantViolation`: a pool bug, under `InvariantPolicy::Report`
    fn accept_transaction(&self, transaction: Transaction) -> PoolResult<TransactionId>;

    /// Removes transactions included in a block. Unknown ids are ignored.
    fn remove_confirmed(&self, ids: &[TransactionId]) -> Vec<RemovedTransaction>;

    /// Removes a standard transaction and all of its pooled descendants.
    fn evict(&self, id: &TransactionId) -> Vec<TransactionId>;

    /// Returns true if the transaction is pooled on either branch.
    fn contains(&self, id: &TransactionId) -> bool;

    /// Gets a standard pooled transaction with its edges.
    fn transaction(&self, id: &TransactionId) -> Option<PooledTransaction>;

    /// Pooled transactions whose outputs `id` spends.
    fn requirements(&self, id: &TransactionId) -> Option<BTreeSet<TransactionId>>;

    /// Pooled transactions spending outputs of `id`.
    fn dependents(&self, id: &TransactionId) -> Option<BTreeSet<TransactionId>>;

    /// Standard transactions in admission order.
    fn transactions(&self) -> Vec<PooledTransaction>;

    /// Storage-proof transactions filed under `height`.
    fn storage_proof_bucket(&self, height: BlockHeight) -> HashMap<TransactionId, Transaction>;

    /// Current pool status.
    fn status(&self) -> PoolStatus;
}
