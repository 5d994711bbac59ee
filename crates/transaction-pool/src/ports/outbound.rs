//! Outbound (Driven) ports for the transaction pool.
//!
//! Collaborators the admission pipeline calls but does not implement. All of
//! them are synchronous and are invoked while the pool's write lock is held.

use crate::domain::{
    ChainStateError, ContractId, FileContract, PoolContext, StandardnessError, Transaction,
    TransactionId, ValidationError,
};

/// Format and fee policy ("is this transaction well-formed").
pub trait StandardnessPolicy: Send + Sync {
    fn is_standard(&self, transaction: &Transaction) -> Result<(), StandardnessError>;
}

/// Chain-state queries.
pub trait ChainState: Send + Sync {
    /// Looks up an on-chain file contract.
    ///
    /// # Errors
    /// `ContractNotFound` if no such contract exists.
    fn contract(&self, id: &ContractId) -> Result<FileContract, ChainStateError>;
}

/// Full consensus validation against chain state plus the pool.
///
/// Covers signatures, balance and script conditions. Inputs spending
/// unconfirmed outputs can be resolved through `pool`.
pub trait TransactionValidator: Send + Sync {
    fn validate(
        &self,
        transaction: &Transaction,
        pool: PoolContext<'_>,
    ) -> Result<(), ValidationError>;
}

/// Deterministic content identifier of a transaction.
pub trait ContentHasher: Send + Sync {
    fn content_id(&self, transaction: &Transaction) -> TransactionId;
}
