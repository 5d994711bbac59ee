//! Transaction pool error types.
//!
//! Caller-facing rejections live in [`PoolError`]. Collaborator errors are
//! carried verbatim. Structural errors from the indices only ever reach a
//! caller wrapped in [`InvariantViolation`], since a correct pipeline never
//! triggers them.

use super::entities::{ContractId, OutputId, TransactionId};
use thiserror::Error;

/// Rejection from the standardness policy.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("transaction is not standard: {reason}")]
pub struct StandardnessError {
    pub reason: String,
}

impl StandardnessError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Failure from a chain-state query.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ChainStateError {
    /// No contract with this id exists on chain.
    #[error("contract {0:?} not found on chain")]
    ContractNotFound(ContractId),

    /// The chain state could not be queried.
    #[error("chain state unavailable: {0}")]
    Unavailable(String),
}

/// Rejection from the consensus validator.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid signature on input {index}")]
    InvalidSignature { index: usize },

    #[error("input spends unknown output {0:?}")]
    UnknownOutput(OutputId),

    #[error("inputs {inputs} do not balance outputs and fees {outputs}")]
    Unbalanced { inputs: u64, outputs: u64 },

    #[error("transaction rejected: {0}")]
    Other(String),
}

/// Conflict index failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConflictError {
    #[error("output {output_id:?} already consumed by {claimed_by:?}")]
    AlreadyClaimed {
        output_id: OutputId,
        claimed_by: TransactionId,
    },

    #[error("output {output_id:?} already produced by {produced_by:?}")]
    AlreadyProduced {
        output_id: OutputId,
        produced_by: TransactionId,
    },
}

/// Dependency graph failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("transaction {0:?} is already pooled")]
    AlreadyPooled(TransactionId),

    #[error("requirement {0:?} is not pooled")]
    UnknownRequirement(TransactionId),
}

/// Reasons a commit can fail after validation passed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The same output appears twice among the transaction's own inputs.
    #[error("output {0:?} consumed twice by one transaction")]
    DuplicateInput(OutputId),
}

/// A broken internal invariant. Indicates a bug in the surrounding code,
/// never an invalid transaction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// The storage-proof routine saw a transaction without storage proofs.
    #[error("storage-proof routine invoked on {0:?} which carries no storage proofs")]
    MissingStorageProofs(TransactionId),

    /// Commit failed although conflict check and validation passed.
    #[error("commit of validated transaction {id:?} failed: {source}")]
    CommitFailed {
        id: TransactionId,
        #[source]
        source: CommitError,
    },
}

/// Transaction pool error type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PoolError {
    /// The standardness policy rejected the transaction.
    #[error(transparent)]
    NotStandard(#[from] StandardnessError),

    /// An input spends an output already consumed by a pooled transaction.
    #[error("conflicting transaction: output {output_id:?} already spent by {claimed_by:?}")]
    ConflictingTransaction {
        output_id: OutputId,
        claimed_by: TransactionId,
    },

    /// A storage proof references a contract the chain does not know.
    #[error(transparent)]
    ContractNotFound(#[from] ChainStateError),

    /// The transaction is already known to the pool.
    #[error("transaction already known: {0:?}")]
    DuplicateTransaction(TransactionId),

    /// The validator rejected the transaction.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The pool has no room for another transaction of this kind.
    #[error("pool full at {capacity} transactions")]
    PoolFull { capacity: usize },

    /// An internal invariant was broken.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(#[from] InvariantViolation),
}

impl PoolError {
    /// Returns true for errors caused by the transaction itself rather than
    /// by a bug in the pool or its callers.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::InvariantViolation(_))
    }
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;
