//! # Domain Layer - Transaction Pool
//!
//! Pure data structures with no locking and no collaborators.
//!
//! ## Components
//!
//! - `entities`: Transaction, Input, Output, StorageProof, FileContract, ids
//! - `conflicts`: ConflictIndex (consumed and produced output claims)
//! - `graph`: DependencyGraph arena of PooledTransaction
//! - `storage_proofs`: StorageProofIndex bucketed by contract start height
//! - `pool`: TransactionPool aggregate and PoolContext view
//! - `invariants`: InvariantPolicy
//! - `value_objects`: PoolStatus, RemovedTransaction
//! - `errors`: PoolError and the structural error enums

pub mod conflicts;
pub mod entities;
pub mod errors;
pub mod graph;
pub mod invariants;
pub mod pool;
pub mod storage_proofs;
pub mod value_objects;

pub use conflicts::*;
pub use entities::*;
pub use errors::*;
pub use graph::*;
pub use invariants::*;
pub use pool::*;
pub use storage_proofs::*;
pub use value_objects::*;
