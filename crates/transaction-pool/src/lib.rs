//! # Transaction Pool
//!
//! Admission layer for unconfirmed transactions. Decides whether a candidate
//! may enter the pool, tracks which outputs pooled transactions already
//! spend, links transactions that spend each other's unconfirmed outputs,
//! and files storage-proof transactions by contract start height.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | An output is consumed by at most one pooled transaction | `domain/conflicts.rs` - `record_consumption()` |
//! | Requirements and dependents mirror each other | `domain/graph.rs` - `insert()` / `remove()` |
//! | No duplicate content id within a proof bucket | `domain/storage_proofs.rs` - `insert()` |
//! | A rejected transaction changes nothing | `domain/pool.rs` - `plan_commit()` |
//! | Check-then-commit is atomic | `service.rs` - write lock over the whole pipeline |
//!
//! ## Admission Pipeline
//!
//! ```text
//! [CANDIDATE] ──standardness──→ storage proofs? ──yes──→ [PROOF INDEX]
//!                                     │
//!                                     no
//!                                     ↓
//!              duplicate ─→ conflict ─→ capacity ─→ validate ─→ commit ──→ [GRAPH]
//! ```
//!
//! | Stage | Rejection |
//! |-------|-----------|
//! | Standardness | `NotStandard` |
//! | Contract lookup (proof branch) | `ContractNotFound` |
//! | Bucket dedup (proof branch) | `DuplicateTransaction` |
//! | Duplicate / conflict | `DuplicateTransaction` / `ConflictingTransaction` |
//! | Validation | `Invalid` (validator error verbatim) |
//! | Commit | `InvariantViolation` (never a normal rejection) |
//!
//! ## Outbound Dependencies
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | `StandardnessPolicy` | Format and fee policy |
//! | `ChainState` | Contract lookup |
//! | `TransactionValidator` | Signatures, balance, script conditions |
//! | `ContentHasher` | Content identifier |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  service.rs  - TransactionPoolService (lock + pipeline)         │
//! │  adapters/   - Sha256ContentHasher                              │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - TransactionPoolApi                         │
//! │  ports/outbound.rs - StandardnessPolicy, ChainState,            │
//! │                      TransactionValidator, ContentHasher        │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/conflicts.rs      - ConflictIndex                       │
//! │  domain/graph.rs          - DependencyGraph, PooledTransaction  │
//! │  domain/storage_proofs.rs - StorageProofIndex                   │
//! │  domain/pool.rs           - TransactionPool aggregate           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use transaction_pool::{PoolConfig, Sha256ContentHasher, TransactionPoolService};
//! use transaction_pool::ports::TransactionPoolApi;
//!
//! let pool = TransactionPoolService::new(
//!     PoolConfig::from_env(),
//!     Arc::new(policy),
//!     Arc::new(chain),
//!     Arc::new(validator),
//!     Arc::new(Sha256ContentHasher),
//! );
//!
//! let id = pool.accept_transaction(tx)?;
//! // Later, when a block lands:
//! pool.remove_confirmed(&block_tx_ids);
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use config::PoolConfig;
pub use domain::*;
pub use service::TransactionPoolService;
