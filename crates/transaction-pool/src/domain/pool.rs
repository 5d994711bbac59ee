//! # Transaction Pool Aggregate
//!
//! Owns the conflict index, the dependency graph and the storage-proof
//! index. Performs no locking and calls no collaborator; the service wraps
//! it in a lock and drives the admission pipeline.
//!
//! ## Invariants Enforced
//!
//! - An output id is consumed by at most one pooled transaction
//! - Every claim belongs to a transaction in the graph
//! - Requirements and dependents mirror each other
//! - Commit either applies completely or not at all (`plan_commit`)

use super::conflicts::ConflictIndex;
use super::entities::{BlockHeight, Output, OutputId, Transaction, TransactionId};
use super::errors::{CommitError, ConflictError, PoolResult};
use super::graph::{DependencyGraph, PooledTransaction};
use super::storage_proofs::StorageProofIndex;
use super::value_objects::{PoolStatus, RemovedTransaction};
use std::collections::{BTreeSet, HashSet};

/// Everything needed to link a validated transaction into the pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitPlan {
    pub id: TransactionId,
    pub requirements: BTreeSet<TransactionId>,
    pub consumed: Vec<OutputId>,
    pub produced: Vec<(usize, OutputId)>,
}

#[derive(Debug, Default)]
pub struct TransactionPool {
    conflicts: ConflictIndex,
    graph: DependencyGraph,
    storage_proofs: StorageProofIndex,
}

impl TransactionPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conflicts(&self) -> &ConflictIndex {
        &self.conflicts
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn storage_proofs(&self) -> &StorageProofIndex {
        &self.storage_proofs
    }

    /// Read-only view handed to the validator.
    pub fn context(&self) -> PoolContext<'_> {
        PoolContext { pool: self }
    }

    /// Number of standard transactions in the graph.
    pub fn standard_count(&self) -> usize {
        self.graph.len()
    }

    /// Number of storage-proof transactions.
    pub fn proof_count(&self) -> usize {
        self.storage_proofs.len()
    }

    /// Returns true if `id` is pooled on either branch.
    pub fn contains(&self, id: &TransactionId) -> bool {
        self.graph.contains(id) || self.storage_proofs.contains_id(id)
    }

    /// Returns the first input spending an output another pooled transaction
    /// already consumes, with that transaction's id.
    pub fn find_conflict(&self, transaction: &Transaction) -> Option<(OutputId, TransactionId)> {
        transaction.consumed_output_ids().find_map(|output_id| {
            self.conflicts
                .claimant(&output_id)
                .map(|claimed_by| (output_id, claimed_by))
        })
    }

    /// Works out the edges and claims for `transaction` without mutating
    /// anything.
    ///
    /// # Errors
    /// Any reason the subsequent commit would fail.
    pub fn plan_commit(
        &self,
        id: TransactionId,
        transaction: &Transaction,
    ) -> Result<CommitPlan, CommitError> {
        let mut consumed = Vec::with_capacity(transaction.inputs.len());
        let mut seen = HashSet::with_capacity(transaction.inputs.len());
        let mut requirements = BTreeSet::new();

        for output_id in transaction.consumed_output_ids() {
            if !seen.insert(output_id) {
                return Err(CommitError::DuplicateInput(output_id));
            }
            if let Some(claimed_by) = self.conflicts.claimant(&output_id) {
                return Err(ConflictError::AlreadyClaimed {
                    output_id,
                    claimed_by,
                }
                .into());
            }
            // Outputs not produced in the pool are confirmed; no edge.
            if let Some(produced) = self.conflicts.producer(&output_id) {
                requirements.insert(produced.producer);
            }
            consumed.push(output_id);
        }

        let produced: Vec<_> = transaction.produced_output_ids(&id).collect();
        for (_, output_id) in &produced {
            if let Some(existing) = self.conflicts.producer(output_id) {
                return Err(ConflictError::AlreadyProduced {
                    output_id: *output_id,
                    produced_by: existing.producer,
                }
                .into());
            }
        }

        self.graph.check_insert(&id, &requirements)?;

        Ok(CommitPlan {
            id,
            requirements,
            consumed,
            produced,
        })
    }

    /// Links a validated transaction into the graph and claims its outputs.
    ///
    /// The whole plan is checked before the first mutation, so on error the
    /// pool is unchanged.
    pub fn commit(&mut self, id: TransactionId, transaction: Transaction) -> Result<(), CommitError> {
        let plan = self.plan_commit(id, &transaction)?;

        self.graph.insert(plan.id, transaction, plan.requirements)?;
        for output_id in plan.consumed {
            self.conflicts.record_consumption(output_id, plan.id)?;
        }
        for (index, output_id) in plan.produced {
            self.conflicts.record_production(output_id, plan.id, index)?;
        }
        Ok(())
    }

    /// Files a storage-proof transaction under `height`.
    pub fn insert_proof(
        &mut self,
        height: BlockHeight,
        id: TransactionId,
        transaction: Transaction,
    ) -> PoolResult<()> {
        self.storage_proofs.insert(height, id, transaction)
    }

    /// Removes a transaction that was included in a block.
    ///
    /// Its claims are released. Dependents stay pooled because the outputs
    /// they spend are now confirmed.
    pub fn remove_confirmed(&mut self, id: &TransactionId) -> Option<RemovedTransaction> {
        if let Some(node) = self.remove_standard(id) {
            return Some(RemovedTransaction::Standard {
                id: node.id,
                transaction: node.transaction,
            });
        }
        self.storage_proofs
            .remove(id)
            .map(|(height, transaction)| RemovedTransaction::StorageProof {
                id: *id,
                height,
                transaction,
            })
    }

    /// Removes `id` and every transitive dependent, children first.
    ///
    /// Returns the ids removed, in removal order.
    pub fn evict(&mut self, id: &TransactionId) -> Vec<TransactionId> {
        let family = self.graph.with_descendants(id);
        family
            .into_iter()
            .rev()
            .filter_map(|member| self.remove_standard(&member).map(|node| node.id))
            .collect()
    }

    fn remove_standard(&mut self, id: &TransactionId) -> Option<PooledTransaction> {
        let node = self.graph.remove(id)?;
        for output_id in node.transaction.consumed_output_ids() {
            self.conflicts.release_consumption(&output_id, id);
        }
        for (_, output_id) in node.transaction.produced_output_ids(id) {
            self.conflicts.release_production(&output_id, id);
        }
        Some(node)
    }

    /// Snapshot of pool sizes.
    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            standard_count: self.graph.len(),
            root_count: self.graph.roots().count(),
            consumed_claims: self.conflicts.consumed_count(),
            produced_claims: self.conflicts.produced_count(),
            proof_count: self.storage_proofs.len(),
            proof_bucket_count: self.storage_proofs.bucket_count(),
        }
    }

    /// Checks every cross-index invariant. Intended for tests and audits.
    pub fn is_consistent(&self) -> bool {
        let claims_owned = self
            .conflicts
            .consumed()
            .all(|(output_id, owner)| {
                self.graph.get(owner).is_some_and(|node| {
                    node.transaction
                        .consumed_output_ids()
                        .any(|spent| spent == *output_id)
                })
            });

        let edges_match_claims = self.graph.in_admission_order().iter().all(|node| {
            node.transaction.consumed_output_ids().all(|output_id| {
                self.conflicts.claimant(&output_id) == Some(node.id)
            }) && node.requirements.iter().all(|req| {
                node.transaction.consumed_output_ids().any(|output_id| {
                    self.conflicts
                        .producer(&output_id)
                        .is_some_and(|produced| produced.producer == *req)
                })
            })
        });

        claims_owned && edges_match_claims && self.graph.is_consistent()
    }
}

/// Read-only view of the pool used during validation.
#[derive(Clone, Copy)]
pub struct PoolContext<'a> {
    pool: &'a TransactionPool,
}

impl<'a> PoolContext<'a> {
    /// Returns the unconfirmed output with this id, if a pooled transaction
    /// created it.
    pub fn unconfirmed_output(&self, output_id: &OutputId) -> Option<&'a Output> {
        let produced = self.pool.conflicts.producer(output_id)?;
        self.pool
            .graph
            .get(&produced.producer)?
            .transaction
            .outputs
            .get(produced.index)
    }

    /// Returns true if a pooled transaction already consumes this output.
    pub fn is_claimed(&self, output_id: &OutputId) -> bool {
        self.pool.conflicts.claims(output_id)
    }

    /// Returns true if `id` is pooled.
    pub fn contains(&self, id: &TransactionId) -> bool {
        self.pool.contains(id)
    }
}
