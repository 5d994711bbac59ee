//! # Dependency Graph
//!
//! Arena of pooled transactions keyed by [`TransactionId`]. Edges are stored
//! as id sets on both endpoints:
//!
//! ```text
//!   parent.dependents  ∋ child      (child spends an output of parent)
//!   child.requirements ∋ parent
//! ```
//!
//! Edges only point at transactions already in the arena, so a cycle cannot
//! form: nothing can require a transaction admitted after it.

use super::entities::{Transaction, TransactionId};
use super::errors::GraphError;
use std::collections::{BTreeSet, HashMap, VecDeque};

/// A transaction in the pool together with its graph edges.
#[derive(Clone, Debug)]
pub struct PooledTransaction {
    /// Content identifier.
    pub id: TransactionId,
    /// The transaction itself.
    pub transaction: Transaction,
    /// Pooled transactions whose outputs this one consumes.
    pub requirements: BTreeSet<TransactionId>,
    /// Pooled transactions consuming this one's outputs.
    pub dependents: BTreeSet<TransactionId>,
    /// Admission order, strictly increasing.
    pub sequence: u64,
}

impl PooledTransaction {
    /// Returns true if the transaction spends no unconfirmed output.
    pub fn is_root(&self) -> bool {
        self.requirements.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: HashMap<TransactionId, PooledTransaction>,
    next_sequence: u64,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &TransactionId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &TransactionId) -> Option<&PooledTransaction> {
        self.nodes.get(id)
    }

    /// Checks that `id` could be inserted with `requirements` without
    /// touching the graph.
    pub fn check_insert(
        &self,
        id: &TransactionId,
        requirements: &BTreeSet<TransactionId>,
    ) -> Result<(), GraphError> {
        if self.nodes.contains_key(id) {
            return Err(GraphError::AlreadyPooled(*id));
        }
        if let Some(missing) = requirements.iter().find(|req| !self.nodes.contains_key(*req)) {
            return Err(GraphError::UnknownRequirement(*missing));
        }
        Ok(())
    }

    /// Adds a node and links it both ways to every requirement.
    ///
    /// # Errors
    /// - `AlreadyPooled` if `id` is already a node
    /// - `UnknownRequirement` if a requirement is not a node
    ///
    /// The graph is unchanged on error.
    pub fn insert(
        &mut self,
        id: TransactionId,
        transaction: Transaction,
        requirements: BTreeSet<TransactionId>,
    ) -> Result<(), GraphError> {
        self.check_insert(&id, &requirements)?;

        for requirement in &requirements {
            if let Some(parent) = self.nodes.get_mut(requirement) {
                parent.dependents.insert(id);
            }
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.nodes.insert(
            id,
            PooledTransaction {
                id,
                transaction,
                requirements,
                dependents: BTreeSet::new(),
                sequence,
            },
        );
        Ok(())
    }

    /// Removes a node and every edge touching it.
    ///
    /// Former dependents stay in the graph; they lose this requirement and
    /// may become roots.
    pub fn remove(&mut self, id: &TransactionId) -> Option<PooledTransaction> {
        let node = self.nodes.remove(id)?;

        for requirement in &node.requirements {
            if let Some(parent) = self.nodes.get_mut(requirement) {
                parent.dependents.remove(id);
            }
        }
        for dependent in &node.dependents {
            if let Some(child) = self.nodes.get_mut(dependent) {
                child.requirements.remove(id);
            }
        }

        Some(node)
    }

    /// Returns `id` followed by every transitive dependent, parents before
    /// children.
    ///
    /// The family is ordered by admission sequence, which is topological
    /// because edges only point at earlier admissions.
    pub fn with_descendants(&self, id: &TransactionId) -> Vec<TransactionId> {
        if !self.nodes.contains_key(id) {
            return Vec::new();
        }

        let mut seen = BTreeSet::new();
        let mut family = Vec::new();
        let mut queue = VecDeque::from([*id]);

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            if let Some(node) = self.nodes.get(&current) {
                family.push(node);
                queue.extend(node.dependents.iter().copied());
            }
        }

        family.sort_by_key(|node| node.sequence);
        family.into_iter().map(|node| node.id).collect()
    }

    /// Transactions with no pooled requirements.
    pub fn roots(&self) -> impl Iterator<Item = &PooledTransaction> {
        self.nodes.values().filter(|node| node.is_root())
    }

    /// All nodes ordered by admission.
    pub fn in_admission_order(&self) -> Vec<&PooledTransaction> {
        let mut nodes: Vec<_> = self.nodes.values().collect();
        nodes.sort_by_key(|node| node.sequence);
        nodes
    }

    /// Returns true if every edge is recorded on both endpoints and points
    /// at a pooled transaction.
    pub fn is_consistent(&self) -> bool {
        self.nodes.values().all(|node| {
            node.requirements.iter().all(|req| {
                self.nodes
                    .get(req)
                    .is_some_and(|parent| parent.dependents.contains(&node.id))
            }) && node.dependents.iter().all(|dep| {
                self.nodes
                    .get(dep)
                    .is_some_and(|child| child.requirements.contains(&node.id))
            })
        })
    }
}
