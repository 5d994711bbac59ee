//! Value objects returned by pool queries and removals.

use super::entities::{BlockHeight, Transaction, TransactionId};

/// Pool status snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStatus {
    /// Standard transactions in the dependency graph.
    pub standard_count: usize,
    /// Standard transactions that spend no unconfirmed output.
    pub root_count: usize,
    /// Outputs consumed by pooled transactions.
    pub consumed_claims: usize,
    /// Unconfirmed outputs created by pooled transactions.
    pub produced_claims: usize,
    /// Storage-proof transactions.
    pub proof_count: usize,
    /// Distinct storage-proof height buckets.
    pub proof_bucket_count: usize,
}

impl PoolStatus {
    /// Total transactions across both branches.
    pub fn total(&self) -> usize {
        self.standard_count + self.proof_count
    }
}

/// A transaction taken out of the pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemovedTransaction {
    /// Removed from the dependency graph.
    Standard {
        id: TransactionId,
        transaction: Transaction,
    },
    /// Removed from the storage-proof index.
    StorageProof {
        id: TransactionId,
        height: BlockHeight,
        transaction: Transaction,
    },
}

impl RemovedTransaction {
    pub fn id(&self) -> TransactionId {
        match self {
            Self::Standard { id, .. } | Self::StorageProof { id, .. } => *id,
        }
    }

    pub fn transaction(&self) -> &Transaction {
        match self {
            Self::Standard { transaction, .. } | Self::StorageProof { transaction, .. } => {
                transaction
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_total() {
        let status = PoolStatus {
            standard_count: 3,
            proof_count: 2,
            ..Default::default()
        };
        assert_eq!(status.total(), 5);
    }

    #[test]
    fn test_removed_accessors() {
        let removed = RemovedTransaction::StorageProof {
            id: TransactionId([4; 32]),
            height: 12,
            transaction: Transaction::default(),
        };
        assert_eq!(removed.id(), TransactionId([4; 32]));
        assert_eq!(removed.transaction(), &Transaction::default());
    }
}
