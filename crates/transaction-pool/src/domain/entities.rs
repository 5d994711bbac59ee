//! Core domain entities for the transaction pool.
//!
//! A [`Transaction`] spends [`Input`]s (references to outputs created by
//! earlier transactions), creates new [`Output`]s, and may carry
//! [`StorageProof`]s that fulfil a [`FileContract`] already on chain.
//!
//! ## Identifiers
//!
//! | Type | Derivation |
//! |------|------------|
//! | `TransactionId` | Content identifier from a `ContentHasher` port |
//! | `OutputId` | `OutputId::derive(transaction_id, index)` |
//! | `ContractId` | Assigned by the chain when the contract forms |

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 32-byte hash.
pub type Hash = [u8; 32];

/// Height of a block in the chain (0 = genesis).
pub type BlockHeight = u64;

/// Tag mixed into output id derivation so output ids never collide with
/// transaction ids.
const OUTPUT_ID_TAG: &[u8] = b"txpool/output";

macro_rules! hash_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
        )]
        pub struct $name(pub Hash);

        impl $name {
            /// Returns the raw bytes.
            pub fn as_bytes(&self) -> &Hash {
                &self.0
            }
        }

        impl From<Hash> for $name {
            fn from(bytes: Hash) -> Self {
                Self(bytes)
            }
        }

        // Four bytes are enough to tell ids apart in logs.
        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(", stringify!($name))?;
                for byte in &self.0[..4] {
                    write!(f, "{:02x}", byte)?;
                }
                write!(f, "..)")
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for byte in &self.0 {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }
    };
}

hash_id!(
    /// Content identifier of a whole transaction.
    TransactionId
);

hash_id!(
    /// Identifier of a single spendable output.
    OutputId
);

hash_id!(
    /// Identifier of an on-chain file contract.
    ContractId
);

impl OutputId {
    /// Derives the id of the `index`-th output created by `transaction_id`.
    pub fn derive(transaction_id: &TransactionId, index: usize) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(transaction_id.as_bytes());
        hasher.update(OUTPUT_ID_TAG);
        hasher.update((index as u64).to_le_bytes());
        Self(hasher.finalize().into())
    }
}

/// A reference to an output being consumed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    /// The output this input spends.
    pub output_id: OutputId,
    /// Opaque unlock conditions, checked by the validator.
    pub unlock_conditions: Vec<u8>,
}

impl Input {
    pub fn new(output_id: OutputId) -> Self {
        Self {
            output_id,
            unlock_conditions: Vec::new(),
        }
    }
}

/// A spendable unit created by a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Amount in base units.
    pub value: u64,
    /// Hash of the conditions required to spend this output.
    pub spend_hash: Hash,
}

/// Proof that a host still stores the data a file contract covers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageProof {
    /// The contract being fulfilled.
    pub contract_id: ContractId,
    /// The proven data segment.
    pub segment: Vec<u8>,
    /// Merkle path from the segment to the contract's file root.
    pub hash_set: Vec<Hash>,
}

/// A file contract as recorded on chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContract {
    /// Merkle root of the covered file.
    pub file_merkle_root: Hash,
    /// Size of the covered file in bytes.
    pub file_size: u64,
    /// Height at which the contract became active.
    pub start: BlockHeight,
    /// Height after which proofs are no longer accepted.
    pub end: BlockHeight,
    /// Value paid out on a valid proof.
    pub payout: u64,
}

impl FileContract {
    /// Height at which the contract became active.
    pub fn start_height(&self) -> BlockHeight {
        self.start
    }
}

/// A candidate transaction as received from the network.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub inputs: Vec<Input>,
    pub outputs: Vec<Output>,
    pub miner_fees: Vec<u64>,
    pub storage_proofs: Vec<StorageProof>,
    pub arbitrary_data: Vec<u8>,
    pub signatures: Vec<Vec<u8>>,
}

impl Transaction {
    /// Returns true if the transaction carries at least one storage proof.
    ///
    /// Such transactions are routed to the storage-proof index and never
    /// touch the conflict index or the dependency graph.
    pub fn has_storage_proofs(&self) -> bool {
        !self.storage_proofs.is_empty()
    }

    /// Ids of the outputs this transaction consumes, in input order.
    pub fn consumed_output_ids(&self) -> impl Iterator<Item = OutputId> + '_ {
        self.inputs.iter().map(|input| input.output_id)
    }

    /// Ids of the outputs this transaction creates, given its content id.
    pub fn produced_output_ids(
        &self,
        id: &TransactionId,
    ) -> impl Iterator<Item = (usize, OutputId)> + '_ {
        let id = *id;
        (0..self.outputs.len()).map(move |index| (index, OutputId::derive(&id, index)))
    }
}
