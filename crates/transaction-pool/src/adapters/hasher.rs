//! SHA-256 content identifier.
//!
//! Hashes every field in declaration order. Variable-length fields are
//! prefixed with their little-endian length so distinct transactions never
//! share an encoding.

use crate::domain::{Transaction, TransactionId};
use crate::ports::ContentHasher;
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256ContentHasher;

impl Sha256ContentHasher {
    fn update_bytes(hasher: &mut Sha256, bytes: &[u8]) {
        hasher.update((bytes.len() as u64).to_le_bytes());
        hasher.update(bytes);
    }

    fn update_len(hasher: &mut Sha256, len: usize) {
        hasher.update((len as u64).to_le_bytes());
    }
}

impl ContentHasher for Sha256ContentHasher {
    fn content_id(&self, transaction: &Transaction) -> TransactionId {
        let mut hasher = Sha256::new();

        Self::update_len(&mut hasher, transaction.inputs.len());
        for input in &transaction.inputs {
            hasher.update(input.output_id.as_bytes());
            Self::update_bytes(&mut hasher, &input.unlock_conditions);
        }

        Self::update_len(&mut hasher, transaction.outputs.len());
        for output in &transaction.outputs {
            hasher.update(output.value.to_le_bytes());
            hasher.update(output.spend_hash);
        }

        Self::update_len(&mut hasher, transaction.miner_fees.len());
        for fee in &transaction.miner_fees {
            hasher.update(fee.to_le_bytes());
        }

        Self::update_len(&mut hasher, transaction.storage_proofs.len());
        for proof in &transaction.storage_proofs {
            hasher.update(proof.contract_id.as_bytes());
            Self::update_bytes(&mut hasher, &proof.segment);
            Self::update_len(&mut hasher, proof.hash_set.len());
            for hash in &proof.hash_set {
                hasher.update(hash);
            }
        }

        Self::update_bytes(&mut hasher, &transaction.arbitrary_data);

        Self::update_len(&mut hasher, transaction.signatures.len());
        for signature in &transaction.signatures {
            Self::update_bytes(&mut hasher, signature);
        }

        TransactionId(hasher.finalize().into())
    }
}
