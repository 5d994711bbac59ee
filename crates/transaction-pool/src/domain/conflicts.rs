//! # Conflict Index
//!
//! Tracks which outputs pooled transactions claim.
//!
//! - `consumed`: outputs spent by a pooled transaction. An output id appears
//!   here at most once, which is the pool's no-double-spend guarantee.
//! - `produced`: outputs created by a pooled transaction and not yet
//!   confirmed. Later transactions may spend them, which creates a graph edge.
//!
//! The index performs no locking. Callers must run `claims` and
//! `record_consumption` inside the same critical section.

use super::entities::{OutputId, TransactionId};
use super::errors::ConflictError;
use std::collections::HashMap;

/// An unconfirmed output and the pooled transaction that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProducedOutput {
    /// The creating transaction.
    pub producer: TransactionId,
    /// Position of the output within the producer's outputs.
    pub index: usize,
}

#[derive(Debug, Default)]
pub struct ConflictIndex {
    consumed: HashMap<OutputId, TransactionId>,
    produced: HashMap<OutputId, ProducedOutput>,
}

impl ConflictIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if some pooled transaction already consumes this output.
    pub fn claims(&self, output_id: &OutputId) -> bool {
        self.consumed.contains_key(output_id)
    }

    /// Returns the pooled transaction consuming this output, if any.
    pub fn claimant(&self, output_id: &OutputId) -> Option<TransactionId> {
        self.consumed.get(output_id).copied()
    }

    /// Returns the pooled transaction that created this output, if any.
    pub fn producer(&self, output_id: &OutputId) -> Option<ProducedOutput> {
        self.produced.get(output_id).copied()
    }

    /// Registers `owner` as the consumer of `output_id`.
    ///
    /// # Errors
    /// `AlreadyClaimed` if another pooled transaction consumes it.
    pub fn record_consumption(
        &mut self,
        output_id: OutputId,
        owner: TransactionId,
    ) -> Result<(), ConflictError> {
        if let Some(claimed_by) = self.claimant(&output_id) {
            return Err(ConflictError::AlreadyClaimed {
                output_id,
                claimed_by,
            });
        }
        self.consumed.insert(output_id, owner);
        Ok(())
    }

    /// Registers a newly created, unconfirmed output.
    ///
    /// # Errors
    /// `AlreadyProduced` if a pooled transaction already created it.
    pub fn record_production(
        &mut self,
        output_id: OutputId,
        owner: TransactionId,
        index: usize,
    ) -> Result<(), ConflictError> {
        if let Some(existing) = self.producer(&output_id) {
            return Err(ConflictError::AlreadyProduced {
                output_id,
                produced_by: existing.producer,
            });
        }
        self.produced.insert(
            output_id,
            ProducedOutput {
                producer: owner,
                index,
            },
        );
        Ok(())
    }

    /// Drops the consumption claim on `output_id` if `owner` holds it.
    ///
    /// Returns true if a claim was removed.
    pub fn release_consumption(&mut self, output_id: &OutputId, owner: &TransactionId) -> bool {
        match self.consumed.get(output_id) {
            Some(claimant) if claimant == owner => {
                self.consumed.remove(output_id);
                true
            }
            _ => false,
        }
    }

    /// Drops the production claim on `output_id` if `owner` holds it.
    pub fn release_production(&mut self, output_id: &OutputId, owner: &TransactionId) -> bool {
        match self.produced.get(output_id) {
            Some(produced) if produced.producer == *owner => {
                self.produced.remove(output_id);
                true
            }
            _ => false,
        }
    }

    /// Number of consumed outputs.
    pub fn consumed_count(&self) -> usize {
        self.consumed.len()
    }

    /// Number of unconfirmed produced outputs.
    pub fn produced_count(&self) -> usize {
        self.produced.len()
    }

    /// All consumed outputs with their claimant.
    pub fn consumed(&self) -> impl Iterator<Item = (&OutputId, &TransactionId)> {
        self.consumed.iter()
    }
}
