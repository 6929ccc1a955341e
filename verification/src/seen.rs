//! Cross-batch voter index.
//!
//! Duplicate detection must see every earlier batch of a proposal, not just
//! the proof under verification. [`SeenVoters`] remembers, per
//! `(proposal, identity)`, the batches an identity appeared in. Entries are
//! never evicted; a proposal's history is needed until it executes and is
//! cheap compared to the proofs themselves.

use std::collections::HashMap;
use svrp_types::{Address, BatchId, ProposalId};

/// Earlier votes the duplication check must take into account.
pub trait PriorVotes {
    /// The earliest still-valid earlier batch in which `identity` voted.
    fn prior_batch(&self, identity: &Address) -> Option<BatchId>;
}

/// No earlier batches exist.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPriorVotes;

impl PriorVotes for NoPriorVotes {
    fn prior_batch(&self, _identity: &Address) -> Option<BatchId> {
        None
    }
}

/// Identities seen per proposal, with the batches they appeared in.
#[derive(Clone, Debug, Default)]
pub struct SeenVoters {
    entries: HashMap<(ProposalId, Address), Vec<BatchId>>,
}

impl SeenVoters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `identity` voted in `batch` of `proposal`.
    ///
    /// Batches are recorded in submission order, so each list stays sorted.
    pub fn record(&mut self, proposal: ProposalId, identity: Address, batch: BatchId) {
        let batches = self.entries.entry((proposal, identity)).or_default();
        if batches.last() != Some(&batch) {
            batches.push(batch);
        }
    }

    /// Every batch of `proposal` in which `identity` voted.
    pub fn batches(&self, proposal: ProposalId, identity: &Address) -> &[BatchId] {
        self.entries
            .get(&(proposal, *identity))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct `(proposal, identity)` pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The view of prior votes for verifying `batch` of `proposal`.
    ///
    /// Only batches with a lower id for which `is_valid` holds count.
    pub fn before<F>(&self, proposal: ProposalId, batch: BatchId, is_valid: F) -> PriorView<'_, F>
    where
        F: Fn(BatchId) -> bool,
    {
        PriorView {
            seen: self,
            proposal,
            batch,
            is_valid,
        }
    }
}

/// [`PriorVotes`] restricted to the valid batches preceding one batch.
pub struct PriorView<'a, F> {
    seen: &'a SeenVoters,
    proposal: ProposalId,
    batch: BatchId,
    is_valid: F,
}

impl<F: Fn(BatchId) -> bool> PriorVotes for PriorView<'_, F> {
    fn prior_batch(&self, identity: &Address) -> Option<BatchId> {
        self.seen
            .batches(self.proposal, identity)
            .iter()
            .copied()
            .take_while(|b| *b < self.batch)
            .find(|b| (self.is_valid)(*b))
    }
}
