//! Proposals and the batches submitted to them.

use serde::{Deserialize, Serialize};
use svrp_types::{Address, BatchId, BlockNumber, Hash256, ProposalId, Stake, Timestamp};

/// A relayer-submitted aggregation of votes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    /// Starts true; flips to false only on a successful challenge.
    pub valid: bool,
    pub yea: Stake,
    pub nay: Stake,
    /// Keccak-256 of the encoded proof. Challengers must replay bytes that
    /// hash to this.
    pub proof_hash: Hash256,
    pub submitted_at: Timestamp,
    pub relayer: Address,
}

impl Batch {
    /// Whether `now` is still inside the batch's challenge window.
    pub fn is_challengeable(&self, window_secs: u64, now: Timestamp) -> bool {
        !self.submitted_at.has_expired(window_secs, now)
    }
}

/// One voting round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    /// Balances are read at this block.
    pub snapshot_block: BlockNumber,
    pub start_date: Timestamp,
    pub support_required_pct: u128,
    pub min_accept_quorum_pct: u128,
    /// Total supply at the snapshot block.
    pub voting_power: Stake,
    /// Sum of claimed yea over still-valid batches.
    pub yea: Stake,
    /// Sum of claimed nay over still-valid batches.
    pub nay: Stake,
    pub executed: bool,
    pub batches: Vec<Batch>,
}

impl Proposal {
    /// Whether the proposal still accepts batches.
    pub fn is_open(&self, vote_time_secs: u64, now: Timestamp) -> bool {
        !self.executed && !self.start_date.has_expired(vote_time_secs, now)
    }

    pub fn batch(&self, id: BatchId) -> Option<&Batch> {
        self.batches.get(id.as_index())
    }

    pub fn batch_mut(&mut self, id: BatchId) -> Option<&mut Batch> {
        self.batches.get_mut(id.as_index())
    }

    pub fn next_batch_id(&self) -> BatchId {
        BatchId::new(self.batches.len() as u32)
    }

    /// Whether `batch` exists and has not been invalidated.
    pub fn is_batch_valid(&self, batch: BatchId) -> bool {
        self.batch(batch).is_some_and(|b| b.valid)
    }
}
