//! The relayer state machine.

use crate::accumulator::BatchAccumulator;
use crate::sink::{BatchSink, BatchSubmission};
use crate::{RelayerConfig, RelayerError};
use serde::{Deserialize, Serialize};
use svrp_codec::SignedVote;
use svrp_crypto::ballot_fingerprint;
use svrp_types::{Address, BallotId, BatchId, ProposalId, Stake, Timestamp};
use tracing::{debug, info, warn};

/// A batch the sink accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedBatch {
    pub batch_id: BatchId,
    pub yea: Stake,
    pub nay: Stake,
    pub votes: usize,
    pub submitted_at: Timestamp,
}

/// Snapshot of a relayer's progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayerStatus {
    pub proposal_id: ProposalId,
    pub pending_votes: usize,
    pub pending_yea: Stake,
    pub pending_nay: Stake,
    pub submitted_batches: usize,
}

/// Collects votes for one proposal and submits them in batches.
pub struct Relayer<S> {
    ballot_id: BallotId,
    address: Address,
    max_batch_size: usize,
    current: BatchAccumulator,
    history: Vec<SubmittedBatch>,
    sink: S,
}

impl<S: BatchSink> Relayer<S> {
    pub fn new(config: &RelayerConfig, sink: S) -> Self {
        Self {
            ballot_id: ballot_fingerprint(&config.ballot),
            address: config.relayer,
            max_batch_size: config.max_batch_size.max(1),
            current: BatchAccumulator::new(config.proposal_id),
            history: Vec::new(),
            sink,
        }
    }

    /// Accept a vote into the current batch.
    ///
    /// When the batch reaches the configured size it is submitted, and the
    /// assigned batch id is returned. If that submission fails the vote stays
    /// in the batch and the error is returned; the next vote or
    /// [`Self::submit_batch`] retries.
    pub fn vote(
        &mut self,
        vote: SignedVote,
        now: Timestamp,
    ) -> Result<Option<BatchId>, RelayerError> {
        if vote.record.ballot_id != self.ballot_id {
            return Err(RelayerError::WrongBallot {
                expected: self.ballot_id,
                actual: vote.record.ballot_id,
            });
        }

        let voter = vote.voter;
        self.current.push(vote)?;
        debug!(
            proposal = %self.current.proposal_id(),
            %voter,
            pending = self.current.len(),
            "vote accepted"
        );

        if self.current.len() >= self.max_batch_size {
            return self.submit_batch(now);
        }
        Ok(None)
    }

    /// Submit the current batch.
    ///
    /// Does nothing and returns `Ok(None)` when the batch is empty. On success
    /// a fresh batch is opened; on failure the current batch is kept intact.
    pub fn submit_batch(&mut self, now: Timestamp) -> Result<Option<BatchId>, RelayerError> {
        if self.current.is_empty() {
            return Ok(None);
        }

        let submission = BatchSubmission {
            proposal_id: self.current.proposal_id(),
            yea: self.current.yea(),
            nay: self.current.nay(),
            proof: self.current.proof()?,
        };

        let batch_id = match self.sink.submit_batch(&submission, now) {
            Ok(id) => id,
            Err(e) => {
                warn!(
                    proposal = %submission.proposal_id,
                    votes = self.current.len(),
                    error = %e,
                    "batch submission failed"
                );
                return Err(e);
            }
        };

        info!(
            proposal = %submission.proposal_id,
            batch = %batch_id,
            yea = %submission.yea,
            nay = %submission.nay,
            votes = self.current.len(),
            "batch submitted"
        );
        self.history.push(SubmittedBatch {
            batch_id,
            yea: submission.yea,
            nay: submission.nay,
            votes: self.current.len(),
            submitted_at: now,
        });
        self.current = BatchAccumulator::new(submission.proposal_id);
        Ok(Some(batch_id))
    }

    pub fn status(&self) -> RelayerStatus {
        RelayerStatus {
            proposal_id: self.current.proposal_id(),
            pending_votes: self.current.len(),
            pending_yea: self.current.yea(),
            pending_nay: self.current.nay(),
            submitted_batches: self.history.len(),
        }
    }

    /// Batches submitted so far, oldest first.
    pub fn history(&self) -> &[SubmittedBatch] {
        &self.history
    }

    pub fn current(&self) -> &BatchAccumulator {
        &self.current
    }

    /// The address this relayer submits from.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn ballot_id(&self) -> BallotId {
        self.ballot_id
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
