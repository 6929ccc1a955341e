//! Where finished batches go.

use crate::RelayerError;
use serde::{Deserialize, Serialize};
use svrp_types::{BatchId, ProposalId, Stake, Timestamp};

/// What the relayer commits to for one batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSubmission {
    pub proposal_id: ProposalId,
    pub yea: Stake,
    pub nay: Stake,
    /// Canonical encoded proof. Challengers must replay these exact bytes.
    pub proof: Vec<u8>,
}

/// The ledger-facing side of the relayer.
pub trait BatchSink {
    /// Submit a batch, returning the id the ledger assigned to it.
    fn submit_batch(
        &mut self,
        submission: &BatchSubmission,
        now: Timestamp,
    ) -> Result<BatchId, RelayerError>;
}

/// Keeps submissions in memory and numbers them sequentially.
#[derive(Debug, Default)]
pub struct MemorySink {
    submissions: Vec<BatchSubmission>,
    reject: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse (or accept again) every following submission.
    pub fn set_rejecting(&mut self, reject: bool) {
        self.reject = reject;
    }

    pub fn submissions(&self) -> &[BatchSubmission] {
        &self.submissions
    }
}

impl BatchSink for MemorySink {
    fn submit_batch(
        &mut self,
        submission: &BatchSubmission,
        _now: Timestamp,
    ) -> Result<BatchId, RelayerError> {
        if self.reject {
            return Err(RelayerError::Sink("submission refused".into()));
        }
        let id = BatchId::new(self.submissions.len() as u32);
        self.submissions.push(submission.clone());
        Ok(id)
    }
}
