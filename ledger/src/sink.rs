//! Relayer-facing adapter over a shared ledger.

use crate::BallotLedger;
use std::sync::{Arc, Mutex};
use svrp_relayer::{BatchSink, BatchSubmission, RelayerError};
use svrp_types::{Address, BatchId, Timestamp};

/// Submits relayer batches to a [`BallotLedger`] shared behind a mutex.
#[derive(Clone)]
pub struct LedgerSink {
    ledger: Arc<Mutex<BallotLedger>>,
    relayer: Address,
}

impl LedgerSink {
    /// Submit as `relayer`.
    pub fn new(ledger: Arc<Mutex<BallotLedger>>, relayer: Address) -> Self {
        Self { ledger, relayer }
    }

    pub fn ledger(&self) -> &Arc<Mutex<BallotLedger>> {
        &self.ledger
    }
}

impl BatchSink for LedgerSink {
    fn submit_batch(
        &mut self,
        submission: &BatchSubmission,
        now: Timestamp,
    ) -> Result<BatchId, RelayerError> {
        let mut ledger = self
            .ledger
            .lock()
            .map_err(|_| RelayerError::Sink("ledger lock poisoned".to_string()))?;
        ledger
            .submit_batch(
                self.relayer,
                submission.proposal_id,
                submission.yea,
                submission.nay,
                &submission.proof,
                now,
            )
            .map_err(|e| RelayerError::Sink(e.to_string()))
    }
}
