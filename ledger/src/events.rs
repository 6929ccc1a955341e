//! Events emitted by the ballot ledger.

use serde::{Deserialize, Serialize};
use svrp_types::{Address, BatchId, BlockNumber, ProposalId, Stake};
use svrp_verification::FraudReason;

/// Ledger-level events, appended to the ledger's log and fanned out to
/// subscribers of the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// A proposal was opened.
    StartVote {
        proposal: ProposalId,
        snapshot_block: BlockNumber,
        voting_power: Stake,
    },
    /// The required support for new proposals changed.
    ChangeSupportRequired { pct: u128 },
    /// The minimum acceptance quorum for new proposals changed.
    ChangeMinQuorum { pct: u128 },
    /// A relayer submitted a batch. `proof` is the exact byte string
    /// challengers must replay.
    BatchSubmitted {
        proposal: ProposalId,
        batch: BatchId,
        yea: Stake,
        nay: Stake,
        proof: Vec<u8>,
    },
    /// A record of a batch was proven invalid (undecodable proof, bad
    /// signature, wrong scope, or a voter counted twice).
    InvalidVote {
        proposal: ProposalId,
        batch: BatchId,
        index: usize,
        reason: FraudReason,
        proof: Vec<u8>,
    },
    /// A record's stake differs from the voter's snapshot balance.
    InvalidVoteStake {
        proposal: ProposalId,
        batch: BatchId,
        index: usize,
        proof: Vec<u8>,
    },
    /// A batch's claimed totals are not the sum of its records.
    InvalidAggregation {
        proposal: ProposalId,
        batch: BatchId,
        proof: Vec<u8>,
    },
    /// One voter was counted in two batches; emitted once per batch.
    VoteDuplication {
        proposal: ProposalId,
        batch: BatchId,
        index: usize,
        proof: Vec<u8>,
    },
    /// A relayer bond paid out to a successful challenger.
    CollateralSlashed {
        relayer: Address,
        challenger: Address,
        amount: Stake,
    },
    /// A proposal passed and was executed.
    ExecuteVote { proposal: ProposalId },
}

/// Synchronous fan-out event bus for ledger events.
///
/// Listeners are invoked inline on the emitting thread; keep handlers fast to
/// avoid stalling challenge processing.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&LedgerEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &LedgerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
