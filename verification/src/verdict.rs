//! Verdicts and fraud reason codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of fraud a proof exhibits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FraudReason {
    /// The proof bytes do not decode.
    MalformedProof,
    /// A record's signer cannot be recovered, or recovers to the zero address.
    InvalidVote,
    /// A record belongs to another ballot.
    ForeignBallotVote,
    /// A record belongs to another proposal of this ballot.
    CrossProposalVote,
    /// A voter appears twice, in this proof or in an earlier valid batch.
    DuplicateVote,
    /// A record's stake differs from the voter's balance at the snapshot block.
    InvalidStake,
    /// Every record is sound but the claimed totals are not their sum.
    AggregationMismatch,
}

impl FraudReason {
    /// Stable reason code, as reported to challengers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedProof => "MALFORMED_PROOF",
            Self::InvalidVote => "INVALID_VOTE",
            Self::ForeignBallotVote => "FOREIGN_BALLOT_VOTE",
            Self::CrossProposalVote => "CROSS_PROPOSAL_VOTE",
            Self::DuplicateVote => "DUPLICATE_VOTE",
            Self::InvalidStake => "INVALID_STAKE",
            Self::AggregationMismatch => "AGGREGATION_MISMATCH",
        }
    }
}

impl fmt::Display for FraudReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A detected fraud and the record that exhibits it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fraud {
    pub reason: FraudReason,
    /// Offending record index; `None` for aggregation mismatches.
    pub index: Option<usize>,
}

impl Fraud {
    pub fn at(reason: FraudReason, index: usize) -> Self {
        Self {
            reason,
            index: Some(index),
        }
    }

    pub fn systemic(reason: FraudReason) -> Self {
        Self {
            reason,
            index: None,
        }
    }
}

impl fmt::Display for Fraud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "{} at index {}", self.reason, i),
            None => write!(f, "{}", self.reason),
        }
    }
}

/// Outcome of verifying a batch, a single record, or a pair of records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Valid,
    Invalid(Fraud),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn fraud(&self) -> Option<&Fraud> {
        match self {
            Self::Valid => None,
            Self::Invalid(fraud) => Some(fraud),
        }
    }

    pub fn reason(&self) -> Option<FraudReason> {
        self.fraud().map(|f| f.reason)
    }
}

impl From<Fraud> for Verdict {
    fn from(fraud: Fraud) -> Self {
        Self::Invalid(fraud)
    }
}
