use svrp_types::{Address, BatchId, ProposalId};
use svrp_verification::VerificationError;
use thiserror::Error;

/// Reasons a ledger call leaves state untouched.
///
/// Challenge rejections are reported here; successful challenges return the
/// detected fraud instead.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("no proposal ids left")]
    ProposalLimit,

    #[error("batch {batch} of proposal {proposal} not found")]
    BatchNotFound { proposal: ProposalId, batch: BatchId },

    #[error("proposal {0} is already executed")]
    ProposalExecuted(ProposalId),

    #[error("proposal {0} is closed for new batches")]
    ProposalClosed(ProposalId),

    #[error("batch {batch} of proposal {proposal} is already invalid")]
    BatchAlreadyInvalid { proposal: ProposalId, batch: BatchId },

    #[error("batch {batch} of proposal {proposal} is out of its challenge period")]
    OutOfChallengePeriod { proposal: ProposalId, batch: BatchId },

    #[error("proof does not match the one submitted for batch {batch} of proposal {proposal}")]
    ProofMismatch { proposal: ProposalId, batch: BatchId },

    #[error("a duplication challenge needs two different batches")]
    SameBatch,

    #[error("challenge rejected: batch {batch} of proposal {proposal} is valid")]
    ChallengeRejected { proposal: ProposalId, batch: BatchId },

    #[error("balance evidence rejected: {0}")]
    InvalidBalanceEvidence(String),

    #[error("{0} is not the relayer")]
    NotRelayer(Address),

    #[error("tally overflow in proposal {0}")]
    TallyOverflow(ProposalId),

    #[error("invalid thresholds: support {support}, quorum {quorum}")]
    InvalidThresholds { support: u128, quorum: u128 },

    #[error("proposal {proposal} cannot be executed: {reason}")]
    NotExecutable {
        proposal: ProposalId,
        reason: &'static str,
    },

    #[error("insufficient collateral: {holder} has {available}, needs {needed}")]
    InsufficientCollateral {
        holder: Address,
        available: u128,
        needed: u128,
    },

    #[error("verification error: {0}")]
    Verification(#[from] VerificationError),

    #[error("config error: {0}")]
    Config(String),
}

impl LedgerError {
    /// Stable reason code, as reported to callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProposalNotFound(_) => "PROPOSAL_NOT_FOUND",
            Self::ProposalLimit => "PROPOSAL_LIMIT",
            Self::BatchNotFound { .. } => "BATCH_NOT_FOUND",
            Self::ProposalExecuted(_) => "PROPOSAL_EXECUTED",
            Self::ProposalClosed(_) => "PROPOSAL_CLOSED",
            Self::BatchAlreadyInvalid { .. } => "BATCH_ALREADY_INVALID",
            Self::OutOfChallengePeriod { .. } => "OUT_OF_CHALLENGE_PERIOD",
            Self::ProofMismatch { .. } => "PROOF_MISMATCH",
            Self::SameBatch => "SAME_BATCH",
            Self::ChallengeRejected { .. } => "CHALLENGE_REJECTED",
            Self::InvalidBalanceEvidence(_) => "INVALID_BALANCE_EVIDENCE",
            Self::NotRelayer(_) => "NOT_RELAYER",
            Self::TallyOverflow(_) => "TALLY_OVERFLOW",
            Self::InvalidThresholds { .. } => "INVALID_THRESHOLDS",
            Self::NotExecutable { .. } => "NOT_EXECUTABLE",
            Self::InsufficientCollateral { .. } => "INSUFFICIENT_COLLATERAL",
            Self::Verification(VerificationError::VoteIndexOutOfRange { .. }) => {
                "VOTE_INDEX_OUT_OF_RANGE"
            }
            // An earlier proof that does not decode proves no duplication.
            Self::Verification(VerificationError::Undecodable(_)) => "CHALLENGE_REJECTED",
            Self::Verification(VerificationError::Oracle(_)) => "ORACLE_UNAVAILABLE",
            Self::Config(_) => "CONFIG",
        }
    }
}
