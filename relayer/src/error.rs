use svrp_codec::CodecError;
use svrp_types::{BallotId, ProposalId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayerError {
    #[error("vote is for ballot {actual}, relayer serves {expected}")]
    WrongBallot { expected: BallotId, actual: BallotId },

    #[error("tally overflow in proposal {0}")]
    TallyOverflow(ProposalId),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("batch sink rejected submission: {0}")]
    Sink(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("relayer task is no longer running")]
    Stopped,
}
