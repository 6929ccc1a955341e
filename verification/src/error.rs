use svrp_codec::CodecError;
use svrp_oracle::OracleError;
use thiserror::Error;

/// Failures that prevent a verdict from being reached at all.
///
/// Fraud is not an error; it is reported through [`crate::Verdict`].
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("balance oracle: {0}")]
    Oracle(#[from] OracleError),

    #[error("vote index {index} out of range for a proof of {len} records")]
    VoteIndexOutOfRange { index: usize, len: usize },

    #[error("proof does not decode: {0}")]
    Undecodable(#[from] CodecError),
}
