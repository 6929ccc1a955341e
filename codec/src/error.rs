use svrp_crypto::CryptoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    /// The byte string is not a well-formed SVRP batch.
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    #[error("{field} does not fit in {width} bytes")]
    FieldOverflow { field: &'static str, width: usize },

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

impl CodecError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedProof(reason.into())
    }
}
