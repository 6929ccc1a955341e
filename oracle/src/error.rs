use svrp_types::{Address, BlockNumber};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("no verified balance evidence for {holder} at block {block}")]
    NoEvidence { holder: Address, block: BlockNumber },

    #[error("balance evidence for {holder} at block {block} failed verification")]
    InvalidEvidence { holder: Address, block: BlockNumber },

    #[error("checkpoint at block {block} precedes latest checkpoint at {latest}")]
    OutOfOrderCheckpoint { block: BlockNumber, latest: BlockNumber },

    #[error("insufficient balance: {holder} has {available}, needs {needed}")]
    InsufficientBalance {
        holder: Address,
        available: u128,
        needed: u128,
    },

    #[error("balance overflow for {0}")]
    Overflow(Address),
}
