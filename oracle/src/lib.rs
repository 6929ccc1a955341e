//! Balance-oracle integration for the batch verifier.
//!
//! The verifier only needs one question answered: what was this holder's
//! balance at the proposal's snapshot block? [`BalanceOracle`] is that
//! question. Two answers ship here:
//!
//! - [`CheckpointBalances`]: a historical balance table (checkpoint per
//!   change, value at block `b` is the last checkpoint at or before `b`)
//! - [`EvidenceOracle`]: answers only from balance evidence that a
//!   [`StorageProofVerifier`] has accepted

pub mod checkpoint;
pub mod error;
pub mod evidence;

pub use checkpoint::CheckpointBalances;
pub use error::OracleError;
pub use evidence::{BalanceEvidence, EvidenceOracle, StorageProofVerifier};

use svrp_types::{Address, BlockNumber, Stake};

/// Trustless historical balance lookup.
pub trait BalanceOracle {
    /// The balance of `holder` at `block`.
    fn balance_at(&self, holder: &Address, block: BlockNumber) -> Result<Stake, OracleError>;
}

impl<T: BalanceOracle + ?Sized> BalanceOracle for &T {
    fn balance_at(&self, holder: &Address, block: BlockNumber) -> Result<Stake, OracleError> {
        (**self).balance_at(holder, block)
    }
}

impl<T: BalanceOracle + ?Sized> BalanceOracle for Box<T> {
    fn balance_at(&self, holder: &Address, block: BlockNumber) -> Result<Stake, OracleError> {
        (**self).balance_at(holder, block)
    }
}
