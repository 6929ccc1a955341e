//! Nullable balance oracle.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use svrp_oracle::{BalanceOracle, OracleError};
use svrp_types::{Address, BlockNumber, Stake};

/// A balance oracle with fixed answers.
///
/// Balances are the same at every block. Holders without a configured
/// balance read as zero, unless the oracle is failing, in which case every
/// query errors.
#[derive(Debug, Default)]
pub struct NullBalanceOracle {
    balances: HashMap<Address, Stake>,
    failing: bool,
    queries: AtomicUsize,
}

impl NullBalanceOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(mut self, holder: Address, balance: Stake) -> Self {
        self.balances.insert(holder, balance);
        self
    }

    /// An oracle that cannot answer anything.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Number of balance queries answered or refused so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

impl BalanceOracle for NullBalanceOracle {
    fn balance_at(&self, holder: &Address, block: BlockNumber) -> Result<Stake, OracleError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        if self.failing {
            return Err(OracleError::NoEvidence {
                holder: *holder,
                block,
            });
        }
        Ok(self.balances.get(holder).copied().unwrap_or(Stake::ZERO))
    }
}
