//! Checkpointed historical balances.
//!
//! Every balance change appends a `(block, value)` checkpoint. Reading a
//! balance at block `b` returns the value of the last checkpoint at or before
//! `b`, so later transfers never change what a snapshot sees.

use crate::{BalanceOracle, OracleError};
use std::collections::HashMap;
use svrp_types::{Address, BlockNumber, Stake};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Checkpoint {
    from_block: BlockNumber,
    value: Stake,
}

/// A history of values, one checkpoint per block at which the value changed.
#[derive(Clone, Debug, Default)]
struct History(Vec<Checkpoint>);

impl History {
    fn value_at(&self, block: BlockNumber) -> Stake {
        // Checkpoints are sorted by block; find the last one <= block.
        let idx = self.0.partition_point(|c| c.from_block <= block);
        match idx {
            0 => Stake::ZERO,
            i => self.0[i - 1].value,
        }
    }

    fn latest(&self) -> Stake {
        self.0.last().map(|c| c.value).unwrap_or(Stake::ZERO)
    }

    fn update(&mut self, block: BlockNumber, value: Stake) -> Result<(), OracleError> {
        match self.0.last_mut() {
            Some(last) if last.from_block == block => {
                last.value = value;
                Ok(())
            }
            Some(last) if last.from_block > block => Err(OracleError::OutOfOrderCheckpoint {
                block,
                latest: last.from_block,
            }),
            _ => {
                self.0.push(Checkpoint {
                    from_block: block,
                    value,
                });
                Ok(())
            }
        }
    }
}

/// In-memory historical balance table with a tracked total supply.
#[derive(Clone, Debug, Default)]
pub struct CheckpointBalances {
    balances: HashMap<Address, History>,
    total_supply: History,
}

impl CheckpointBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `amount` new tokens for `holder` at `block`.
    pub fn mint(
        &mut self,
        holder: Address,
        amount: Stake,
        block: BlockNumber,
    ) -> Result<(), OracleError> {
        let supply = self
            .total_supply
            .latest()
            .checked_add(amount)
            .ok_or(OracleError::Overflow(holder))?;
        let history = self.balances.entry(holder).or_default();
        let balance = history
            .latest()
            .checked_add(amount)
            .ok_or(OracleError::Overflow(holder))?;
        history.update(block, balance)?;
        self.total_supply.update(block, supply)
    }

    /// Move `amount` from `from` to `to` at `block`.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: Stake,
        block: BlockNumber,
    ) -> Result<(), OracleError> {
        let available = self.latest_balance(&from);
        let remaining =
            available
                .checked_sub(amount)
                .ok_or(OracleError::InsufficientBalance {
                    holder: from,
                    available: available.raw(),
                    needed: amount.raw(),
                })?;
        let credited = self
            .latest_balance(&to)
            .checked_add(amount)
            .ok_or(OracleError::Overflow(to))?;

        self.balances.entry(from).or_default().update(block, remaining)?;
        self.balances.entry(to).or_default().update(block, credited)?;
        tracing::trace!(%from, %to, %amount, %block, "balance transfer recorded");
        Ok(())
    }

    /// The most recent balance of `holder`.
    pub fn latest_balance(&self, holder: &Address) -> Stake {
        self.balances
            .get(holder)
            .map(History::latest)
            .unwrap_or(Stake::ZERO)
    }

    /// Total supply at `block`, the voting power of a proposal snapshotted there.
    pub fn total_supply_at(&self, block: BlockNumber) -> Stake {
        self.total_supply.value_at(block)
    }
}

impl BalanceOracle for CheckpointBalances {
    fn balance_at(&self, holder: &Address, block: BlockNumber) -> Result<Stake, OracleError> {
        Ok(self
            .balances
            .get(holder)
            .map(|h| h.value_at(block))
            .unwrap_or(Stake::ZERO))
    }
}
