//! Collateral custody for relayer bonds and challenger payouts.

use crate::LedgerError;
use std::collections::HashMap;
use svrp_types::{Address, Stake};

/// Holds collateral balances and moves them on slashing.
pub trait CollateralVault {
    fn balance_of(&self, holder: &Address) -> Stake;

    fn deposit(&mut self, holder: Address, amount: Stake) -> Result<(), LedgerError>;

    /// Move `amount` from `from` to `to`. Either the whole amount moves or
    /// nothing does.
    fn transfer(&mut self, from: Address, to: Address, amount: Stake) -> Result<(), LedgerError>;
}

/// In-memory [`CollateralVault`].
#[derive(Clone, Debug, Default)]
pub struct InMemoryVault {
    balances: HashMap<Address, Stake>,
}

impl InMemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// A vault holding `amount` for `holder`.
    pub fn with_balance(holder: Address, amount: Stake) -> Self {
        let mut vault = Self::new();
        vault.balances.insert(holder, amount);
        vault
    }
}

impl CollateralVault for InMemoryVault {
    fn balance_of(&self, holder: &Address) -> Stake {
        self.balances.get(holder).copied().unwrap_or(Stake::ZERO)
    }

    fn deposit(&mut self, holder: Address, amount: Stake) -> Result<(), LedgerError> {
        let balance = self.balance_of(&holder);
        let updated = balance
            .checked_add(amount)
            .ok_or(LedgerError::InsufficientCollateral {
                holder,
                available: balance.raw(),
                needed: amount.raw(),
            })?;
        self.balances.insert(holder, updated);
        Ok(())
    }

    fn transfer(&mut self, from: Address, to: Address, amount: Stake) -> Result<(), LedgerError> {
        let available = self.balance_of(&from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientCollateral {
                holder: from,
                available: available.raw(),
                needed: amount.raw(),
            })?;
        if from == to {
            return Ok(());
        }
        self.deposit(to, amount)?;
        self.balances.insert(from, remaining);
        Ok(())
    }
}
