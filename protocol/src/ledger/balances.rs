//! # In-Memory Balance Ledger
//!
//! [`BalanceLedger`] is the default [`LedgerCore`]: balances, total supply
//! and allowances held in hash maps. Every operation checks before it
//! mutates, so a returned error always means nothing changed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{Amount, LedgerCore, LedgerError};
use crate::config::UNLIMITED_ALLOWANCE;
use crate::principal::Principal;

/// Balances, total supply and spending allowances for a single asset.
///
/// Zero balances and zero allowances are not stored; a missing entry
/// reads as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceLedger {
    /// Per-account balances.
    balances: HashMap<Principal, Amount>,
    /// `owner -> (spender -> remaining allowance)`.
    allowances: HashMap<Principal, HashMap<Principal, Amount>>,
    /// Sum of all balances.
    total_supply: Amount,
}

impl BalanceLedger {
    /// Creates an empty ledger with zero supply.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of accounts holding a non-zero balance.
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    fn put_balance(&mut self, account: &Principal, amount: Amount) {
        if amount == 0 {
            self.balances.remove(account);
        } else {
            self.balances.insert(*account, amount);
        }
    }
}

impl LedgerCore for BalanceLedger {
    fn credit_supply(&mut self, to: &Principal, amount: Amount) -> Result<(), LedgerError> {
        let total = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow {
                total: self.total_supply,
                credit: amount,
            })?;
        let current = self.balance_of(to);
        let balance = current
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow {
                account: *to,
                current,
                credit: amount,
            })?;

        self.total_supply = total;
        self.put_balance(to, balance);
        trace!(%to, amount, total_supply = total, "supply credited");
        Ok(())
    }

    fn debit_supply(&mut self, from: &Principal, amount: Amount) -> Result<(), LedgerError> {
        let current = self.balance_of(from);
        if current < amount {
            return Err(LedgerError::InsufficientBalance {
                account: *from,
                available: current,
                requested: amount,
            });
        }

        // Balances never exceed total supply, so this cannot underflow.
        self.total_supply -= amount;
        self.put_balance(from, current - amount);
        trace!(%from, amount, total_supply = self.total_supply, "supply debited");
        Ok(())
    }

    fn move_balance(
        &mut self,
        from: &Principal,
        to: &Principal,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                account: *from,
                available: from_balance,
                requested: amount,
            });
        }
        if from == to {
            return Ok(());
        }

        let to_balance = self.balance_of(to);
        let credited = to_balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow {
                account: *to,
                current: to_balance,
                credit: amount,
            })?;

        self.put_balance(from, from_balance - amount);
        self.put_balance(to, credited);
        trace!(%from, %to, amount, "balance moved");
        Ok(())
    }

    fn balance_of(&self, account: &Principal) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn allowance(&self, owner: &Principal, spender: &Principal) -> Amount {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    fn set_allowance(&mut self, owner: &Principal, spender: &Principal, amount: Amount) {
        if amount == 0 {
            if let Some(spenders) = self.allowances.get_mut(owner) {
                spenders.remove(spender);
                if spenders.is_empty() {
                    self.allowances.remove(owner);
                }
            }
            return;
        }
        self.allowances
            .entry(*owner)
            .or_default()
            .insert(*spender, amount);
    }

    fn spend_allowance(
        &mut self,
        owner: &Principal,
        spender: &Principal,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let current = self.allowance(owner, spender);
        if current == UNLIMITED_ALLOWANCE {
            return Ok(());
        }
        if current < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner: *owner,
                spender: *spender,
                available: current,
                requested: amount,
            });
        }
        self.set_allowance(owner, spender, current - amount);
        Ok(())
    }
}
