//! # Ledger Module: Balance Accounting
//!
//! The ledger is where balances live. Compliance policy never touches a
//! balance directly; it decides *whether* an operation may proceed and
//! then hands the arithmetic to a [`LedgerCore`].
//!
//! ```text
//! mod.rs       - LedgerCore trait, Amount, LedgerError
//! balances.rs  - BalanceLedger: in-memory balances, supply, allowances
//! ```
//!
//! ## Contract
//!
//! Every mutating method either applies completely or returns an error
//! and leaves the ledger untouched. Callers rely on this to keep their
//! own operations atomic: check everything that can fail, then mutate.

pub mod balances;

pub use balances::BalanceLedger;

use thiserror::Error;

use crate::principal::Principal;

/// Token amount in the smallest unit.
pub type Amount = u128;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised by balance accounting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Attempted to debit more than the account holds.
    #[error("insufficient balance for {account}: available {available}, requested {requested}")]
    InsufficientBalance {
        /// The account being debited.
        account: Principal,
        /// The current balance.
        available: Amount,
        /// The amount that was requested.
        requested: Amount,
    },

    /// Attempted to spend more than the owner approved.
    #[error(
        "insufficient allowance: {spender} may spend {available} of {owner}'s balance, requested {requested}"
    )]
    InsufficientAllowance {
        /// The account whose funds are being spent.
        owner: Principal,
        /// The account doing the spending.
        spender: Principal,
        /// The remaining allowance.
        available: Amount,
        /// The amount that was requested.
        requested: Amount,
    },

    /// Decreasing an allowance below zero.
    #[error("allowance underflow: current {current}, decrease {decrease}")]
    AllowanceUnderflow {
        /// The current allowance.
        current: Amount,
        /// The requested decrease.
        decrease: Amount,
    },

    /// Increasing an allowance past `Amount::MAX`.
    #[error("allowance overflow: current {current}, increase {increase}")]
    AllowanceOverflow {
        /// The current allowance.
        current: Amount,
        /// The requested increase.
        increase: Amount,
    },

    /// Crediting would push total supply past `Amount::MAX`.
    #[error("supply overflow: total {total}, credit {credit}")]
    SupplyOverflow {
        /// Total supply before the failed credit.
        total: Amount,
        /// The amount that caused the overflow.
        credit: Amount,
    },

    /// Crediting would push a single balance past `Amount::MAX`.
    #[error("balance overflow for {account}: current {current}, credit {credit}")]
    BalanceOverflow {
        /// The account being credited.
        account: Principal,
        /// Balance before the failed credit.
        current: Amount,
        /// The amount that caused the overflow.
        credit: Amount,
    },
}

// ---------------------------------------------------------------------------
// LedgerCore
// ---------------------------------------------------------------------------

/// The accounting entry points a gated ledger delegates to.
///
/// Implementations hold balances, total supply and spending allowances.
/// They perform no policy checks of their own beyond arithmetic
/// soundness; principal validation and compliance gating happen before
/// any of these methods are called.
pub trait LedgerCore {
    /// Creates `amount` new units in `to`'s balance.
    fn credit_supply(&mut self, to: &Principal, amount: Amount) -> Result<(), LedgerError>;

    /// Destroys `amount` units from `from`'s balance.
    fn debit_supply(&mut self, from: &Principal, amount: Amount) -> Result<(), LedgerError>;

    /// Moves `amount` units from `from` to `to`. Total supply is unchanged.
    fn move_balance(
        &mut self,
        from: &Principal,
        to: &Principal,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    /// Returns the balance held by `account`.
    fn balance_of(&self, account: &Principal) -> Amount;

    /// Returns the total number of units in existence.
    fn total_supply(&self) -> Amount;

    /// Returns how much `spender` may still move out of `owner`'s balance.
    fn allowance(&self, owner: &Principal, spender: &Principal) -> Amount;

    /// Overwrites the allowance `owner` grants `spender`.
    fn set_allowance(&mut self, owner: &Principal, spender: &Principal, amount: Amount);

    /// Consumes `amount` of the allowance `owner` grants `spender`.
    fn spend_allowance(
        &mut self,
        owner: &Principal,
        spender: &Principal,
        amount: Amount,
    ) -> Result<(), LedgerError>;
}
