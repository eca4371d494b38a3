//! # Gated Token
//!
//! [`GatedToken`] composes the feature flags, membership lists, pause
//! switch and ownership in front of a [`LedgerCore`]. Every public
//! mutating method follows the same shape:
//!
//! ```text
//! capability flag -> owner -> not paused -> principals -> membership -> ledger -> event
//! ```
//!
//! Any guard that fails returns before the first write. The ledger itself
//! is all-or-nothing, and allowance consumption is checked up front, so a
//! failed call leaves balances, allowances and the event log untouched.
//!
//! ## Security Model
//!
//! - **Capabilities are frozen**: the six flags and decimals are fixed at
//!   deployment. Nothing on this type can change them.
//! - **Owner-gated administration**: mint, burn, pause, list management
//!   and ownership changes all require the current owner. After
//!   renouncement they are unreachable for everyone.
//! - **Force transfer**: when enabled, the owner's `transfer_from` skips
//!   the allowance check. Membership checks still apply.

use bastion_protocol::config::scale_amount;
use bastion_protocol::principal::ensure_not_null;
use bastion_protocol::{Amount, BalanceLedger, LedgerCore, LedgerError, Principal};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::TokenError;
use crate::events::{EventLog, EventRecord, TokenEvent};
use crate::features::{FeatureConfig, FeatureFlags};
use crate::gate::TransferGate;
use crate::membership::MembershipStore;
use crate::ownership::OwnershipState;
use crate::pause::PauseState;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Construction-time parameters of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Display name (e.g., "Treasury Bond Token").
    pub name: String,
    /// Ticker symbol (e.g., "TBT").
    pub symbol: String,
    /// Supply credited to `owner` at deployment, in whole units. Scaled
    /// by `10^decimals` before it reaches the ledger.
    #[serde(default)]
    pub initial_supply: Amount,
    /// Decimal places, `0..=18`.
    pub decimals: u8,
    /// The principal that controls the token once deployment completes.
    pub owner: Principal,
    /// Capability switches.
    #[serde(default)]
    pub features: FeatureFlags,
}

/// Read-only summary of a deployed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Unique identifier assigned at deployment.
    pub deployment_id: Uuid,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub features: FeatureFlags,
    pub total_supply: Amount,
    pub paused: bool,
    /// `None` once ownership has been renounced.
    pub owner: Option<Principal>,
    pub denied_count: usize,
    pub allowed_count: usize,
    pub event_count: usize,
    pub deployed_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// GatedToken
// ---------------------------------------------------------------------------

/// A fungible token with compliance gating and administrative controls.
///
/// All state is owned by this struct and reachable only through the
/// guarded operations below. Concurrent callers must be serialized by
/// whoever holds the token (the node wraps it in a mutex).
#[derive(Debug, Clone)]
pub struct GatedToken<L: LedgerCore = BalanceLedger> {
    deployment_id: Uuid,
    name: String,
    symbol: String,
    deployed_at: DateTime<Utc>,
    features: FeatureConfig,
    membership: MembershipStore,
    pause: PauseState,
    ownership: OwnershipState,
    ledger: L,
    events: EventLog,
}

impl GatedToken<BalanceLedger> {
    /// Deploys a token backed by a fresh in-memory [`BalanceLedger`].
    pub fn deploy(config: TokenConfig, deployer: Principal) -> Result<Self, TokenError> {
        Self::deploy_with_ledger(config, deployer, BalanceLedger::new())
    }
}

impl<L: LedgerCore> GatedToken<L> {
    /// Deploys a token on top of `ledger`.
    ///
    /// `deployer` is the initial owner. The scaled initial supply is
    /// credited to `config.owner` directly, without consulting the
    /// transfer gate. If `config.owner` differs from `deployer`, control
    /// is handed over before this returns.
    ///
    /// # Errors
    ///
    /// - [`TokenError::InvalidDecimals`] if `decimals > 18`.
    /// - A null-principal error if `deployer` or `config.owner` is null.
    /// - [`TokenError::InitialSupplyOverflow`] if the scaled supply does
    ///   not fit in an [`Amount`].
    pub fn deploy_with_ledger(
        config: TokenConfig,
        deployer: Principal,
        mut ledger: L,
    ) -> Result<Self, TokenError> {
        let features = FeatureConfig::new(config.features, config.decimals)?;
        ensure_not_null(&config.owner)?;
        let ownership = OwnershipState::new(deployer)?;

        let mut events = EventLog::new();
        events.record(TokenEvent::OwnershipTransferred {
            previous_owner: None,
            new_owner: Some(deployer),
        });

        if config.initial_supply != 0 {
            let scaled = scale_amount(config.initial_supply, config.decimals).ok_or(
                TokenError::InitialSupplyOverflow {
                    initial_supply: config.initial_supply,
                    decimals: config.decimals,
                },
            )?;
            ledger.credit_supply(&config.owner, scaled)?;
            events.record(TokenEvent::Transfer {
                from: None,
                to: Some(config.owner),
                amount: scaled,
            });
        }

        let mut token = Self {
            deployment_id: Uuid::new_v4(),
            name: config.name,
            symbol: config.symbol,
            deployed_at: Utc::now(),
            membership: MembershipStore::new(),
            features,
            pause: PauseState::new(),
            ownership,
            ledger,
            events,
        };

        if config.owner != deployer {
            let event = token.ownership.transfer(config.owner)?;
            token.emit(event);
        }

        info!(
            deployment_id = %token.deployment_id,
            name = %token.name,
            symbol = %token.symbol,
            decimals = token.features.decimals(),
            owner = %config.owner,
            total_supply = token.ledger.total_supply(),
            "token deployed"
        );
        Ok(token)
    }

    fn emit(&mut self, event: TokenEvent) {
        let sequence = self.events.record(event);
        debug!(sequence, "event recorded");
    }

    fn gate(&self) -> TransferGate<'_> {
        TransferGate::new(&self.features, &self.membership)
    }

    // -- Transfers ---------------------------------------------------------

    /// Moves `amount` from `caller` to `to`.
    ///
    /// # Errors
    ///
    /// [`TokenError::Paused`], a null-principal error, any transfer gate
    /// rejection, or [`LedgerError::InsufficientBalance`].
    pub fn transfer(
        &mut self,
        caller: &Principal,
        to: &Principal,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.pause.ensure_not_paused()?;
        ensure_not_null(caller)?;
        ensure_not_null(to)?;
        self.gate().check_transfer(caller, to)?;

        self.ledger.move_balance(caller, to, amount)?;
        self.emit(TokenEvent::Transfer {
            from: Some(*caller),
            to: Some(*to),
            amount,
        });
        debug!(from = %caller, %to, amount, "transfer");
        Ok(())
    }

    /// Moves `amount` from `from` to `to` on behalf of `caller`.
    ///
    /// Consumes the allowance `from` granted `caller`, unless force
    /// transfer is enabled and `caller` is the owner, in which case no
    /// allowance is needed or consumed. The gate checks `from` and `to`
    /// in both cases.
    pub fn transfer_from(
        &mut self,
        caller: &Principal,
        from: &Principal,
        to: &Principal,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.pause.ensure_not_paused()?;
        ensure_not_null(caller)?;
        ensure_not_null(from)?;
        ensure_not_null(to)?;
        self.gate().check_transfer(from, to)?;

        let forced =
            self.features.is_force_transfer_allowed() && self.ownership.is_owner(caller);
        if !forced {
            self.ensure_allowance(from, caller, amount)?;
        }

        self.ledger.move_balance(from, to, amount)?;
        if !forced {
            self.ledger.spend_allowance(from, caller, amount)?;
        }
        self.emit(TokenEvent::Transfer {
            from: Some(*from),
            to: Some(*to),
            amount,
        });

        if forced {
            info!(owner = %caller, %from, %to, amount, "forced transfer");
        } else {
            debug!(spender = %caller, %from, %to, amount, "transfer from");
        }
        Ok(())
    }

    fn ensure_allowance(
        &self,
        owner: &Principal,
        spender: &Principal,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let available = self.ledger.allowance(owner, spender);
        if available < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner: *owner,
                spender: *spender,
                available,
                requested: amount,
            }
            .into());
        }
        Ok(())
    }

    // -- Allowances --------------------------------------------------------

    /// Sets the allowance `caller` grants `spender` to exactly `amount`.
    ///
    /// Allowances are not balance mutations: this works while paused and
    /// is not subject to membership checks.
    pub fn approve(
        &mut self,
        caller: &Principal,
        spender: &Principal,
        amount: Amount,
    ) -> Result<(), TokenError> {
        ensure_not_null(caller)?;
        ensure_not_null(spender)?;
        self.ledger.set_allowance(caller, spender, amount);
        self.emit(TokenEvent::Approval {
            owner: *caller,
            spender: *spender,
            amount,
        });
        Ok(())
    }

    /// Raises the allowance by `added`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::AllowanceOverflow`] if the sum does not fit in an
    /// [`Amount`]. The allowance is left unchanged.
    pub fn increase_allowance(
        &mut self,
        caller: &Principal,
        spender: &Principal,
        added: Amount,
    ) -> Result<(), TokenError> {
        let current = self.ledger.allowance(caller, spender);
        let raised = current
            .checked_add(added)
            .ok_or(LedgerError::AllowanceOverflow {
                current,
                increase: added,
            })?;
        self.approve(caller, spender, raised)
    }

    /// Lowers the allowance by `subtracted`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::AllowanceUnderflow`] if `subtracted` exceeds the
    /// current allowance.
    pub fn decrease_allowance(
        &mut self,
        caller: &Principal,
        spender: &Principal,
        subtracted: Amount,
    ) -> Result<(), TokenError> {
        let current = self.ledger.allowance(caller, spender);
        let lowered = current
            .checked_sub(subtracted)
            .ok_or(LedgerError::AllowanceUnderflow {
                current,
                decrease: subtracted,
            })?;
        self.approve(caller, spender, lowered)
    }

    // -- Supply ------------------------------------------------------------

    /// Creates `amount` new units in `to`'s balance.
    ///
    /// Only the recipient is gated: deny-list first, then allow-list.
    pub fn mint(
        &mut self,
        caller: &Principal,
        to: &Principal,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.features.require_mintable()?;
        self.ownership.ensure_owner(caller)?;
        self.pause.ensure_not_paused()?;
        ensure_not_null(to)?;
        self.gate().check_recipient(to)?;

        self.ledger.credit_supply(to, amount)?;
        self.emit(TokenEvent::Transfer {
            from: None,
            to: Some(*to),
            amount,
        });
        debug!(%to, amount, total_supply = self.ledger.total_supply(), "mint");
        Ok(())
    }

    /// Destroys `amount` units from the owner's own balance. No membership
    /// checks apply to burns.
    pub fn burn(&mut self, caller: &Principal, amount: Amount) -> Result<(), TokenError> {
        self.features.require_burnable()?;
        self.ownership.ensure_owner(caller)?;
        self.pause.ensure_not_paused()?;

        self.ledger.debit_supply(caller, amount)?;
        self.emit(TokenEvent::Transfer {
            from: Some(*caller),
            to: None,
            amount,
        });
        debug!(from = %caller, amount, "burn");
        Ok(())
    }

    /// Destroys `amount` units from `from`, consuming the allowance `from`
    /// granted the owner. No membership checks apply to burns.
    pub fn burn_from(
        &mut self,
        caller: &Principal,
        from: &Principal,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.features.require_burnable()?;
        self.ownership.ensure_owner(caller)?;
        self.pause.ensure_not_paused()?;
        ensure_not_null(from)?;
        self.ensure_allowance(from, caller, amount)?;

        self.ledger.debit_supply(from, amount)?;
        self.ledger.spend_allowance(from, caller, amount)?;
        self.emit(TokenEvent::Transfer {
            from: Some(*from),
            to: None,
            amount,
        });
        debug!(%from, amount, "burn from");
        Ok(())
    }

    // -- Pause -------------------------------------------------------------

    /// Halts all balance mutations.
    pub fn pause(&mut self, caller: &Principal) -> Result<(), TokenError> {
        self.features.require_pausable()?;
        self.ownership.ensure_owner(caller)?;
        self.pause.pause()?;
        self.emit(TokenEvent::Paused { by: *caller });
        info!(by = %caller, "token paused");
        Ok(())
    }

    /// Resumes balance mutations.
    pub fn unpause(&mut self, caller: &Principal) -> Result<(), TokenError> {
        self.features.require_pausable()?;
        self.ownership.ensure_owner(caller)?;
        self.pause.unpause()?;
        self.emit(TokenEvent::Unpaused { by: *caller });
        info!(by = %caller, "token unpaused");
        Ok(())
    }

    // -- Ownership ---------------------------------------------------------

    /// Hands control to `new_owner`.
    pub fn transfer_ownership(
        &mut self,
        caller: &Principal,
        new_owner: &Principal,
    ) -> Result<(), TokenError> {
        self.ownership.ensure_owner(caller)?;
        self.pause.ensure_not_paused()?;
        let event = self.ownership.transfer(*new_owner)?;
        self.emit(event);
        info!(previous = %caller, new = %new_owner, "ownership transferred");
        Ok(())
    }

    /// Gives up control permanently. Every owner-gated operation becomes
    /// unreachable, including `unpause` if the token is left paused.
    pub fn renounce_ownership(&mut self, caller: &Principal) -> Result<(), TokenError> {
        self.ownership.ensure_owner(caller)?;
        self.pause.ensure_not_paused()?;
        let event = self.ownership.renounce();
        self.emit(event);
        info!(previous = %caller, "ownership renounced");
        Ok(())
    }

    // -- Membership --------------------------------------------------------

    /// Adds `account` to the deny-list.
    pub fn deny(&mut self, caller: &Principal, account: &Principal) -> Result<(), TokenError> {
        self.features.require_deny_list()?;
        self.ownership.ensure_owner(caller)?;
        self.pause.ensure_not_paused()?;
        let event = self.membership.deny(&self.features, account)?;
        self.emit(event);
        Ok(())
    }

    /// Removes `account` from the deny-list.
    pub fn undeny(&mut self, caller: &Principal, account: &Principal) -> Result<(), TokenError> {
        self.features.require_deny_list()?;
        self.ownership.ensure_owner(caller)?;
        self.pause.ensure_not_paused()?;
        let event = self.membership.undeny(&self.features, account)?;
        self.emit(event);
        Ok(())
    }

    /// Replaces the allow-list. See
    /// [`MembershipStore::replace_allow_list`] for the failure semantics:
    /// a rejected replacement leaves the allow-list empty.
    pub fn replace_allow_list(
        &mut self,
        caller: &Principal,
        accounts: Vec<Principal>,
    ) -> Result<(), TokenError> {
        self.features.require_allow_list()?;
        self.ownership.ensure_owner(caller)?;
        self.pause.ensure_not_paused()?;
        let event = self.membership.replace_allow_list(&self.features, accounts)?;
        self.emit(event);
        Ok(())
    }

    // -- Queries -----------------------------------------------------------

    pub fn deployment_id(&self) -> Uuid {
        self.deployment_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.features.decimals()
    }

    pub fn features(&self) -> &FeatureConfig {
        &self.features
    }

    /// Deny-list and allow-list state, read-only.
    pub fn membership(&self) -> &MembershipStore {
        &self.membership
    }

    pub fn is_mintable(&self) -> bool {
        self.features.is_mintable()
    }

    pub fn is_burnable(&self) -> bool {
        self.features.is_burnable()
    }

    pub fn is_pausable(&self) -> bool {
        self.features.is_pausable()
    }

    pub fn is_deny_list_enabled(&self) -> bool {
        self.features.is_deny_list_enabled()
    }

    pub fn is_allow_list_enabled(&self) -> bool {
        self.features.is_allow_list_enabled()
    }

    pub fn is_force_transfer_allowed(&self) -> bool {
        self.features.is_force_transfer_allowed()
    }

    /// The controlling principal, or `None` once renounced.
    pub fn owner(&self) -> Option<Principal> {
        self.ownership.owner()
    }

    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    pub fn is_denied(&self, account: &Principal) -> bool {
        self.membership.is_denied(account)
    }

    pub fn is_allowed(&self, account: &Principal) -> bool {
        self.membership.is_allowed(account)
    }

    /// The allow-list in the order it was last supplied.
    pub fn allow_list_snapshot(&self) -> &[Principal] {
        self.membership.snapshot()
    }

    pub fn balance_of(&self, account: &Principal) -> Amount {
        self.ledger.balance_of(account)
    }

    pub fn total_supply(&self) -> Amount {
        self.ledger.total_supply()
    }

    pub fn allowance(&self, owner: &Principal, spender: &Principal) -> Amount {
        self.ledger.allowance(owner, spender)
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> &[EventRecord] {
        self.events.records()
    }

    /// Events with `sequence >= since`.
    pub fn events_since(&self, since: u64) -> &[EventRecord] {
        self.events.since(since)
    }

    /// The underlying ledger, read-only.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// A serializable summary of the token's current state.
    pub fn info(&self) -> TokenInfo {
        TokenInfo {
            deployment_id: self.deployment_id,
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.features.decimals(),
            features: self.features.flags(),
            total_supply: self.ledger.total_supply(),
            paused: self.pause.is_paused(),
            owner: self.ownership.owner(),
            denied_count: self.membership.denied_count(),
            allowed_count: self.membership.allowed_count(),
            event_count: self.events.len(),
            deployed_at: self.deployed_at,
        }
    }
}
