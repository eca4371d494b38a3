//! # Membership Store: Deny-List & Allow-List
//!
//! Two membership sets and one ordered list:
//!
//! ```text
//! denied          set   - principals that may neither send nor receive
//! allowed         set   - principals that may send and receive
//! allow_snapshot  list  - the allow-list as last supplied, for enumeration
//!                         and bulk replacement
//! ```
//!
//! A principal is never in `denied` and `allowed` at the same time: each
//! mutation path checks the opposite set before it writes.
//!
//! The allow-list has no single-entry add or remove; it is only ever
//! replaced wholesale via [`MembershipStore::replace_allow_list`].
//!
//! The store holds no feature flags of its own. Every mutator takes the
//! token's [`FeatureConfig`], the same way [`crate::gate::TransferGate`]
//! reads it, so the frozen configuration stays the only source of truth.

use std::collections::HashSet;

use bastion_protocol::principal::ensure_not_null;
use bastion_protocol::Principal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::TokenError;
use crate::events::TokenEvent;
use crate::features::FeatureConfig;

/// Deny-list and allow-list membership for one token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MembershipStore {
    denied: HashSet<Principal>,
    allowed: HashSet<Principal>,
    allow_snapshot: Vec<Principal>,
}

impl MembershipStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `account` to the deny-list.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// [`TokenError::BlacklistNotEnabled`], a null-principal error,
    /// [`TokenError::AddrAlreadyBlacklisted`],
    /// [`TokenError::CannotBlacklistWhitelistedAddr`].
    pub fn deny(
        &mut self,
        features: &FeatureConfig,
        account: &Principal,
    ) -> Result<TokenEvent, TokenError> {
        features.require_deny_list()?;
        ensure_not_null(account)?;
        if self.denied.contains(account) {
            return Err(TokenError::AddrAlreadyBlacklisted(*account));
        }
        if self.allowed.contains(account) {
            return Err(TokenError::CannotBlacklistWhitelistedAddr(*account));
        }

        self.denied.insert(*account);
        debug!(%account, "address blacklisted");
        Ok(TokenEvent::Blacklisted { account: *account })
    }

    /// Removes `account` from the deny-list.
    ///
    /// # Errors
    ///
    /// [`TokenError::BlacklistNotEnabled`], a null-principal error, or
    /// [`TokenError::AddrAlreadyUnblacklisted`] if `account` is not denied.
    pub fn undeny(
        &mut self,
        features: &FeatureConfig,
        account: &Principal,
    ) -> Result<TokenEvent, TokenError> {
        features.require_deny_list()?;
        ensure_not_null(account)?;
        if !self.denied.remove(account) {
            return Err(TokenError::AddrAlreadyUnblacklisted(*account));
        }

        debug!(%account, "address removed from blacklist");
        Ok(TokenEvent::Unblacklisted { account: *account })
    }

    /// Replaces the allow-list with `accounts`.
    ///
    /// Every current member is cleared first. Entries are then admitted in
    /// order; the first null or denied entry aborts the replacement and the
    /// allow-list is left empty. The clearing is not undone. Callers must
    /// treat a failed replacement as an emptied allow-list and retry the
    /// whole replacement.
    ///
    /// Duplicates are kept verbatim in the snapshot and map to a single
    /// membership fact.
    ///
    /// # Errors
    ///
    /// [`TokenError::WhitelistNotEnabled`], a null-principal error, or
    /// [`TokenError::CannotWhitelistBlacklistedAddr`] for the first denied
    /// entry.
    pub fn replace_allow_list(
        &mut self,
        features: &FeatureConfig,
        accounts: Vec<Principal>,
    ) -> Result<TokenEvent, TokenError> {
        features.require_allow_list()?;

        for account in self.allow_snapshot.drain(..) {
            self.allowed.remove(&account);
        }

        for (admitted, account) in accounts.iter().enumerate() {
            if let Err(err) = self.admit(account) {
                for earlier in &accounts[..admitted] {
                    self.allowed.remove(earlier);
                }
                info!(
                    rejected = %account,
                    reason = err.code(),
                    "whitelist replacement aborted, whitelist left empty"
                );
                return Err(err);
            }
        }

        self.allow_snapshot = accounts.clone();
        info!(members = self.allowed.len(), "whitelist replaced");
        Ok(TokenEvent::WhitelistUpdated { accounts })
    }

    fn admit(&mut self, account: &Principal) -> Result<(), TokenError> {
        ensure_not_null(account)?;
        if self.denied.contains(account) {
            return Err(TokenError::CannotWhitelistBlacklistedAddr(*account));
        }
        self.allowed.insert(*account);
        Ok(())
    }

    /// Returns `true` if `account` is on the deny-list.
    pub fn is_denied(&self, account: &Principal) -> bool {
        self.denied.contains(account)
    }

    /// Returns `true` if `account` is on the allow-list.
    pub fn is_allowed(&self, account: &Principal) -> bool {
        self.allowed.contains(account)
    }

    /// The allow-list in the order it was last supplied.
    pub fn snapshot(&self) -> &[Principal] {
        &self.allow_snapshot
    }

    /// Number of denied principals.
    pub fn denied_count(&self) -> usize {
        self.denied.len()
    }

    /// Number of distinct allowed principals.
    pub fn allowed_count(&self) -> usize {
        self.allowed.len()
    }
}
