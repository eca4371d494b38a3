//! # Transfer Gate
//!
//! The single predicate every balance-moving call passes before the
//! ledger is touched. It reads membership and feature flags and nothing
//! else; it never mutates.
//!
//! Order is fixed: allow-list before deny-list, sender before recipient
//! within each list. Pause is not checked here. It is enforced at the
//! operation boundary before the gate runs.

use bastion_protocol::Principal;

use crate::error::TokenError;
use crate::features::FeatureConfig;
use crate::membership::MembershipStore;

/// Borrowed view over the state the gate consults.
#[derive(Debug, Clone, Copy)]
pub struct TransferGate<'a> {
    features: &'a FeatureConfig,
    membership: &'a MembershipStore,
}

impl<'a> TransferGate<'a> {
    pub fn new(features: &'a FeatureConfig, membership: &'a MembershipStore) -> Self {
        Self {
            features,
            membership,
        }
    }

    /// Validates a transfer from `sender` to `recipient`.
    pub fn check_transfer(
        &self,
        sender: &Principal,
        recipient: &Principal,
    ) -> Result<(), TokenError> {
        if self.features.is_allow_list_enabled() {
            if !self.membership.is_allowed(sender) {
                return Err(TokenError::SenderNotWhitelisted(*sender));
            }
            if !self.membership.is_allowed(recipient) {
                return Err(TokenError::RecipientNotWhitelisted(*recipient));
            }
        }

        if self.features.is_deny_list_enabled() {
            if self.membership.is_denied(sender) {
                return Err(TokenError::SenderBlacklisted(*sender));
            }
            if self.membership.is_denied(recipient) {
                return Err(TokenError::RecipientBlacklisted(*recipient));
            }
        }

        Ok(())
    }

    /// Validates the receiving side of a mint. There is no sender, so only
    /// the recipient is checked: deny-list first, then allow-list.
    pub fn check_recipient(&self, recipient: &Principal) -> Result<(), TokenError> {
        if self.features.is_deny_list_enabled() && self.membership.is_denied(recipient) {
            return Err(TokenError::RecipientBlacklisted(*recipient));
        }
        if self.features.is_allow_list_enabled() && !self.membership.is_allowed(recipient) {
            return Err(TokenError::RecipientNotWhitelisted(*recipient));
        }
        Ok(())
    }
}
