//! # Feature Configuration
//!
//! The six capability switches and the decimal count a token is deployed
//! with. Chosen once, never changed: [`FeatureConfig`] has no setters, and
//! the token only ever hands out shared references to it.

use bastion_protocol::config::MAX_DECIMALS;
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// The raw capability switches as they appear in a deployment config.
///
/// Every flag defaults to `false`, so a config that names none of them
/// deploys a plain fixed-supply token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// The owner may create new supply.
    pub mintable: bool,
    /// The owner may destroy supply.
    pub burnable: bool,
    /// The owner may halt all balance mutations.
    pub pausable: bool,
    /// Deny-listed principals may neither send nor receive.
    pub deny_list_enabled: bool,
    /// Only allow-listed principals may send or receive.
    pub allow_list_enabled: bool,
    /// The owner may move funds between any two accounts without an
    /// allowance.
    pub force_transfer_allowed: bool,
}

/// Immutable capability configuration of a deployed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureConfig {
    flags: FeatureFlags,
    decimals: u8,
}

impl FeatureConfig {
    /// Validates and freezes a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::InvalidDecimals`] if `decimals` exceeds
    /// [`MAX_DECIMALS`].
    pub fn new(flags: FeatureFlags, decimals: u8) -> Result<Self, TokenError> {
        if decimals > MAX_DECIMALS {
            return Err(TokenError::InvalidDecimals {
                decimals,
                max: MAX_DECIMALS,
            });
        }
        Ok(Self { flags, decimals })
    }

    /// Returns a copy of the raw flags.
    pub fn flags(&self) -> FeatureFlags {
        self.flags
    }

    pub fn is_mintable(&self) -> bool {
        self.flags.mintable
    }

    pub fn is_burnable(&self) -> bool {
        self.flags.burnable
    }

    pub fn is_pausable(&self) -> bool {
        self.flags.pausable
    }

    pub fn is_deny_list_enabled(&self) -> bool {
        self.flags.deny_list_enabled
    }

    pub fn is_allow_list_enabled(&self) -> bool {
        self.flags.allow_list_enabled
    }

    pub fn is_force_transfer_allowed(&self) -> bool {
        self.flags.force_transfer_allowed
    }

    /// Display scaling applied to initial supply.
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub(crate) fn require_mintable(&self) -> Result<(), TokenError> {
        if !self.flags.mintable {
            return Err(TokenError::MintingNotEnabled);
        }
        Ok(())
    }

    pub(crate) fn require_burnable(&self) -> Result<(), TokenError> {
        if !self.flags.burnable {
            return Err(TokenError::BurningNotEnabled);
        }
        Ok(())
    }

    pub(crate) fn require_pausable(&self) -> Result<(), TokenError> {
        if !self.flags.pausable {
            return Err(TokenError::PausingNotEnabled);
        }
        Ok(())
    }

    pub(crate) fn require_deny_list(&self) -> Result<(), TokenError> {
        if !self.flags.deny_list_enabled {
            return Err(TokenError::BlacklistNotEnabled);
        }
        Ok(())
    }

    pub(crate) fn require_allow_list(&self) -> Result<(), TokenError> {
        if !self.flags.allow_list_enabled {
            return Err(TokenError::WhitelistNotEnabled);
        }
        Ok(())
    }
}
