//! Error types for the gated token.
//!
//! Every operation that can fail returns a [`TokenError`]. Callers branch
//! on the variant (or on its stable [`code`](TokenError::code) when the
//! error has crossed a wire boundary), never on the message text.

use bastion_protocol::{Amount, LedgerError, Principal, PrincipalError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad classes of failure, for callers that only care about the kind
/// of problem rather than the exact cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The deployment parameters are invalid.
    Configuration,
    /// The operation targets a feature this deployment did not enable.
    CapabilityDisabled,
    /// The membership change would break deny/allow-list consistency.
    MembershipConflict,
    /// A transfer party failed a deny-list or allow-list check.
    TransferValidation,
    /// The caller is not the controlling principal.
    Authorization,
    /// The ledger's pause state forbids the operation.
    State,
    /// A principal argument is null or malformed.
    Principal,
    /// Balance accounting rejected the operation.
    Ledger,
}

/// Errors that can occur during gated token operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Decimals outside `[0, MAX_DECIMALS]`.
    #[error("invalid decimals: {decimals} exceeds the maximum of {max}")]
    InvalidDecimals {
        /// The requested decimal count.
        decimals: u8,
        /// The largest accepted value.
        max: u8,
    },

    /// The initial supply does not fit once scaled by `10^decimals`.
    #[error("initial supply {initial_supply} overflows when scaled by 10^{decimals}")]
    InitialSupplyOverflow {
        /// The requested supply in whole units.
        initial_supply: Amount,
        /// The decimals it was scaled by.
        decimals: u8,
    },

    /// Minting was not enabled at deployment.
    #[error("minting is not enabled for this token")]
    MintingNotEnabled,

    /// Burning was not enabled at deployment.
    #[error("burning is not enabled for this token")]
    BurningNotEnabled,

    /// Pausing was not enabled at deployment.
    #[error("pausing is not enabled for this token")]
    PausingNotEnabled,

    /// The deny-list was not enabled at deployment.
    #[error("blacklist is not enabled for this token")]
    BlacklistNotEnabled,

    /// The allow-list was not enabled at deployment.
    #[error("whitelist is not enabled for this token")]
    WhitelistNotEnabled,

    /// Denying a principal that is currently allowed.
    #[error("cannot blacklist {0}: address is whitelisted")]
    CannotBlacklistWhitelistedAddr(Principal),

    /// Allowing a principal that is currently denied.
    #[error("cannot whitelist {0}: address is blacklisted")]
    CannotWhitelistBlacklistedAddr(Principal),

    /// Denying a principal that is already denied.
    #[error("address {0} is already blacklisted")]
    AddrAlreadyBlacklisted(Principal),

    /// Un-denying a principal that is not denied.
    #[error("address {0} is not blacklisted")]
    AddrAlreadyUnblacklisted(Principal),

    /// The sending side of a transfer is denied.
    #[error("sender {0} is blacklisted")]
    SenderBlacklisted(Principal),

    /// The receiving side of a transfer or mint is denied.
    #[error("recipient {0} is blacklisted")]
    RecipientBlacklisted(Principal),

    /// The sending side of a transfer is not allowed.
    #[error("sender {0} is not whitelisted")]
    SenderNotWhitelisted(Principal),

    /// The receiving side of a transfer or mint is not allowed.
    #[error("recipient {0} is not whitelisted")]
    RecipientNotWhitelisted(Principal),

    /// An owner-only operation was called by someone else, or after
    /// ownership was renounced.
    #[error("unauthorized: {caller} is not the owner")]
    Unauthorized {
        /// The principal that attempted the call.
        caller: Principal,
    },

    /// The operation is rejected while the ledger is paused.
    #[error("token operations are paused")]
    Paused,

    /// Unpause was requested while the ledger is running.
    #[error("token operations are not paused")]
    NotPaused,

    /// A principal argument failed validation.
    #[error(transparent)]
    Principal(#[from] PrincipalError),

    /// Balance accounting rejected the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl TokenError {
    /// Stable machine-readable name of the failure.
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::InvalidDecimals { .. } => "InvalidDecimals",
            TokenError::InitialSupplyOverflow { .. } => "InitialSupplyOverflow",
            TokenError::MintingNotEnabled => "MintingNotEnabled",
            TokenError::BurningNotEnabled => "BurningNotEnabled",
            TokenError::PausingNotEnabled => "PausingNotEnabled",
            TokenError::BlacklistNotEnabled => "BlacklistNotEnabled",
            TokenError::WhitelistNotEnabled => "WhitelistNotEnabled",
            TokenError::CannotBlacklistWhitelistedAddr(_) => "CannotBlacklistWhitelistedAddr",
            TokenError::CannotWhitelistBlacklistedAddr(_) => "CannotWhitelistBlacklistedAddr",
            TokenError::AddrAlreadyBlacklisted(_) => "AddrAlreadyBlacklisted",
            TokenError::AddrAlreadyUnblacklisted(_) => "AddrAlreadyUnblacklisted",
            TokenError::SenderBlacklisted(_) => "SenderBlacklisted",
            TokenError::RecipientBlacklisted(_) => "RecipientBlacklisted",
            TokenError::SenderNotWhitelisted(_) => "SenderNotWhitelisted",
            TokenError::RecipientNotWhitelisted(_) => "RecipientNotWhitelisted",
            TokenError::Unauthorized { .. } => "Unauthorized",
            TokenError::Paused => "Paused",
            TokenError::NotPaused => "NotPaused",
            TokenError::Principal(PrincipalError::Null) => "NullPrincipal",
            TokenError::Principal(_) => "InvalidPrincipal",
            TokenError::Ledger(e) => match e {
                LedgerError::InsufficientBalance { .. } => "InsufficientBalance",
                LedgerError::InsufficientAllowance { .. } => "InsufficientAllowance",
                LedgerError::AllowanceUnderflow { .. } => "AllowanceUnderflow",
                LedgerError::AllowanceOverflow { .. } => "AllowanceOverflow",
                LedgerError::SupplyOverflow { .. } => "SupplyOverflow",
                LedgerError::BalanceOverflow { .. } => "BalanceOverflow",
            },
        }
    }

    /// The class of failure this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            TokenError::InvalidDecimals { .. } | TokenError::InitialSupplyOverflow { .. } => {
                ErrorCategory::Configuration
            }
            TokenError::MintingNotEnabled
            | TokenError::BurningNotEnabled
            | TokenError::PausingNotEnabled
            | TokenError::BlacklistNotEnabled
            | TokenError::WhitelistNotEnabled => ErrorCategory::CapabilityDisabled,
            TokenError::CannotBlacklistWhitelistedAddr(_)
            | TokenError::CannotWhitelistBlacklistedAddr(_)
            | TokenError::AddrAlreadyBlacklisted(_)
            | TokenError::AddrAlreadyUnblacklisted(_) => ErrorCategory::MembershipConflict,
            TokenError::SenderBlacklisted(_)
            | TokenError::RecipientBlacklisted(_)
            | TokenError::SenderNotWhitelisted(_)
            | TokenError::RecipientNotWhitelisted(_) => ErrorCategory::TransferValidation,
            TokenError::Unauthorized { .. } => ErrorCategory::Authorization,
            TokenError::Paused | TokenError::NotPaused => ErrorCategory::State,
            TokenError::Principal(_) => ErrorCategory::Principal,
            TokenError::Ledger(_) => ErrorCategory::Ledger,
        }
    }
}
