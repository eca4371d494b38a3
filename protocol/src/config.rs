//! # Protocol Configuration & Constants
//!
//! Every magic number in Bastion lives here. If you're hardcoding a
//! constant somewhere else, move it.

use crate::ledger::Amount;

// ---------------------------------------------------------------------------
// Protocol Version
// ---------------------------------------------------------------------------

/// The full protocol version string.
pub const PROTOCOL_VERSION: &str = "0.1.0";

// ---------------------------------------------------------------------------
// Principals
// ---------------------------------------------------------------------------

/// Width of a principal identifier in bytes. 20 bytes, the same as an
/// EVM account address, so identifiers can be mapped one-to-one.
pub const PRINCIPAL_LENGTH: usize = 20;

/// Prefix of the textual principal form.
pub const PRINCIPAL_PREFIX: &str = "0x";

// ---------------------------------------------------------------------------
// Token Parameters
// ---------------------------------------------------------------------------

/// Largest decimal count a ledger may be configured with. `10^18` still
/// leaves twenty orders of magnitude of headroom in a `u128`.
pub const MAX_DECIMALS: u8 = 18;

/// Allowance value treated as "unlimited". Spending against it never
/// decrements the stored allowance.
pub const UNLIMITED_ALLOWANCE: Amount = Amount::MAX;

// ---------------------------------------------------------------------------
// Node Defaults
// ---------------------------------------------------------------------------

/// Default HTTP API port.
pub const DEFAULT_API_PORT: u16 = 9841;

/// Default metrics (Prometheus) port.
pub const DEFAULT_METRICS_PORT: u16 = 9842;

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------

/// Scales a whole-unit amount to the smallest unit: `amount * 10^decimals`.
///
/// Returns `None` if the result does not fit in an [`Amount`].
pub fn scale_amount(amount: Amount, decimals: u8) -> Option<Amount> {
    let factor = (10 as Amount).checked_pow(u32::from(decimals))?;
    amount.checked_mul(factor)
}
