//! # Principals: Account Identifiers
//!
//! A [`Principal`] is the identity every balance, allowance and
//! membership fact is keyed by. It is a fixed 20-byte value rendered as
//! `0x` followed by 40 lowercase hex characters:
//!
//! ```text
//! 0x5f2a9c0e7b1d4e3a8c6f0b2d9e1a7c4b3f8e6d20
//! ```
//!
//! The all-zero identifier is reserved. It stands for "nobody" (the
//! source of a mint, the destination of a burn) and is never accepted as
//! input. [`ensure_not_null`] is the single check every entry point runs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{PRINCIPAL_LENGTH, PRINCIPAL_PREFIX};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when parsing or validating a principal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrincipalError {
    /// The null (all-zero) principal was supplied where a real account is
    /// required.
    #[error("null principal is not a valid account")]
    Null,

    /// The textual form is not valid hex.
    #[error("invalid principal hex: {0}")]
    InvalidHex(String),

    /// The decoded identifier has the wrong width.
    #[error("invalid principal length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes.
        got: usize,
    },
}

// ---------------------------------------------------------------------------
// Principal
// ---------------------------------------------------------------------------

/// A fixed-width account identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Principal([u8; PRINCIPAL_LENGTH]);

impl Principal {
    /// The reserved all-zero identifier.
    pub const NULL: Principal = Principal([0u8; PRINCIPAL_LENGTH]);

    /// Creates a principal from raw bytes.
    pub const fn from_bytes(bytes: [u8; PRINCIPAL_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Derives a principal from a human-readable label.
    ///
    /// Takes the first 20 bytes of `BLAKE3(label)`. Deterministic, so
    /// scripts and fixtures can refer to `"alice"` instead of a hex blob.
    pub fn derive(label: &str) -> Self {
        let hash = blake3::hash(label.as_bytes());
        let mut bytes = [0u8; PRINCIPAL_LENGTH];
        bytes.copy_from_slice(&hash.as_bytes()[..PRINCIPAL_LENGTH]);
        Self(bytes)
    }

    /// Returns the raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8; PRINCIPAL_LENGTH] {
        &self.0
    }

    /// Returns `true` for the reserved all-zero identifier.
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; PRINCIPAL_LENGTH]
    }

    /// Returns the `0x`-prefixed lowercase hex form.
    pub fn to_hex(&self) -> String {
        format!("{}{}", PRINCIPAL_PREFIX, hex::encode(self.0))
    }

    /// Parses the hex form. The `0x` prefix is optional.
    pub fn from_hex(s: &str) -> Result<Self, PrincipalError> {
        let digits = s.strip_prefix(PRINCIPAL_PREFIX).unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| PrincipalError::InvalidHex(e.to_string()))?;
        if bytes.len() != PRINCIPAL_LENGTH {
            return Err(PrincipalError::InvalidLength {
                expected: PRINCIPAL_LENGTH,
                got: bytes.len(),
            });
        }
        let mut arr = [0u8; PRINCIPAL_LENGTH];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

/// Rejects the null principal. Returns the principal back so the check
/// can be chained at the top of an operation.
pub fn ensure_not_null(principal: &Principal) -> Result<&Principal, PrincipalError> {
    if principal.is_null() {
        return Err(PrincipalError::Null);
    }
    Ok(principal)
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Principal({})", self.to_hex())
    }
}

impl FromStr for Principal {
    type Err = PrincipalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<[u8; PRINCIPAL_LENGTH]> for Principal {
    fn from(bytes: [u8; PRINCIPAL_LENGTH]) -> Self {
        Self(bytes)
    }
}

// Principals travel as hex strings so they can key JSON maps.
impl Serialize for Principal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Principal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
