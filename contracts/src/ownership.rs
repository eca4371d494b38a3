//! # Ownership
//!
//! Exactly one controlling principal, or none after renouncement.
//!
//! ```text
//! Owned(p) --transfer--> Owned(p')
//! Owned(p) --renounce--> Ownerless   (terminal)
//! ```
//!
//! Once ownerless, every owner-gated operation fails for every caller,
//! permanently. There is no recovery path.

use bastion_protocol::principal::ensure_not_null;
use bastion_protocol::Principal;
use serde::{Deserialize, Serialize};

use crate::error::TokenError;
use crate::events::TokenEvent;

/// The controlling principal of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipState {
    owner: Option<Principal>,
}

impl OwnershipState {
    /// Starts owned by `owner`.
    pub fn new(owner: Principal) -> Result<Self, TokenError> {
        ensure_not_null(&owner)?;
        Ok(Self { owner: Some(owner) })
    }

    /// The current owner, or `None` once renounced.
    pub fn owner(&self) -> Option<Principal> {
        self.owner
    }

    /// Returns `true` while an owner exists.
    pub fn is_owned(&self) -> bool {
        self.owner.is_some()
    }

    /// Returns `true` if `caller` is the current owner.
    pub fn is_owner(&self, caller: &Principal) -> bool {
        self.owner.as_ref() == Some(caller)
    }

    /// Fails with [`TokenError::Unauthorized`] unless `caller` owns the
    /// token. Always fails after renouncement.
    pub fn ensure_owner(&self, caller: &Principal) -> Result<(), TokenError> {
        if !self.is_owner(caller) {
            return Err(TokenError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    /// Hands control to `new_owner`.
    pub(crate) fn transfer(&mut self, new_owner: Principal) -> Result<TokenEvent, TokenError> {
        ensure_not_null(&new_owner)?;
        let previous_owner = self.owner.replace(new_owner);
        Ok(TokenEvent::OwnershipTransferred {
            previous_owner,
            new_owner: Some(new_owner),
        })
    }

    /// Gives up control for good.
    pub(crate) fn renounce(&mut self) -> TokenEvent {
        TokenEvent::OwnershipTransferred {
            previous_owner: self.owner.take(),
            new_owner: None,
        }
    }
}
