//! Wire form of token operations.
//!
//! A [`TokenCall`] names one mutating operation and its arguments; an
//! [`Invocation`] pairs it with the calling principal. The node accepts
//! invocations over HTTP and replays them from files, both through
//! [`GatedToken::execute`].

use bastion_protocol::{Amount, LedgerCore, Principal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TokenError;
use crate::token::GatedToken;

/// One mutating token operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCall {
    Transfer {
        to: Principal,
        amount: Amount,
    },
    TransferFrom {
        from: Principal,
        to: Principal,
        amount: Amount,
    },
    Approve {
        spender: Principal,
        amount: Amount,
    },
    IncreaseAllowance {
        spender: Principal,
        amount: Amount,
    },
    DecreaseAllowance {
        spender: Principal,
        amount: Amount,
    },
    Mint {
        to: Principal,
        amount: Amount,
    },
    Burn {
        amount: Amount,
    },
    BurnFrom {
        from: Principal,
        amount: Amount,
    },
    Pause,
    Unpause,
    TransferOwnership {
        new_owner: Principal,
    },
    RenounceOwnership,
    Deny {
        account: Principal,
    },
    Undeny {
        account: Principal,
    },
    ReplaceAllowList {
        accounts: Vec<Principal>,
    },
}

impl TokenCall {
    /// Operation name, used as a metrics label.
    pub fn method(&self) -> &'static str {
        match self {
            TokenCall::Transfer { .. } => "transfer",
            TokenCall::TransferFrom { .. } => "transfer_from",
            TokenCall::Approve { .. } => "approve",
            TokenCall::IncreaseAllowance { .. } => "increase_allowance",
            TokenCall::DecreaseAllowance { .. } => "decrease_allowance",
            TokenCall::Mint { .. } => "mint",
            TokenCall::Burn { .. } => "burn",
            TokenCall::BurnFrom { .. } => "burn_from",
            TokenCall::Pause => "pause",
            TokenCall::Unpause => "unpause",
            TokenCall::TransferOwnership { .. } => "transfer_ownership",
            TokenCall::RenounceOwnership => "renounce_ownership",
            TokenCall::Deny { .. } => "deny",
            TokenCall::Undeny { .. } => "undeny",
            TokenCall::ReplaceAllowList { .. } => "replace_allow_list",
        }
    }
}

/// A call together with the principal making it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub caller: Principal,
    pub call: TokenCall,
}

impl<L: LedgerCore> GatedToken<L> {
    /// Dispatches `call` on behalf of `caller`.
    pub fn execute(&mut self, caller: &Principal, call: TokenCall) -> Result<(), TokenError> {
        let method = call.method();
        let result = match call {
            TokenCall::Transfer { to, amount } => self.transfer(caller, &to, amount),
            TokenCall::TransferFrom { from, to, amount } => {
                self.transfer_from(caller, &from, &to, amount)
            }
            TokenCall::Approve { spender, amount } => self.approve(caller, &spender, amount),
            TokenCall::IncreaseAllowance { spender, amount } => {
                self.increase_allowance(caller, &spender, amount)
            }
            TokenCall::DecreaseAllowance { spender, amount } => {
                self.decrease_allowance(caller, &spender, amount)
            }
            TokenCall::Mint { to, amount } => self.mint(caller, &to, amount),
            TokenCall::Burn { amount } => self.burn(caller, amount),
            TokenCall::BurnFrom { from, amount } => self.burn_from(caller, &from, amount),
            TokenCall::Pause => self.pause(caller),
            TokenCall::Unpause => self.unpause(caller),
            TokenCall::TransferOwnership { new_owner } => {
                self.transfer_ownership(caller, &new_owner)
            }
            TokenCall::RenounceOwnership => self.renounce_ownership(caller),
            TokenCall::Deny { account } => self.deny(caller, &account),
            TokenCall::Undeny { account } => self.undeny(caller, &account),
            TokenCall::ReplaceAllowList { accounts } => self.replace_allow_list(caller, accounts),
        };

        if let Err(ref err) = result {
            debug!(%caller, method, code = err.code(), "call rejected");
        }
        result
    }

    /// Shorthand for `execute(&invocation.caller, invocation.call)`.
    pub fn invoke(&mut self, invocation: Invocation) -> Result<(), TokenError> {
        self.execute(&invocation.caller, invocation.call)
    }
}
