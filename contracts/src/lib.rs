//! # Bastion Gated Token
//!
//! A configurable fungible-asset ledger whose every balance mutation
//! passes through a compliance gate. One implementation, many issuers:
//! each deployment picks its own mix of capabilities at creation time.
//!
//! - **Features**: six capability flags plus decimals, fixed forever at
//!   deployment.
//! - **Membership**: deny-list and allow-list with an ordered allow-list
//!   snapshot for enumeration and bulk replacement.
//! - **Gate**: the validation predicate consulted before every transfer.
//! - **Pause / Ownership**: the administrative state machine.
//! - **Token**: composes all of the above in front of a
//!   [`LedgerCore`](bastion_protocol::LedgerCore).
//!
//! ## Design Principles
//!
//! 1. Validate, then mutate. Every guard runs before the first write, so
//!    a failed call leaves no trace (allow-list replacement is the one
//!    documented exception).
//! 2. A principal is never on the deny-list and the allow-list at once.
//! 3. Every failure is a named [`TokenError`] variant with a stable code.
//! 4. Every public type is serializable (serde) for wire transport.

pub mod call;
pub mod error;
pub mod events;
pub mod features;
pub mod gate;
pub mod membership;
pub mod ownership;
pub mod pause;
pub mod token;

pub use call::{Invocation, TokenCall};
pub use error::{ErrorCategory, TokenError};
pub use events::{EventLog, EventRecord, TokenEvent};
pub use features::{FeatureConfig, FeatureFlags};
pub use gate::TransferGate;
pub use membership::MembershipStore;
pub use ownership::OwnershipState;
pub use pause::PauseState;
pub use token::{GatedToken, TokenConfig, TokenInfo};
