// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Bastion Protocol: Core Primitives
//!
//! The building blocks every gated ledger sits on. Nothing in here knows
//! about pausing, deny-lists or owners; that policy lives one layer up in
//! `bastion-contracts`. This crate only answers three questions:
//!
//! - **principal**: who is this? Fixed-width account identifiers and the
//!   null-address check every entry point runs.
//! - **ledger**: how much do they hold? The `LedgerCore` seam plus an
//!   in-memory implementation with checked arithmetic.
//! - **config**: protocol constants and display scaling.
//!
//! ## Design Philosophy
//!
//! 1. Amounts are `u128` in the smallest unit. The protocol never divides.
//! 2. Every arithmetic step is checked. Wrapping arithmetic and money do
//!    not mix.
//! 3. Ledger operations either fully apply or leave state untouched.

pub mod config;
pub mod ledger;
pub mod principal;

pub use ledger::{Amount, BalanceLedger, LedgerCore, LedgerError};
pub use principal::{Principal, PrincipalError};
