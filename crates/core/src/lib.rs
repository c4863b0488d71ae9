//! Core business logic for Ledgerline.
//!
//! This crate contains pure business logic with ZERO storage or transport dependencies.
//! All domain types, validation rules, and balance calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Daily aggregates, the balance timeline, monthly recap
//! - `journal` - Debit/credit lines and the forward balance cascade
//! - `petty_cash` - Day-scoped cash entries and their approval gate
//! - `posting` - Freezing ledgers into immutable snapshots and bulk reversal
//! - `error` - The error taxonomy shared by every operation

pub mod error;
pub mod journal;
pub mod ledger;
pub mod petty_cash;
pub mod posting;

pub use error::{ErrorKind, LedgerError, LedgerResult};
