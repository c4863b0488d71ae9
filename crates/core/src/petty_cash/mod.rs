//! Petty cash subsystem.
//!
//! A day-scoped twin of the journal engine with an approval gate that turns an
//! approved entry into a permanent journal line.

pub mod approval;
pub mod balance;
pub mod types;
pub mod validation;

pub use approval::{approve, check_approvable, check_mutable, select_ledger, to_journal_entry};
pub use balance::recompute_day;
pub use types::{CreatePettyCashInput, NewPettyCash, PettyCash, PettyCashPatch};
pub use validation::{ValidatedPettyCashPatch, validate_new_petty_cash, validate_petty_cash_patch};
