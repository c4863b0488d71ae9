//! Journal engine logic.
//!
//! This module implements the ordered debit/credit lines of a ledger:
//! - Domain types and raw inputs for journal lines
//! - Input validation (required fields, side exclusivity, amount rounding)
//! - The forward balance cascade across the ledger timeline

pub mod cascade;
pub mod types;
pub mod validation;

#[cfg(test)]
mod cascade_props;
#[cfg(test)]
mod validation_props;

pub use cascade::{CascadeOutcome, CascadePlan, LedgerSlice, recompute, verify_chain};
pub use types::{
    CreateJournalEntryInput, JournalEntry, JournalEntryPatch, JournalEntryUpdate,
    NewJournalEntry, ReconcileDayInput,
};
pub use validation::{ValidatedPatch, validate_new_entry, validate_patch, validate_reconcile_entry};
