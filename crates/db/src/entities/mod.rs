//! `SeaORM` entity definitions.
//!
//! Amounts are stored as decimal strings so SQLite never rounds them through
//! a float. Each entity converts into its domain type with `TryFrom`.

pub mod general_journals;
pub mod general_ledgers;
pub mod petty_cashes;
pub mod posting_details;
pub mod postings;

use std::str::FromStr;

use ledgerline_core::{LedgerError, LedgerResult};
use rust_decimal::Decimal;

/// Parses a stored amount column.
pub(crate) fn parse_amount(column: &'static str, raw: &str) -> LedgerResult<Decimal> {
    Decimal::from_str(raw)
        .map_err(|e| LedgerError::Storage(format!("{column} holds {raw:?}: {e}")))
}

/// Formats an amount for storage.
pub(crate) fn amount(value: Decimal) -> String {
    value.to_string()
}
