//! Day-scoped petty cash balances.
//!
//! Unlike journal lines, petty cash balances never chain across days: every
//! date starts from zero and accumulates in id order.

use chrono::{DateTime, Utc};
use ledgerline_shared::types::PettyCashId;
use rust_decimal::Decimal;

use super::types::PettyCash;
use crate::error::{LedgerError, LedgerResult};

/// Recomputes the running balance of one day's entries.
///
/// `rows` must hold every entry of a single date. Returns the rows whose balance changed.
///
/// # Errors
///
/// Returns [`LedgerError::BalanceOverflow`] if the running balance leaves the
/// representable range.
pub fn recompute_day(rows: &mut [PettyCash], now: DateTime<Utc>) -> LedgerResult<Vec<PettyCashId>> {
    rows.sort_by_key(|r| r.id);
    let mut running = Decimal::ZERO;
    let mut changed = Vec::new();
    for row in rows.iter_mut() {
        running = running.checked_add(row.net()).ok_or(LedgerError::BalanceOverflow)?;
        if row.balance != running {
            row.balance = running;
            row.updated_at = now;
            changed.push(row.id);
        }
    }
    Ok(changed)
}
