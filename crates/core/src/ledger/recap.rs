//! Monthly recapitulation over posted ledgers.

use chrono::{Datelike, NaiveDate};
use ledgerline_shared::types::{LedgerId, is_balanced};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::Ledger;
use crate::error::{LedgerError, LedgerResult};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One posted ledger inside a recap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecapDay {
    /// Source ledger.
    pub ledger_id: LedgerId,
    /// `dd.mm.yy` label.
    pub date: String,
    /// Ledger date.
    pub transaction_date: NaiveDate,
    /// Ledger transaction code.
    pub transaction_code: String,
    /// Ledger description.
    pub description: Option<String>,
    /// Ledger total debit.
    pub debit: Decimal,
    /// Ledger total credit.
    pub credit: Decimal,
}

/// Month totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecapSummary {
    /// Sum of daily debits.
    pub total_debit: Decimal,
    /// Sum of daily credits.
    pub total_credit: Decimal,
    /// `total_debit - total_credit`.
    pub balance: Decimal,
    /// `|balance| < 0.001`.
    pub is_balanced: bool,
}

/// Posted activity of one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRecap {
    /// Year.
    pub year: i32,
    /// Month, 1-based.
    pub month: u32,
    /// English month name.
    pub month_name: String,
    /// Posted ledgers in date order.
    pub daily_entries: Vec<RecapDay>,
    /// Totals.
    pub summary: RecapSummary,
}

/// First and last day of a month.
///
/// # Errors
///
/// Returns [`LedgerError::InvalidPeriod`] for a month outside `1..=12`.
pub fn month_bounds(year: i32, month: u32) -> LedgerResult<(NaiveDate, NaiveDate)> {
    let invalid = || LedgerError::InvalidPeriod { year, month };
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let last = next.pred_opt().ok_or_else(invalid)?;
    Ok((first, last))
}

/// English name of a 1-based month.
#[must_use]
pub fn month_name(month: u32) -> Option<&'static str> {
    let idx = usize::try_from(month.checked_sub(1)?).ok()?;
    MONTH_NAMES.get(idx).copied()
}

/// Formats a date as `dd.mm.yy`.
#[must_use]
pub fn format_day(date: NaiveDate) -> String {
    date.format("%d.%m.%y").to_string()
}

/// Builds the recap from candidate ledgers.
///
/// Only posted ledgers dated inside the month are counted; the caller may pass
/// a wider set.
pub fn build_recap<'a, I>(year: i32, month: u32, ledgers: I) -> LedgerResult<MonthlyRecap>
where
    I: IntoIterator<Item = &'a Ledger>,
{
    let (first, last) = month_bounds(year, month)?;
    let name = month_name(month).ok_or(LedgerError::InvalidPeriod { year, month })?;

    let mut posted: Vec<&Ledger> = ledgers
        .into_iter()
        .filter(|l| l.is_posted && l.transaction_date >= first && l.transaction_date <= last)
        .collect();
    posted.sort_by_key(|l| (l.transaction_date, l.id));

    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;
    let mut daily_entries = Vec::with_capacity(posted.len());
    for l in posted {
        total_debit = total_debit
            .checked_add(l.total_debit)
            .ok_or(LedgerError::BalanceOverflow)?;
        total_credit = total_credit
            .checked_add(l.total_credit)
            .ok_or(LedgerError::BalanceOverflow)?;
        daily_entries.push(RecapDay {
            ledger_id: l.id,
            date: format_day(l.transaction_date),
            transaction_date: l.transaction_date,
            transaction_code: l.transaction_code.clone(),
            description: l.description.clone(),
            debit: l.total_debit,
            credit: l.total_credit,
        });
    }

    Ok(MonthlyRecap {
        year,
        month,
        month_name: name.to_string(),
        daily_entries,
        summary: RecapSummary {
            total_debit,
            total_credit,
            balance: total_debit - total_credit,
            is_balanced: is_balanced(total_debit, total_credit),
        },
    })
}

/// Returns true when `date` falls inside the given month.
#[must_use]
pub fn in_period(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}
