//! Posting report aggregation.

use chrono::{DateTime, NaiveDate, Utc};
use ledgerline_shared::types::{LedgerId, PostingId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::Posting;
use crate::error::{LedgerError, LedgerResult};

/// One posting joined with its ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingRow {
    /// Posting ID.
    pub id: PostingId,
    /// Ledger ID.
    pub ledger_id: LedgerId,
    /// Ledger date.
    pub transaction_date: NaiveDate,
    /// Ledger code.
    pub transaction_code: String,
    /// Ledger description.
    pub description: Option<String>,
    /// Frozen total debit.
    pub total_debit: Decimal,
    /// Frozen total credit.
    pub total_credit: Decimal,
    /// Frozen total balance.
    pub total_balance: Decimal,
    /// When posted.
    pub posting_date: DateTime<Utc>,
    /// Who posted.
    pub posted_by: UserId,
    /// Whether reversed.
    pub is_unposted: bool,
    /// When reversed.
    pub unposting_date: Option<DateTime<Utc>>,
    /// Who reversed.
    pub unposted_by: Option<UserId>,
}

impl From<&Posting> for PostingRow {
    fn from(p: &Posting) -> Self {
        Self {
            id: p.id,
            ledger_id: p.ledger_id,
            transaction_date: p.transaction_date,
            transaction_code: p.transaction_code.clone(),
            description: p.description.clone(),
            total_debit: p.total_debit,
            total_credit: p.total_credit,
            total_balance: p.total_balance,
            posting_date: p.posting_date,
            posted_by: p.posted_by,
            is_unposted: p.is_unposted,
            unposting_date: p.unposting_date,
            unposted_by: p.unposted_by,
        }
    }
}

/// Totals over a period's postings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Number of postings.
    pub total_count: usize,
    /// Sum of frozen debits.
    pub total_debit: Decimal,
    /// Sum of frozen credits.
    pub total_credit: Decimal,
    /// Sum of frozen balances.
    pub total_balance: Decimal,
    /// Active postings.
    pub posted_count: usize,
    /// Reversed postings.
    pub unposted_count: usize,
}

/// Posting report for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingReport {
    /// Period month.
    pub month: u32,
    /// Period year.
    pub year: i32,
    /// Every posting of the period, active and reversed, by ledger date.
    pub transactions: Vec<PostingRow>,
    /// Totals.
    pub summary: ReportSummary,
}

/// Aggregates a period's postings.
///
/// # Errors
///
/// Returns [`LedgerError::BalanceOverflow`] if a total leaves the
/// representable range.
pub fn build_report<'a, I>(month: u32, year: i32, postings: I) -> LedgerResult<PostingReport>
where
    I: IntoIterator<Item = &'a Posting>,
{
    let mut transactions: Vec<PostingRow> = postings
        .into_iter()
        .filter(|p| p.period_month == month && p.period_year == year)
        .map(PostingRow::from)
        .collect();
    transactions.sort_by_key(|r| (r.transaction_date, r.id));

    let mut summary = ReportSummary {
        total_count: transactions.len(),
        ..ReportSummary::default()
    };
    for row in &transactions {
        summary.total_debit = checked_sum(summary.total_debit, row.total_debit)?;
        summary.total_credit = checked_sum(summary.total_credit, row.total_credit)?;
        summary.total_balance = checked_sum(summary.total_balance, row.total_balance)?;
        if row.is_unposted {
            summary.unposted_count += 1;
        } else {
            summary.posted_count += 1;
        }
    }

    Ok(PostingReport {
        month,
        year,
        transactions,
        summary,
    })
}

fn checked_sum(lhs: Decimal, rhs: Decimal) -> LedgerResult<Decimal> {
    lhs.checked_add(rhs).ok_or(LedgerError::BalanceOverflow)
}
