//! Posting state machine.
//!
//! Open -> Posted by [`create_posting`], Posted -> Unposted by [`unpost`].
//! Postings and their details are append-only; an unpost only stamps
//! reversal metadata.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use ledgerline_shared::types::UserId;

use super::types::{NewPosting, NewPostingDetail, Posting, PostingState};
use crate::error::{LedgerError, LedgerResult};
use crate::journal::JournalEntry;
use crate::ledger::Ledger;

/// Month and year a ledger date belongs to.
#[must_use]
pub fn period_of(date: NaiveDate) -> (u32, i32) {
    (date.month(), date.year())
}

/// Derives the state of a ledger.
#[must_use]
pub fn state_of(ledger: &Ledger) -> PostingState {
    if ledger.is_posted {
        PostingState::Posted
    } else if ledger.unposting_date.is_some() {
        PostingState::Unposted
    } else {
        PostingState::Open
    }
}

/// Fails unless the ledger is editable.
pub fn ensure_editable(ledger: &Ledger) -> LedgerResult<()> {
    if state_of(ledger).is_editable() {
        Ok(())
    } else {
        Err(LedgerError::LedgerPosted(ledger.id))
    }
}

/// Fails unless the ledger can be posted.
///
/// # Errors
///
/// - [`LedgerError::AlreadyPosted`] if the ledger is posted
/// - [`LedgerError::NoJournalEntries`] if it has no lines
pub fn check_postable(ledger: &Ledger, entry_count: usize) -> LedgerResult<()> {
    if ledger.is_posted {
        return Err(LedgerError::AlreadyPosted(ledger.id));
    }
    if entry_count == 0 {
        return Err(LedgerError::NoJournalEntries(ledger.id));
    }
    Ok(())
}

/// Snapshots a ledger and its lines and freezes the ledger.
///
/// # Errors
///
/// Fails as [`check_postable`] does.
pub fn create_posting(
    ledger: &mut Ledger,
    entries: &[JournalEntry],
    posted_by: UserId,
    now: DateTime<Utc>,
) -> LedgerResult<NewPosting> {
    check_postable(ledger, entries.len())?;
    let (period_month, period_year) = period_of(ledger.transaction_date);

    let mut ordered: Vec<&JournalEntry> = entries.iter().collect();
    ordered.sort_by_key(|e| e.sort_key());
    let details = ordered
        .into_iter()
        .map(|e| NewPostingDetail {
            journal_entry_id: e.id,
            account_id: e.account_id,
            description: e.description.clone(),
            transaction_date: e.transaction_date,
            debit: e.debit,
            credit: e.credit,
            balance: e.balance,
        })
        .collect();

    let posting = NewPosting {
        ledger_id: ledger.id,
        posting_date: now,
        posted_by,
        period_month,
        period_year,
        transaction_date: ledger.transaction_date,
        transaction_code: ledger.transaction_code.clone(),
        description: ledger.description.clone(),
        total_debit: ledger.total_debit,
        total_credit: ledger.total_credit,
        total_balance: ledger.total_balance,
        details,
    };

    ledger.mark_posted(now);
    Ok(posting)
}

/// Stamps reversal metadata on a posting.
pub fn unpost(posting: &mut Posting, unposted_by: UserId, now: DateTime<Utc>) {
    posting.is_unposted = true;
    posting.unposting_date = Some(now);
    posting.unposted_by = Some(unposted_by);
    posting.updated_at = now;
}

/// Validates an unpost period.
pub fn validate_period(month: u32, year: i32) -> LedgerResult<()> {
    if (1..=12).contains(&month) && NaiveDate::from_ymd_opt(year, month, 1).is_some() {
        Ok(())
    } else {
        Err(LedgerError::InvalidPeriod { year, month })
    }
}
