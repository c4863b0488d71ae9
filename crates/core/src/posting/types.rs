//! Posting domain types.

use chrono::{DateTime, NaiveDate, Utc};
use ledgerline_shared::types::{
    AccountId, JournalEntryId, LedgerId, PostingDetailId, PostingId, UserId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a ledger with respect to posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostingState {
    /// Never posted; entries are editable.
    Open,
    /// Frozen by an active posting.
    Posted,
    /// Reopened by a bulk unpost; editable again, history retained.
    Unposted,
}

impl PostingState {
    /// Returns true if entries of the ledger may change.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        !matches!(self, Self::Posted)
    }
}

/// Immutable snapshot of a ledger at freeze time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Posting ID.
    pub id: PostingId,
    /// Frozen ledger.
    pub ledger_id: LedgerId,
    /// When the freeze happened.
    pub posting_date: DateTime<Utc>,
    /// Who froze it.
    pub posted_by: UserId,
    /// Month of the ledger date.
    pub period_month: u32,
    /// Year of the ledger date.
    pub period_year: i32,
    /// Ledger date at freeze time.
    pub transaction_date: NaiveDate,
    /// Ledger code at freeze time.
    pub transaction_code: String,
    /// Ledger description at freeze time.
    pub description: Option<String>,
    /// Ledger total debit at freeze time.
    pub total_debit: Decimal,
    /// Ledger total credit at freeze time.
    pub total_credit: Decimal,
    /// Ledger total balance at freeze time.
    pub total_balance: Decimal,
    /// Whether a bulk unpost reversed this posting.
    pub is_unposted: bool,
    /// When it was reversed.
    pub unposting_date: Option<DateTime<Utc>>,
    /// Who reversed it.
    pub unposted_by: Option<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Immutable snapshot of one journal line at freeze time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingDetail {
    /// Detail ID.
    pub id: PostingDetailId,
    /// Owning posting.
    pub posting_id: PostingId,
    /// Source journal line.
    pub journal_entry_id: JournalEntryId,
    /// Account of the line.
    pub account_id: AccountId,
    /// Line description.
    pub description: Option<String>,
    /// Line date.
    pub transaction_date: NaiveDate,
    /// Debit.
    pub debit: Decimal,
    /// Credit.
    pub credit: Decimal,
    /// Running balance.
    pub balance: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Snapshot of a ledger ready to be stored as a posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPosting {
    /// Frozen ledger.
    pub ledger_id: LedgerId,
    /// When the freeze happened.
    pub posting_date: DateTime<Utc>,
    /// Who froze it.
    pub posted_by: UserId,
    /// Month of the ledger date.
    pub period_month: u32,
    /// Year of the ledger date.
    pub period_year: i32,
    /// Ledger date at freeze time.
    pub transaction_date: NaiveDate,
    /// Ledger code at freeze time.
    pub transaction_code: String,
    /// Ledger description at freeze time.
    pub description: Option<String>,
    /// Ledger total debit at freeze time.
    pub total_debit: Decimal,
    /// Ledger total credit at freeze time.
    pub total_credit: Decimal,
    /// Ledger total balance at freeze time.
    pub total_balance: Decimal,
    /// Lines in `(transaction_date, id)` order.
    pub details: Vec<NewPostingDetail>,
}

/// Snapshot of one journal line, stored once its posting has an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPostingDetail {
    /// Source journal line.
    pub journal_entry_id: JournalEntryId,
    /// Account of the line.
    pub account_id: AccountId,
    /// Line description.
    pub description: Option<String>,
    /// Line date.
    pub transaction_date: NaiveDate,
    /// Debit.
    pub debit: Decimal,
    /// Credit.
    pub credit: Decimal,
    /// Running balance.
    pub balance: Decimal,
}

/// Filters for listing postings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostingFilter {
    /// Period month.
    pub month: Option<u32>,
    /// Period year.
    pub year: Option<i32>,
    /// Reversed postings only when true. Defaults to active postings.
    pub is_unposted: Option<bool>,
}

/// Result of a bulk unpost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnpostSummary {
    /// Period month.
    pub month: u32,
    /// Period year.
    pub year: i32,
    /// Number of postings reversed.
    pub count: usize,
    /// Ledgers reopened.
    pub ledger_ids: Vec<LedgerId>,
}
