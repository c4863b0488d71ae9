//! Ledger domain types.

use chrono::{DateTime, NaiveDate, Utc};
use ledgerline_shared::types::{JournalEntryId, LedgerId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Daily aggregate of financial movement.
///
/// `total_balance` is always `total_debit - total_credit`; the only way to
/// change the totals is [`Ledger::apply_aggregate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Ledger ID.
    pub id: LedgerId,
    /// Business date of the ledger.
    pub transaction_date: NaiveDate,
    /// 8-digit system generated code.
    pub transaction_code: String,
    /// Free text description.
    pub description: Option<String>,
    /// Sum of journal debits.
    pub total_debit: Decimal,
    /// Sum of journal credits.
    pub total_credit: Decimal,
    /// `total_debit - total_credit`.
    pub total_balance: Decimal,
    /// Running balance carried into the next date.
    pub remaining_balance: Decimal,
    /// Highest journal line id booked into the ledger. `None` while empty;
    /// an empty ledger never seeds a later date.
    pub last_entry_id: Option<JournalEntryId>,
    /// Whether the ledger is frozen by a posting.
    pub is_posted: bool,
    /// When the ledger was last posted.
    pub posting_date: Option<DateTime<Utc>>,
    /// When the ledger was last reopened by an unpost.
    pub unposting_date: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Ledger {
    /// Creates an open ledger with zeroed aggregates.
    #[must_use]
    pub fn new(
        id: LedgerId,
        transaction_date: NaiveDate,
        transaction_code: String,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            transaction_date,
            transaction_code,
            description,
            total_debit: Decimal::ZERO,
            total_credit: Decimal::ZERO,
            total_balance: Decimal::ZERO,
            remaining_balance: Decimal::ZERO,
            last_entry_id: None,
            is_posted: false,
            posting_date: None,
            unposting_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the aggregates and re-derives `total_balance`.
    ///
    /// Returns true when any value changed.
    pub fn apply_aggregate(
        &mut self,
        total_debit: Decimal,
        total_credit: Decimal,
        remaining_balance: Decimal,
        now: DateTime<Utc>,
    ) -> bool {
        let total_balance = total_debit - total_credit;
        let changed = self.total_debit != total_debit
            || self.total_credit != total_credit
            || self.total_balance != total_balance
            || self.remaining_balance != remaining_balance;

        if changed {
            self.total_debit = total_debit;
            self.total_credit = total_credit;
            self.total_balance = total_balance;
            self.remaining_balance = remaining_balance;
            self.updated_at = now;
        }
        changed
    }

    /// Freezes the ledger.
    pub fn mark_posted(&mut self, now: DateTime<Utc>) {
        self.is_posted = true;
        self.posting_date = Some(now);
        self.updated_at = now;
    }

    /// Reopens a posted ledger.
    pub fn reopen(&mut self, now: DateTime<Utc>) {
        self.is_posted = false;
        self.posting_date = None;
        self.unposting_date = Some(now);
        self.updated_at = now;
    }

    /// Returns true when `total_balance` matches the totals.
    #[must_use]
    pub fn totals_consistent(&self) -> bool {
        self.total_balance == self.total_debit - self.total_credit
    }
}

/// Raw input for creating a ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateLedgerInput {
    /// Business date, `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub transaction_date: Option<String>,
    /// Free text description.
    pub description: Option<String>,
}

/// Partial ledger update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerPatch {
    /// New business date.
    pub transaction_date: Option<String>,
    /// New description.
    pub description: Option<String>,
}
