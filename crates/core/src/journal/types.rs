//! Journal domain types.

use chrono::{DateTime, NaiveDate, Utc};
use ledgerline_shared::types::{AccountId, JournalEntryId, LedgerId, PettyCashId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One debit or credit line inside a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Entry ID.
    pub id: JournalEntryId,
    /// Owning ledger.
    pub ledger_id: LedgerId,
    /// Account the line is booked against.
    pub account_id: AccountId,
    /// Free text description.
    pub description: Option<String>,
    /// Business date of the line.
    pub transaction_date: NaiveDate,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Running balance after this line.
    pub balance: Decimal,
    /// Petty cash row this line was converted from.
    pub petty_cash_id: Option<PettyCashId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Net movement of the line.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.debit - self.credit
    }

    /// Ordering key inside a ledger.
    #[must_use]
    pub fn sort_key(&self) -> (NaiveDate, JournalEntryId) {
        (self.transaction_date, self.id)
    }
}

/// Raw input for creating a journal line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateJournalEntryInput {
    /// Owning ledger.
    pub ledger_id: Option<LedgerId>,
    /// Account.
    pub account_id: Option<AccountId>,
    /// `YYYY-MM-DD` or RFC 3339 timestamp.
    pub transaction_date: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Debit amount, zero when absent.
    pub debit: Option<Decimal>,
    /// Credit amount, zero when absent.
    pub credit: Option<Decimal>,
}

/// A validated line ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJournalEntry {
    /// Owning ledger.
    pub ledger_id: LedgerId,
    /// Account.
    pub account_id: AccountId,
    /// Business date.
    pub transaction_date: NaiveDate,
    /// Description.
    pub description: Option<String>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Source petty cash row, if converted.
    pub petty_cash_id: Option<PettyCashId>,
}

impl NewJournalEntry {
    /// Materializes the line with a zero balance; the cascade fills it in.
    #[must_use]
    pub fn into_entry(self, id: JournalEntryId, now: DateTime<Utc>) -> JournalEntry {
        JournalEntry {
            id,
            ledger_id: self.ledger_id,
            account_id: self.account_id,
            description: self.description,
            transaction_date: self.transaction_date,
            debit: self.debit,
            credit: self.credit,
            balance: Decimal::ZERO,
            petty_cash_id: self.petty_cash_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a journal line. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalEntryPatch {
    /// Move the line to another ledger.
    pub ledger_id: Option<LedgerId>,
    /// New account.
    pub account_id: Option<AccountId>,
    /// New business date.
    pub transaction_date: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New debit amount.
    pub debit: Option<Decimal>,
    /// New credit amount.
    pub credit: Option<Decimal>,
}

impl JournalEntryPatch {
    /// Returns true when the patch carries no field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ledger_id.is_none()
            && self.account_id.is_none()
            && self.transaction_date.is_none()
            && self.description.is_none()
            && self.debit.is_none()
            && self.credit.is_none()
    }
}

/// A patch addressed to one line, used by batch updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntryUpdate {
    /// Target line.
    pub id: JournalEntryId,
    /// Fields to change.
    #[serde(flatten)]
    pub patch: JournalEntryPatch,
}

/// Merge of creates and updates for one ledger and date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileDayInput {
    /// Target ledger.
    pub ledger_id: Option<LedgerId>,
    /// Day being reconciled. Creates without a date use it.
    pub transaction_date: Option<String>,
    /// Lines to add.
    #[serde(default)]
    pub creates: Vec<CreateJournalEntryInput>,
    /// Lines to change. Each must belong to the ledger.
    #[serde(default)]
    pub updates: Vec<JournalEntryUpdate>,
}
