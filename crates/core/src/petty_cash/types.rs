//! Petty cash domain types.

use chrono::{DateTime, NaiveDate, Utc};
use ledgerline_shared::types::{AccountId, LedgerId, PettyCashId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Informal cash movement awaiting approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PettyCash {
    /// Entry ID.
    pub id: PettyCashId,
    /// Ledger that received the converted journal line; set on approval.
    pub ledger_id: Option<LedgerId>,
    /// Account the cash moved against.
    pub account_id: AccountId,
    /// User responsible for the entry.
    pub user_id: UserId,
    /// Free text description.
    pub description: Option<String>,
    /// Business date.
    pub transaction_date: NaiveDate,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Running balance within the day, restarting at zero each date.
    pub balance: Decimal,
    /// Whether the entry was converted into a journal line.
    pub is_approved: bool,
    /// Day of approval.
    pub approved_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl PettyCash {
    /// Net movement of the entry.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// Raw input for creating a petty cash entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePettyCashInput {
    /// Account.
    pub account_id: Option<AccountId>,
    /// Responsible user.
    pub user_id: Option<UserId>,
    /// `YYYY-MM-DD` or RFC 3339 timestamp.
    pub transaction_date: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Debit amount.
    pub debit: Option<Decimal>,
    /// Credit amount.
    pub credit: Option<Decimal>,
}

/// A validated petty cash entry ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPettyCash {
    /// Account.
    pub account_id: AccountId,
    /// Responsible user.
    pub user_id: UserId,
    /// Business date.
    pub transaction_date: NaiveDate,
    /// Description.
    pub description: Option<String>,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

impl NewPettyCash {
    /// Materializes the entry unapproved with a zero balance.
    #[must_use]
    pub fn into_petty_cash(self, id: PettyCashId, now: DateTime<Utc>) -> PettyCash {
        PettyCash {
            id,
            ledger_id: None,
            account_id: self.account_id,
            user_id: self.user_id,
            description: self.description,
            transaction_date: self.transaction_date,
            debit: self.debit,
            credit: self.credit,
            balance: Decimal::ZERO,
            is_approved: false,
            approved_date: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a petty cash entry. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PettyCashPatch {
    /// New account.
    pub account_id: Option<AccountId>,
    /// New responsible user.
    pub user_id: Option<UserId>,
    /// New business date.
    pub transaction_date: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New debit.
    pub debit: Option<Decimal>,
    /// New credit.
    pub credit: Option<Decimal>,
}

impl PettyCashPatch {
    /// Returns true when the patch carries no field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.account_id.is_none()
            && self.user_id.is_none()
            && self.transaction_date.is_none()
            && self.description.is_none()
            && self.debit.is_none()
            && self.credit.is_none()
    }
}
