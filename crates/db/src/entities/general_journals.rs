//! `SeaORM` Entity for the general_journals table.

use chrono::{DateTime, Utc};
use ledgerline_core::journal::{JournalEntry, NewJournalEntry};
use ledgerline_core::{LedgerError, LedgerResult};
use ledgerline_shared::types::{AccountId, JournalEntryId, LedgerId, PettyCashId};
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

use super::{amount, parse_amount};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "general_journals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub ledger_id: i64,
    pub account_id: i64,
    pub description: Option<String>,
    pub transaction_date: Date,
    pub debit: String,
    pub credit: String,
    pub balance: String,
    pub petty_cash_id: Option<i64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::general_ledgers::Entity",
        from = "Column::LedgerId",
        to = "super::general_ledgers::Column::Id"
    )]
    GeneralLedgers,
}

impl Related<super::general_ledgers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneralLedgers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for JournalEntry {
    type Error = LedgerError;

    fn try_from(m: Model) -> LedgerResult<Self> {
        Ok(Self {
            id: JournalEntryId(m.id),
            ledger_id: LedgerId(m.ledger_id),
            account_id: AccountId(m.account_id),
            description: m.description,
            transaction_date: m.transaction_date,
            debit: parse_amount("debit", &m.debit)?,
            credit: parse_amount("credit", &m.credit)?,
            balance: parse_amount("balance", &m.balance)?,
            petty_cash_id: m.petty_cash_id.map(PettyCashId),
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

impl From<&JournalEntry> for ActiveModel {
    fn from(e: &JournalEntry) -> Self {
        Self {
            id: Set(e.id.0),
            ledger_id: Set(e.ledger_id.0),
            account_id: Set(e.account_id.0),
            description: Set(e.description.clone()),
            transaction_date: Set(e.transaction_date),
            debit: Set(amount(e.debit)),
            credit: Set(amount(e.credit)),
            balance: Set(amount(e.balance)),
            petty_cash_id: Set(e.petty_cash_id.map(|id| id.0)),
            created_at: Set(e.created_at),
            updated_at: Set(e.updated_at),
        }
    }
}

impl ActiveModel {
    /// A new line with a zero balance; the cascade fills it in.
    pub fn for_insert(new: NewJournalEntry, now: DateTime<Utc>) -> Self {
        let draft = new.into_entry(JournalEntryId(0), now);
        Self {
            id: NotSet,
            ..Self::from(&draft)
        }
    }
}
