//! `SeaORM` Entity for the general_ledgers table.

use chrono::{DateTime, NaiveDate, Utc};
use ledgerline_core::ledger::Ledger;
use ledgerline_core::{LedgerError, LedgerResult};
use ledgerline_shared::types::{JournalEntryId, LedgerId};
use sea_orm::{NotSet, Set};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{amount, parse_amount};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "general_ledgers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub transaction_date: Date,
    #[sea_orm(unique)]
    pub transaction_code: String,
    pub description: Option<String>,
    pub total_debit: String,
    pub total_credit: String,
    pub total_balance: String,
    pub remaining_balance: String,
    pub last_entry_id: Option<i64>,
    pub is_posted: bool,
    pub posting_date: Option<DateTimeUtc>,
    pub unposting_date: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::general_journals::Entity")]
    GeneralJournals,
    #[sea_orm(has_many = "super::petty_cashes::Entity")]
    PettyCashes,
    #[sea_orm(has_many = "super::postings::Entity")]
    Postings,
}

impl Related<super::general_journals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneralJournals.def()
    }
}

impl Related<super::petty_cashes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PettyCashes.def()
    }
}

impl Related<super::postings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Postings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Ledger {
    type Error = LedgerError;

    fn try_from(m: Model) -> LedgerResult<Self> {
        Ok(Self {
            id: LedgerId(m.id),
            transaction_date: m.transaction_date,
            transaction_code: m.transaction_code,
            description: m.description,
            total_debit: parse_amount("total_debit", &m.total_debit)?,
            total_credit: parse_amount("total_credit", &m.total_credit)?,
            total_balance: parse_amount("total_balance", &m.total_balance)?,
            remaining_balance: parse_amount("remaining_balance", &m.remaining_balance)?,
            last_entry_id: m.last_entry_id.map(JournalEntryId),
            is_posted: m.is_posted,
            posting_date: m.posting_date,
            unposting_date: m.unposting_date,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

impl From<&Ledger> for ActiveModel {
    fn from(l: &Ledger) -> Self {
        Self {
            id: Set(l.id.0),
            transaction_date: Set(l.transaction_date),
            transaction_code: Set(l.transaction_code.clone()),
            description: Set(l.description.clone()),
            total_debit: Set(amount(l.total_debit)),
            total_credit: Set(amount(l.total_credit)),
            total_balance: Set(amount(l.total_balance)),
            remaining_balance: Set(amount(l.remaining_balance)),
            last_entry_id: Set(l.last_entry_id.map(|id| id.0)),
            is_posted: Set(l.is_posted),
            posting_date: Set(l.posting_date),
            unposting_date: Set(l.unposting_date),
            created_at: Set(l.created_at),
            updated_at: Set(l.updated_at),
        }
    }
}

impl ActiveModel {
    /// An open ledger with zero totals; the cascade seeds its remaining balance.
    pub fn for_insert(
        transaction_date: NaiveDate,
        transaction_code: String,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let draft = Ledger::new(LedgerId(0), transaction_date, transaction_code, description, now);
        Self {
            id: NotSet,
            ..Self::from(&draft)
        }
    }
}
