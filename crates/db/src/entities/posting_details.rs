//! `SeaORM` Entity for the posting_details table.

use chrono::{DateTime, Utc};
use ledgerline_core::posting::{NewPostingDetail, PostingDetail};
use ledgerline_core::{LedgerError, LedgerResult};
use ledgerline_shared::types::{AccountId, JournalEntryId, PostingDetailId, PostingId};
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

use super::{amount, parse_amount};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "posting_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub posting_id: i64,
    pub journal_entry_id: i64,
    pub account_id: i64,
    pub description: Option<String>,
    pub transaction_date: Date,
    pub debit: String,
    pub credit: String,
    pub balance: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::postings::Entity",
        from = "Column::PostingId",
        to = "super::postings::Column::Id"
    )]
    Postings,
}

impl Related<super::postings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Postings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for PostingDetail {
    type Error = LedgerError;

    fn try_from(m: Model) -> LedgerResult<Self> {
        Ok(Self {
            id: PostingDetailId(m.id),
            posting_id: PostingId(m.posting_id),
            journal_entry_id: JournalEntryId(m.journal_entry_id),
            account_id: AccountId(m.account_id),
            description: m.description,
            transaction_date: m.transaction_date,
            debit: parse_amount("debit", &m.debit)?,
            credit: parse_amount("credit", &m.credit)?,
            balance: parse_amount("balance", &m.balance)?,
            created_at: m.created_at,
        })
    }
}

impl ActiveModel {
    /// A line snapshot under an inserted posting.
    pub fn for_insert(posting_id: PostingId, new: NewPostingDetail, now: DateTime<Utc>) -> Self {
        Self {
            id: NotSet,
            posting_id: Set(posting_id.0),
            journal_entry_id: Set(new.journal_entry_id.0),
            account_id: Set(new.account_id.0),
            description: Set(new.description),
            transaction_date: Set(new.transaction_date),
            debit: Set(amount(new.debit)),
            credit: Set(amount(new.credit)),
            balance: Set(amount(new.balance)),
            created_at: Set(now),
        }
    }
}
