//! `SeaORM` Entity for the postings table.

use chrono::{DateTime, Utc};
use ledgerline_core::posting::{NewPosting, Posting};
use ledgerline_core::{LedgerError, LedgerResult};
use ledgerline_shared::types::{LedgerId, PostingId, UserId};
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

use super::{amount, parse_amount};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "postings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub ledger_id: i64,
    pub posting_date: DateTimeUtc,
    pub posted_by: i64,
    pub period_month: u32,
    pub period_year: i32,
    pub transaction_date: Date,
    pub transaction_code: String,
    pub description: Option<String>,
    pub total_debit: String,
    pub total_credit: String,
    pub total_balance: String,
    pub is_unposted: bool,
    pub unposting_date: Option<DateTimeUtc>,
    pub unposted_by: Option<i64>,
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
    #[sea_orm(has_many = "super::posting_details::Entity")]
    PostingDetails,
}

impl Related<super::general_ledgers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GeneralLedgers.def()
    }
}

impl Related<super::posting_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostingDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Posting {
    type Error = LedgerError;

    fn try_from(m: Model) -> LedgerResult<Self> {
        Ok(Self {
            id: PostingId(m.id),
            ledger_id: LedgerId(m.ledger_id),
            posting_date: m.posting_date,
            posted_by: UserId(m.posted_by),
            period_month: m.period_month,
            period_year: m.period_year,
            transaction_date: m.transaction_date,
            transaction_code: m.transaction_code,
            description: m.description,
            total_debit: parse_amount("total_debit", &m.total_debit)?,
            total_credit: parse_amount("total_credit", &m.total_credit)?,
            total_balance: parse_amount("total_balance", &m.total_balance)?,
            is_unposted: m.is_unposted,
            unposting_date: m.unposting_date,
            unposted_by: m.unposted_by.map(UserId),
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

impl ActiveModel {
    /// The header row of a fresh posting. Details are inserted once it has an id.
    pub fn for_insert(new: &NewPosting, now: DateTime<Utc>) -> Self {
        Self {
            id: NotSet,
            ledger_id: Set(new.ledger_id.0),
            posting_date: Set(new.posting_date),
            posted_by: Set(new.posted_by.0),
            period_month: Set(new.period_month),
            period_year: Set(new.period_year),
            transaction_date: Set(new.transaction_date),
            transaction_code: Set(new.transaction_code.clone()),
            description: Set(new.description.clone()),
            total_debit: Set(amount(new.total_debit)),
            total_credit: Set(amount(new.total_credit)),
            total_balance: Set(amount(new.total_balance)),
            is_unposted: Set(false),
            unposting_date: Set(None),
            unposted_by: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}
