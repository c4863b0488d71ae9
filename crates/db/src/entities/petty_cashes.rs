//! `SeaORM` Entity for the petty_cashes table.

use chrono::{DateTime, Utc};
use ledgerline_core::petty_cash::{NewPettyCash, PettyCash};
use ledgerline_core::{LedgerError, LedgerResult};
use ledgerline_shared::types::{AccountId, LedgerId, PettyCashId, UserId};
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

use super::{amount, parse_amount};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "petty_cashes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub ledger_id: Option<i64>,
    pub account_id: i64,
    pub user_id: i64,
    pub description: Option<String>,
    pub transaction_date: Date,
    pub debit: String,
    pub credit: String,
    pub balance: String,
    pub is_approved: bool,
    pub approved_date: Option<Date>,
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

impl TryFrom<Model> for PettyCash {
    type Error = LedgerError;

    fn try_from(m: Model) -> LedgerResult<Self> {
        Ok(Self {
            id: PettyCashId(m.id),
            ledger_id: m.ledger_id.map(LedgerId),
            account_id: AccountId(m.account_id),
            user_id: UserId(m.user_id),
            description: m.description,
            transaction_date: m.transaction_date,
            debit: parse_amount("debit", &m.debit)?,
            credit: parse_amount("credit", &m.credit)?,
            balance: parse_amount("balance", &m.balance)?,
            is_approved: m.is_approved,
            approved_date: m.approved_date,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

impl From<&PettyCash> for ActiveModel {
    fn from(p: &PettyCash) -> Self {
        Self {
            id: Set(p.id.0),
            ledger_id: Set(p.ledger_id.map(|id| id.0)),
            account_id: Set(p.account_id.0),
            user_id: Set(p.user_id.0),
            description: Set(p.description.clone()),
            transaction_date: Set(p.transaction_date),
            debit: Set(amount(p.debit)),
            credit: Set(amount(p.credit)),
            balance: Set(amount(p.balance)),
            is_approved: Set(p.is_approved),
            approved_date: Set(p.approved_date),
            created_at: Set(p.created_at),
            updated_at: Set(p.updated_at),
        }
    }
}

impl ActiveModel {
    /// A new unapproved entry with a zero balance; the day rebalance fills it in.
    pub fn for_insert(new: NewPettyCash, now: DateTime<Utc>) -> Self {
        let draft = new.into_petty_cash(PettyCashId(0), now);
        Self {
            id: NotSet,
            ..Self::from(&draft)
        }
    }
}
