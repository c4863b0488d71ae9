//! Single-row lookups shared by the repositories.
//!
//! Generic over the connection so a mutation reads through its own
//! transaction.

use ledgerline_core::journal::JournalEntry;
use ledgerline_core::ledger::Ledger;
use ledgerline_core::petty_cash::PettyCash;
use ledgerline_core::{LedgerError, LedgerResult};
use ledgerline_shared::types::{JournalEntryId, LedgerId, PettyCashId};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::entities::{general_journals, general_ledgers, petty_cashes};
use crate::error::db_error;

pub(crate) async fn ledger<C: ConnectionTrait>(conn: &C, id: LedgerId) -> LedgerResult<Ledger> {
    general_ledgers::Entity::find_by_id(id.0)
        .one(conn)
        .await
        .map_err(db_error)?
        .ok_or(LedgerError::LedgerNotFound(id))?
        .try_into()
}

pub(crate) async fn journal<C: ConnectionTrait>(
    conn: &C,
    id: JournalEntryId,
) -> LedgerResult<JournalEntry> {
    general_journals::Entity::find_by_id(id.0)
        .one(conn)
        .await
        .map_err(db_error)?
        .ok_or(LedgerError::JournalEntryNotFound(id))?
        .try_into()
}

/// Lines in the order of `ids`.
pub(crate) async fn journals<C: ConnectionTrait>(
    conn: &C,
    ids: &[JournalEntryId],
) -> LedgerResult<Vec<JournalEntry>> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        out.push(journal(conn, *id).await?);
    }
    Ok(out)
}

pub(crate) async fn petty_cash<C: ConnectionTrait>(
    conn: &C,
    id: PettyCashId,
) -> LedgerResult<PettyCash> {
    petty_cashes::Entity::find_by_id(id.0)
        .one(conn)
        .await
        .map_err(db_error)?
        .ok_or(LedgerError::PettyCashNotFound(id))?
        .try_into()
}

/// Every petty cash row dated `date`.
pub(crate) async fn petty_cash_on<C: ConnectionTrait>(
    conn: &C,
    date: chrono::NaiveDate,
) -> LedgerResult<Vec<PettyCash>> {
    petty_cashes::Entity::find()
        .filter(petty_cashes::Column::TransactionDate.eq(date))
        .all(conn)
        .await
        .map_err(db_error)?
        .into_iter()
        .map(PettyCash::try_from)
        .collect()
}
