//! Loads the cascade scope from the database, runs the recompute pass and
//! writes the changes back.
//!
//! Only the seed row, the ledgers dated on or after the boundary and the
//! entries of the ledgers in scope are read.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use ledgerline_core::journal::{CascadeOutcome, CascadePlan, JournalEntry, LedgerSlice, recompute};
use ledgerline_core::ledger::{Ledger, TimelineIndex};
use ledgerline_core::LedgerResult;
use ledgerline_shared::types::LedgerId;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;

use crate::entities::{amount, general_journals, general_ledgers};
use crate::error::db_error;

// Keeps `IN (..)` lists under SQLite's bound-parameter limit.
const ID_CHUNK: usize = 500;

/// Remaining balance carried into `date`.
///
/// The latest earlier date that has a ledger with lines wins; on that date the
/// ledger holding the most recent line wins.
pub(crate) async fn seed_before<C: ConnectionTrait>(conn: &C, date: NaiveDate) -> LedgerResult<Decimal> {
    Ok(seed_row(conn, date)
        .await?
        .map_or(Decimal::ZERO, |ledger| ledger.remaining_balance))
}

async fn seed_row<C: ConnectionTrait>(conn: &C, date: NaiveDate) -> LedgerResult<Option<Ledger>> {
    general_ledgers::Entity::find()
        .filter(general_ledgers::Column::TransactionDate.lt(date))
        .filter(general_ledgers::Column::LastEntryId.is_not_null())
        .order_by_desc(general_ledgers::Column::TransactionDate)
        .order_by_desc(general_ledgers::Column::LastEntryId)
        .one(conn)
        .await
        .map_err(db_error)?
        .map(Ledger::try_from)
        .transpose()
}

pub(crate) async fn run(
    txn: &DatabaseTransaction,
    plan: &CascadePlan,
    now: DateTime<Utc>,
) -> LedgerResult<CascadeOutcome> {
    let Some(boundary) = plan.boundary() else {
        return Ok(CascadeOutcome::default());
    };

    let mut timeline = TimelineIndex::new();
    if let Some(seed) = seed_row(txn, boundary).await? {
        timeline.upsert(seed.transaction_date, seed.id, seed.remaining_balance, seed.last_entry_id);
    }

    let mut ledgers: HashMap<LedgerId, Ledger> = HashMap::new();
    let rows = general_ledgers::Entity::find()
        .filter(general_ledgers::Column::TransactionDate.gte(boundary))
        .order_by_asc(general_ledgers::Column::TransactionDate)
        .order_by_asc(general_ledgers::Column::Id)
        .all(txn)
        .await
        .map_err(db_error)?;
    for row in rows {
        let ledger = Ledger::try_from(row)?;
        timeline.upsert(ledger.transaction_date, ledger.id, ledger.remaining_balance, ledger.last_entry_id);
        ledgers.insert(ledger.id, ledger);
    }

    let scope = plan.scope(&timeline);
    let mut entries = load_entries(txn, &scope).await?;
    let mut slices: Vec<LedgerSlice> = scope
        .iter()
        .filter_map(|id| ledgers.remove(id))
        .map(|ledger| {
            let lines = entries.remove(&ledger.id).unwrap_or_default();
            LedgerSlice::new(ledger, lines)
        })
        .collect();

    let outcome = recompute(&mut timeline, &mut slices, plan, now)?;
    write_back(txn, slices, &outcome).await?;

    debug!(
        boundary = %boundary,
        ledgers = outcome.ledgers_recomputed,
        entries = outcome.entries_recomputed,
        changed_entries = outcome.changed_entries.len(),
        "Balance cascade applied"
    );
    Ok(outcome)
}

async fn load_entries(
    txn: &DatabaseTransaction,
    scope: &[LedgerId],
) -> LedgerResult<HashMap<LedgerId, Vec<JournalEntry>>> {
    let mut grouped: HashMap<LedgerId, Vec<JournalEntry>> = HashMap::with_capacity(scope.len());
    for chunk in scope.chunks(ID_CHUNK) {
        let rows = general_journals::Entity::find()
            .filter(general_journals::Column::LedgerId.is_in(chunk.iter().map(|id| id.0)))
            .order_by_asc(general_journals::Column::TransactionDate)
            .order_by_asc(general_journals::Column::Id)
            .all(txn)
            .await
            .map_err(db_error)?;
        for row in rows {
            let entry = JournalEntry::try_from(row)?;
            grouped.entry(entry.ledger_id).or_default().push(entry);
        }
    }
    Ok(grouped)
}

async fn write_back(
    txn: &DatabaseTransaction,
    slices: Vec<LedgerSlice>,
    outcome: &CascadeOutcome,
) -> LedgerResult<()> {
    let changed_entries: HashSet<_> = outcome.changed_entries.iter().copied().collect();
    let changed_ledgers: HashSet<_> = outcome.changed_ledgers.iter().copied().collect();

    for slice in slices {
        for entry in slice.entries.iter().filter(|e| changed_entries.contains(&e.id)) {
            general_journals::ActiveModel {
                id: Set(entry.id.0),
                balance: Set(amount(entry.balance)),
                updated_at: Set(entry.updated_at),
                ..Default::default()
            }
            .update(txn)
            .await
            .map_err(db_error)?;
        }
        if changed_ledgers.contains(&slice.ledger.id) {
            general_ledgers::ActiveModel::from(&slice.ledger)
                .update(txn)
                .await
                .map_err(db_error)?;
        }
    }
    Ok(())
}
