//! Journal repository.
//!
//! Every mutation loads what it needs, applies its writes, and runs one
//! cascade pass inside the same transaction before committing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ledgerline_core::journal::validation::{ValidatedPatch, ensure_distinct, require_date};
use ledgerline_core::journal::{
    CascadePlan, CreateJournalEntryInput, JournalEntry, JournalEntryPatch,
    JournalEntryUpdate, NewJournalEntry, ReconcileDayInput, validate_new_entry, validate_patch,
    validate_reconcile_entry,
};
use ledgerline_core::ledger::Ledger;
use ledgerline_core::posting::ensure_editable;
use ledgerline_core::{LedgerError, LedgerResult};
use ledgerline_shared::types::{AccountId, JournalEntryId, LedgerId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{cascade, fetch};
use crate::clock::Clock;
use crate::directory::Directories;
use crate::entities::general_journals;
use crate::error::db_error;

/// Outcome of a reconcile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileResult {
    /// The reconciled ledger after the cascade.
    pub ledger: Ledger,
    /// Lines added.
    pub created: Vec<JournalEntry>,
    /// Lines changed.
    pub updated: Vec<JournalEntry>,
    /// Ledgers visited by the cascade.
    pub ledgers_recomputed: usize,
    /// Lines whose balance was re-derived.
    pub entries_recomputed: usize,
}

/// Repository for journal line operations.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
    directories: Directories,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, clock: Arc<dyn Clock>, directories: Directories) -> Self {
        Self {
            db,
            clock,
            directories,
        }
    }

    /// Adds one line and cascades from its date.
    ///
    /// # Errors
    ///
    /// - Validation errors for missing fields or both sides nonzero
    /// - `LedgerNotFound` / `AccountNotFound` for unknown references
    /// - `LedgerPosted` if the ledger or any later posted ledger would change
    pub async fn create(&self, input: CreateJournalEntryInput) -> LedgerResult<JournalEntry> {
        let new = validate_new_entry(input)?;
        self.directories.require_account(new.account_id).await?;
        let now = self.clock.now();

        let txn = self.db.begin().await.map_err(db_error)?;
        let mut plan = CascadePlan::new();
        let id = insert_entry(&txn, &mut plan, new, now).await?;
        let outcome = cascade::run(&txn, &plan, now).await?;
        let entry = fetch::journal(&txn, id).await?;
        txn.commit().await.map_err(db_error)?;

        info!(
            entry_id = %entry.id,
            ledger_id = %entry.ledger_id,
            balance = %entry.balance,
            ledgers_recomputed = outcome.ledgers_recomputed,
            "General Journal entry created"
        );
        Ok(entry)
    }

    /// Adds several lines in one transaction with a single cascade pass.
    pub async fn create_batch(
        &self,
        inputs: Vec<CreateJournalEntryInput>,
    ) -> LedgerResult<Vec<JournalEntry>> {
        if inputs.is_empty() {
            return Err(LedgerError::EmptyBatch);
        }
        let entries = inputs
            .into_iter()
            .map(validate_new_entry)
            .collect::<LedgerResult<Vec<_>>>()?;
        self.require_accounts(entries.iter().map(|e| e.account_id))
            .await?;
        let now = self.clock.now();

        let txn = self.db.begin().await.map_err(db_error)?;
        let mut plan = CascadePlan::new();
        let mut ids = Vec::with_capacity(entries.len());
        for new in entries {
            ids.push(insert_entry(&txn, &mut plan, new, now).await?);
        }
        let outcome = cascade::run(&txn, &plan, now).await?;
        let created = fetch::journals(&txn, &ids).await?;
        txn.commit().await.map_err(db_error)?;

        info!(
            count = created.len(),
            ledgers_recomputed = outcome.ledgers_recomputed,
            entries_recomputed = outcome.entries_recomputed,
            "General Journal entries created"
        );
        Ok(created)
    }

    /// Changes one line and cascades from the earlier of its old and new date.
    pub async fn update(
        &self,
        id: JournalEntryId,
        patch: JournalEntryPatch,
    ) -> LedgerResult<JournalEntry> {
        let patch = validate_patch(patch)?;
        self.require_accounts(patch.account_id).await?;
        let now = self.clock.now();

        let txn = self.db.begin().await.map_err(db_error)?;
        let mut plan = CascadePlan::new();
        apply_patch(&txn, &mut plan, id, &patch, now).await?;
        cascade::run(&txn, &plan, now).await?;
        let entry = fetch::journal(&txn, id).await?;
        txn.commit().await.map_err(db_error)?;

        info!(entry_id = %id, ledger_id = %entry.ledger_id, "General Journal entry updated");
        Ok(entry)
    }

    /// Changes several lines in one transaction.
    ///
    /// # Errors
    ///
    /// `EmptyBatch` for no updates, `DuplicateEntry` when an id repeats, and
    /// every error of [`update`](Self::update). Nothing is written on failure.
    pub async fn update_batch(
        &self,
        updates: Vec<JournalEntryUpdate>,
    ) -> LedgerResult<Vec<JournalEntry>> {
        if updates.is_empty() {
            return Err(LedgerError::EmptyBatch);
        }
        let ids: Vec<JournalEntryId> = updates.iter().map(|u| u.id).collect();
        ensure_distinct(&ids)?;
        let patches = updates
            .into_iter()
            .map(|u| validate_patch(u.patch).map(|p| (u.id, p)))
            .collect::<LedgerResult<Vec<_>>>()?;
        self.require_accounts(patches.iter().filter_map(|(_, p)| p.account_id))
            .await?;
        let now = self.clock.now();

        let txn = self.db.begin().await.map_err(db_error)?;
        let mut plan = CascadePlan::new();
        for (id, patch) in &patches {
            apply_patch(&txn, &mut plan, *id, patch, now).await?;
        }
        let outcome = cascade::run(&txn, &plan, now).await?;
        let updated = fetch::journals(&txn, &ids).await?;
        txn.commit().await.map_err(db_error)?;

        info!(
            count = updated.len(),
            ledgers_recomputed = outcome.ledgers_recomputed,
            "General Journal entries updated"
        );
        Ok(updated)
    }

    /// Removes one line and re-derives everything after it.
    pub async fn delete(&self, id: JournalEntryId) -> LedgerResult<JournalEntry> {
        let now = self.clock.now();
        let txn = self.db.begin().await.map_err(db_error)?;

        let entry = fetch::journal(&txn, id).await?;
        let ledger = fetch::ledger(&txn, entry.ledger_id).await?;
        ensure_editable(&ledger)?;
        let ledger_date = ledger.transaction_date;
        general_journals::Entity::delete_by_id(id.0)
            .exec(&txn)
            .await
            .map_err(db_error)?;

        let mut plan = CascadePlan::new();
        plan.touch_ledger(entry.ledger_id, ledger_date, entry.transaction_date);
        cascade::run(&txn, &plan, now).await?;
        txn.commit().await.map_err(db_error)?;

        info!(entry_id = %id, ledger_id = %entry.ledger_id, "General Journal entry deleted");
        Ok(entry)
    }

    /// Merges creates and updates for one ledger and day.
    ///
    /// Creates default to the reconciled ledger and date. Updates must target
    /// lines of that ledger; updates that carry no field are skipped.
    pub async fn reconcile_day(&self, input: ReconcileDayInput) -> LedgerResult<ReconcileResult> {
        let ledger_id = input.ledger_id.ok_or(LedgerError::MissingField("ledger_id"))?;
        let date = require_date("transaction_date", input.transaction_date.as_deref())?;

        let creates = input
            .creates
            .into_iter()
            .map(|c| validate_reconcile_entry(c, ledger_id, date))
            .collect::<LedgerResult<Vec<_>>>()?;
        let non_empty: Vec<JournalEntryUpdate> = input
            .updates
            .into_iter()
            .filter(|u| !u.patch.is_empty())
            .collect();
        let update_ids: Vec<JournalEntryId> = non_empty.iter().map(|u| u.id).collect();
        ensure_distinct(&update_ids)?;
        let updates = non_empty
            .into_iter()
            .map(|u| validate_patch(u.patch).map(|p| (u.id, p)))
            .collect::<LedgerResult<Vec<_>>>()?;

        self.require_accounts(
            creates
                .iter()
                .map(|c| c.account_id)
                .chain(updates.iter().filter_map(|(_, p)| p.account_id)),
        )
        .await?;
        let now = self.clock.now();

        let txn = self.db.begin().await.map_err(db_error)?;
        ensure_editable(&fetch::ledger(&txn, ledger_id).await?)?;

        let mut plan = CascadePlan::new();
        for (id, patch) in &updates {
            if fetch::journal(&txn, *id).await?.ledger_id != ledger_id {
                return Err(LedgerError::JournalEntryNotFound(*id));
            }
            apply_patch(&txn, &mut plan, *id, patch, now).await?;
        }
        let mut created_ids = Vec::with_capacity(creates.len());
        for new in creates {
            created_ids.push(insert_entry(&txn, &mut plan, new, now).await?);
        }

        let outcome = cascade::run(&txn, &plan, now).await?;
        let result = ReconcileResult {
            ledger: fetch::ledger(&txn, ledger_id).await?,
            created: fetch::journals(&txn, &created_ids).await?,
            updated: fetch::journals(&txn, &update_ids).await?,
            ledgers_recomputed: outcome.ledgers_recomputed,
            entries_recomputed: outcome.entries_recomputed,
        };
        txn.commit().await.map_err(db_error)?;

        info!(
            ledger_id = %ledger_id,
            transaction_date = %date,
            created = result.created.len(),
            updated = result.updated.len(),
            ledgers_recomputed = result.ledgers_recomputed,
            "Journal day reconciled"
        );
        Ok(result)
    }

    /// Returns one line.
    pub async fn get(&self, id: JournalEntryId) -> LedgerResult<JournalEntry> {
        fetch::journal(&self.db, id).await
    }

    /// Lists lines in id order, optionally limited to one ledger.
    pub async fn list(&self, ledger_id: Option<LedgerId>) -> LedgerResult<Vec<JournalEntry>> {
        let mut query = general_journals::Entity::find();
        if let Some(id) = ledger_id {
            query = query.filter(general_journals::Column::LedgerId.eq(id.0));
        }
        query
            .order_by_asc(general_journals::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(JournalEntry::try_from)
            .collect()
    }

    async fn require_accounts<I>(&self, ids: I) -> LedgerResult<()>
    where
        I: IntoIterator<Item = AccountId>,
    {
        let mut checked = Vec::new();
        for id in ids {
            if !checked.contains(&id) {
                self.directories.require_account(id).await?;
                checked.push(id);
            }
        }
        Ok(())
    }
}

async fn insert_entry(
    txn: &DatabaseTransaction,
    plan: &mut CascadePlan,
    new: NewJournalEntry,
    now: DateTime<Utc>,
) -> LedgerResult<JournalEntryId> {
    let ledger = fetch::ledger(txn, new.ledger_id).await?;
    ensure_editable(&ledger)?;
    plan.touch_ledger(ledger.id, ledger.transaction_date, new.transaction_date);

    let row = general_journals::ActiveModel::for_insert(new, now)
        .insert(txn)
        .await
        .map_err(db_error)?;
    Ok(JournalEntryId(row.id))
}

async fn apply_patch(
    txn: &DatabaseTransaction,
    plan: &mut CascadePlan,
    id: JournalEntryId,
    patch: &ValidatedPatch,
    now: DateTime<Utc>,
) -> LedgerResult<()> {
    let mut entry = fetch::journal(txn, id).await?;
    let old_ledger = fetch::ledger(txn, entry.ledger_id).await?;
    ensure_editable(&old_ledger)?;
    let old_date = entry.transaction_date;

    patch.apply(&mut entry)?;
    entry.updated_at = now;

    if entry.ledger_id == old_ledger.id {
        plan.touch_ledger(old_ledger.id, old_ledger.transaction_date, old_date.min(entry.transaction_date));
    } else {
        let new_ledger = fetch::ledger(txn, entry.ledger_id).await?;
        ensure_editable(&new_ledger)?;
        plan.touch_ledger(new_ledger.id, new_ledger.transaction_date, entry.transaction_date);
        plan.touch_ledger(old_ledger.id, old_ledger.transaction_date, old_date);
    }

    general_journals::ActiveModel::from(&entry)
        .update(txn)
        .await
        .map_err(db_error)?;
    Ok(())
}
