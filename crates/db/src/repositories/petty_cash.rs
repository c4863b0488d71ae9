//! Petty cash repository.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use ledgerline_core::journal::{CascadePlan, JournalEntry};
use ledgerline_core::petty_cash::{
    CreatePettyCashInput, PettyCash, PettyCashPatch, approve, check_approvable, check_mutable,
    recompute_day, select_ledger, to_journal_entry, validate_new_petty_cash,
    validate_petty_cash_patch,
};
use ledgerline_core::ledger::Ledger;
use ledgerline_core::LedgerResult;
use ledgerline_shared::types::{JournalEntryId, PettyCashId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ledger::AccountRef;
use super::{cascade, fetch};
use crate::clock::Clock;
use crate::directory::{Directories, UserInfo};
use crate::entities::{amount, general_journals, general_ledgers, petty_cashes};
use crate::error::db_error;

/// A petty cash row with its account and requesting user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PettyCashDetail {
    /// The row.
    #[serde(flatten)]
    pub petty_cash: PettyCash,
    /// Account info.
    pub account_info: Option<AccountRef>,
    /// Requesting user.
    pub user: Option<UserInfo>,
}

/// Outcome of an approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalResult {
    /// The stamped row.
    pub petty_cash: PettyCash,
    /// The journal line it converted into.
    pub journal_entry: JournalEntry,
}

/// Repository for petty cash operations.
#[derive(Debug, Clone)]
pub struct PettyCashRepository {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
    directories: Directories,
}

impl PettyCashRepository {
    /// Creates a new petty cash repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, clock: Arc<dyn Clock>, directories: Directories) -> Self {
        Self {
            db,
            clock,
            directories,
        }
    }

    /// Adds a row and re-derives its day's balances.
    pub async fn create(&self, input: CreatePettyCashInput) -> LedgerResult<PettyCash> {
        let new = validate_new_petty_cash(input)?;
        self.directories.require_account(new.account_id).await?;
        self.directories.require_user(new.user_id).await?;
        let now = self.clock.now();

        let txn = self.db.begin().await.map_err(db_error)?;
        let date = new.transaction_date;
        let inserted = petty_cashes::ActiveModel::for_insert(new, now)
            .insert(&txn)
            .await
            .map_err(db_error)?;
        let id = PettyCashId(inserted.id);
        rebalance_day(&txn, date, now).await?;
        let row = fetch::petty_cash(&txn, id).await?;
        txn.commit().await.map_err(db_error)?;

        info!(petty_cash_id = %id, transaction_date = %date, balance = %row.balance, "Petty cash created");
        Ok(row)
    }

    /// Changes an unapproved row. A date move rebalances both days.
    pub async fn update(&self, id: PettyCashId, patch: PettyCashPatch) -> LedgerResult<PettyCash> {
        let patch = validate_petty_cash_patch(patch)?;
        if let Some(account_id) = patch.account_id {
            self.directories.require_account(account_id).await?;
        }
        if let Some(user_id) = patch.user_id {
            self.directories.require_user(user_id).await?;
        }
        let now = self.clock.now();

        let txn = self.db.begin().await.map_err(db_error)?;
        let mut row = fetch::petty_cash(&txn, id).await?;
        check_mutable(&row)?;
        let old_date = row.transaction_date;
        patch.apply(&mut row)?;
        row.updated_at = now;
        let new_date = row.transaction_date;
        petty_cashes::ActiveModel::from(&row)
            .update(&txn)
            .await
            .map_err(db_error)?;

        rebalance_day(&txn, new_date, now).await?;
        if old_date != new_date {
            rebalance_day(&txn, old_date, now).await?;
        }
        let row = fetch::petty_cash(&txn, id).await?;
        txn.commit().await.map_err(db_error)?;

        info!(petty_cash_id = %id, "Petty cash updated");
        Ok(row)
    }

    /// Removes an unapproved row.
    pub async fn delete(&self, id: PettyCashId) -> LedgerResult<PettyCash> {
        let now = self.clock.now();
        let txn = self.db.begin().await.map_err(db_error)?;
        let row = fetch::petty_cash(&txn, id).await?;
        check_mutable(&row)?;
        petty_cashes::Entity::delete_by_id(id.0)
            .exec(&txn)
            .await
            .map_err(db_error)?;
        rebalance_day(&txn, row.transaction_date, now).await?;
        txn.commit().await.map_err(db_error)?;

        info!(petty_cash_id = %id, "Petty cash deleted");
        Ok(row)
    }

    /// Approves a row into today's ledger and converts it into a journal line.
    ///
    /// # Errors
    ///
    /// - `PettyCashNotFound` for an unknown id
    /// - `AlreadyApproved` on a second approval
    /// - `NoLedgerForDate` if no ledger has journal activity today
    /// - `LedgerPosted` if every such ledger is posted, or the cascade would
    ///   change a posted ledger
    pub async fn approve(&self, id: PettyCashId) -> LedgerResult<ApprovalResult> {
        let now = self.clock.now();
        let today = self.clock.today();
        let txn = self.db.begin().await.map_err(db_error)?;

        let mut row = fetch::petty_cash(&txn, id).await?;
        check_approvable(&row)?;
        let candidates = ledgers_with_activity_on(&txn, today).await?;
        let ledger_id = select_ledger(&candidates, today)?;
        let ledger_date = fetch::ledger(&txn, ledger_id).await?.transaction_date;

        approve(&mut row, ledger_id, today, now);
        petty_cashes::ActiveModel::from(&row)
            .update(&txn)
            .await
            .map_err(db_error)?;
        let inserted =
            general_journals::ActiveModel::for_insert(to_journal_entry(&row, ledger_id, today), now)
                .insert(&txn)
                .await
                .map_err(db_error)?;
        let entry_id = JournalEntryId(inserted.id);

        let mut plan = CascadePlan::new();
        plan.touch_ledger(ledger_id, ledger_date, today);
        cascade::run(&txn, &plan, now).await?;

        let result = ApprovalResult {
            petty_cash: fetch::petty_cash(&txn, id).await?,
            journal_entry: fetch::journal(&txn, entry_id).await?,
        };
        txn.commit().await.map_err(db_error)?;

        info!(
            petty_cash_id = %id,
            ledger_id = %ledger_id,
            entry_id = %entry_id,
            balance = %result.journal_entry.balance,
            "Petty cash posted to general journal"
        );
        Ok(result)
    }

    /// Returns one row with its account and user.
    pub async fn get(&self, id: PettyCashId) -> LedgerResult<PettyCashDetail> {
        let row = fetch::petty_cash(&self.db, id).await?;
        Ok(self.enrich(row).await)
    }

    /// Lists rows by date, then id.
    pub async fn list(&self) -> LedgerResult<Vec<PettyCashDetail>> {
        let rows = petty_cashes::Entity::find()
            .order_by_asc(petty_cashes::Column::TransactionDate)
            .order_by_asc(petty_cashes::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(PettyCash::try_from)
            .collect::<LedgerResult<Vec<_>>>()?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(self.enrich(row).await);
        }
        Ok(out)
    }

    async fn enrich(&self, petty_cash: PettyCash) -> PettyCashDetail {
        let account_info = self
            .directories
            .accounts
            .find_account(petty_cash.account_id)
            .await
            .as_ref()
            .map(AccountRef::from);
        let user = self.directories.users.find_user(petty_cash.user_id).await;
        PettyCashDetail {
            petty_cash,
            account_info,
            user,
        }
    }
}

async fn rebalance_day(
    txn: &DatabaseTransaction,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> LedgerResult<()> {
    let mut rows = fetch::petty_cash_on(txn, date).await?;
    let changed: HashSet<PettyCashId> = recompute_day(&mut rows, now)?.into_iter().collect();
    for row in rows.iter().filter(|r| changed.contains(&r.id)) {
        petty_cashes::ActiveModel {
            id: Set(row.id.0),
            balance: Set(amount(row.balance)),
            updated_at: Set(row.updated_at),
            ..Default::default()
        }
        .update(txn)
        .await
        .map_err(db_error)?;
    }
    Ok(())
}

/// Ledgers with at least one journal line dated `date`.
async fn ledgers_with_activity_on(
    txn: &DatabaseTransaction,
    date: NaiveDate,
) -> LedgerResult<Vec<Ledger>> {
    let ids: Vec<i64> = general_journals::Entity::find()
        .select_only()
        .column(general_journals::Column::LedgerId)
        .distinct()
        .filter(general_journals::Column::TransactionDate.eq(date))
        .into_tuple()
        .all(txn)
        .await
        .map_err(db_error)?;
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    general_ledgers::Entity::find()
        .filter(general_ledgers::Column::Id.is_in(ids))
        .all(txn)
        .await
        .map_err(db_error)?
        .into_iter()
        .map(Ledger::try_from)
        .collect()
}
