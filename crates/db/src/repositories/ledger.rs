//! Ledger repository: daily aggregates, the previous-day lookup and the
//! monthly recap.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use ledgerline_core::journal::validation::{normalize_description, parse_date, require_date};
use ledgerline_core::journal::{CascadePlan, JournalEntry};
use ledgerline_core::ledger::{
    CreateLedgerInput, Ledger, LedgerPatch, MonthlyRecap, build_recap, draw_codes, month_bounds,
    unique_code,
};
use ledgerline_core::petty_cash::PettyCash;
use ledgerline_core::posting::ensure_editable;
use ledgerline_core::{LedgerError, LedgerResult};
use ledgerline_shared::types::{AccountId, LedgerId};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, Value,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{cascade, fetch};
use crate::clock::Clock;
use crate::directory::{AccountInfo, Directories};
use crate::entities::{general_journals, general_ledgers, petty_cashes, postings};
use crate::error::db_error;

/// Account code and name attached to a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    /// Chart of accounts code.
    pub code: i32,
    /// Display name.
    pub name: String,
}

impl From<&AccountInfo> for AccountRef {
    fn from(info: &AccountInfo) -> Self {
        Self {
            code: info.code,
            name: info.name.clone(),
        }
    }
}

/// A journal line with its account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// The line.
    #[serde(flatten)]
    pub entry: JournalEntry,
    /// Account info, absent if the directory no longer knows the account.
    pub account_info: Option<AccountRef>,
}

/// A petty cash row with its account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PettyCashLine {
    /// The row.
    #[serde(flatten)]
    pub petty_cash: PettyCash,
    /// Account info.
    pub account_info: Option<AccountRef>,
}

/// A ledger with its lines and the balance it was seeded with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerDetail {
    /// The ledger.
    #[serde(flatten)]
    pub ledger: Ledger,
    /// Journal lines in `(transaction_date, id)` order.
    pub journals: Vec<JournalLine>,
    /// Petty cash rows approved into this ledger.
    pub petty_cash: Vec<PettyCashLine>,
    /// Remaining balance of the latest ledger before this one's date.
    pub yesterday_remaining_balance: Decimal,
}

/// Repository for ledger operations.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
    code_attempts: u32,
    clock: Arc<dyn Clock>,
    directories: Directories,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        code_attempts: u32,
        clock: Arc<dyn Clock>,
        directories: Directories,
    ) -> Self {
        Self {
            db,
            code_attempts,
            clock,
            directories,
        }
    }

    /// Creates an open ledger with a fresh 8-digit transaction code.
    ///
    /// The new ledger is seeded with the previous-day balance. It has no lines,
    /// so it never re-seeds later ledgers.
    ///
    /// # Errors
    ///
    /// - Validation errors for a missing or malformed date
    /// - `TransactionCodeExhausted` if no free code was found
    pub async fn create(&self, input: CreateLedgerInput) -> LedgerResult<Ledger> {
        let date = require_date("transaction_date", input.transaction_date.as_deref())?;
        let description = normalize_description(input.description);
        let now = self.clock.now();
        let candidates = draw_codes(&mut rand::rng(), self.code_attempts);

        let txn = self.db.begin().await.map_err(db_error)?;
        let code = generate_code(&txn, candidates).await?;
        let row = general_ledgers::ActiveModel::for_insert(date, code, description, now)
            .insert(&txn)
            .await
            .map_err(db_error)?;
        let id = LedgerId(row.id);

        let mut plan = CascadePlan::new();
        plan.touch_ledger(id, date, NaiveDate::MIN);
        cascade::run(&txn, &plan, now).await?;

        let ledger = fetch::ledger(&txn, id).await?;
        txn.commit().await.map_err(db_error)?;

        info!(
            ledger_id = %ledger.id,
            transaction_date = %ledger.transaction_date,
            transaction_code = %ledger.transaction_code,
            "General Ledger created"
        );
        Ok(ledger)
    }

    /// Returns a ledger with its enriched lines and previous-day balance.
    pub async fn find_by_id(&self, id: LedgerId) -> LedgerResult<LedgerDetail> {
        let ledger = fetch::ledger(&self.db, id).await?;
        let entries = general_journals::Entity::find()
            .filter(general_journals::Column::LedgerId.eq(id.0))
            .order_by_asc(general_journals::Column::TransactionDate)
            .order_by_asc(general_journals::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(JournalEntry::try_from)
            .collect::<LedgerResult<Vec<_>>>()?;
        let petty_cash = petty_cashes::Entity::find()
            .filter(petty_cashes::Column::LedgerId.eq(id.0))
            .order_by_asc(petty_cashes::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(PettyCash::try_from)
            .collect::<LedgerResult<Vec<_>>>()?;
        let yesterday = cascade::seed_before(&self.db, ledger.transaction_date).await?;

        let account_ids: Vec<AccountId> = entries
            .iter()
            .map(|e| e.account_id)
            .chain(petty_cash.iter().map(|p| p.account_id))
            .collect();
        let accounts = self.directories.accounts_by_id(account_ids).await;

        Ok(LedgerDetail {
            ledger,
            journals: entries
                .into_iter()
                .map(|entry| JournalLine {
                    account_info: accounts.get(&entry.account_id).map(AccountRef::from),
                    entry,
                })
                .collect(),
            petty_cash: petty_cash
                .into_iter()
                .map(|petty_cash| PettyCashLine {
                    account_info: accounts.get(&petty_cash.account_id).map(AccountRef::from),
                    petty_cash,
                })
                .collect(),
            yesterday_remaining_balance: yesterday,
        })
    }

    /// Lists ledgers, newest date first.
    pub async fn list(&self) -> LedgerResult<Vec<Ledger>> {
        general_ledgers::Entity::find()
            .order_by_desc(general_ledgers::Column::TransactionDate)
            .order_by_desc(general_ledgers::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(Ledger::try_from)
            .collect()
    }

    /// Changes a ledger's description or date. A date move re-runs the
    /// cascade from the earlier of the two dates.
    pub async fn update(&self, id: LedgerId, patch: LedgerPatch) -> LedgerResult<Ledger> {
        if patch.transaction_date.is_none() && patch.description.is_none() {
            return Err(LedgerError::EmptyUpdate);
        }
        let new_date = patch
            .transaction_date
            .as_deref()
            .map(|raw| parse_date("transaction_date", raw))
            .transpose()?;
        let now = self.clock.now();

        let txn = self.db.begin().await.map_err(db_error)?;
        let mut ledger = fetch::ledger(&txn, id).await?;
        ensure_editable(&ledger)?;

        let old_date = ledger.transaction_date;
        if let Some(description) = patch.description {
            ledger.description = normalize_description(Some(description));
        }
        if let Some(date) = new_date {
            ledger.transaction_date = date;
        }
        ledger.updated_at = now;
        let new_date = ledger.transaction_date;
        let date_changed = new_date != old_date;
        save(&txn, &ledger).await?;

        if date_changed {
            let mut plan = CascadePlan::new();
            plan.touch_date(old_date.min(new_date));
            plan.touch_ledger(id, new_date, NaiveDate::MIN);
            cascade::run(&txn, &plan, now).await?;
        }

        let ledger = fetch::ledger(&txn, id).await?;
        txn.commit().await.map_err(db_error)?;

        info!(ledger_id = %id, date_changed, "General Ledger updated");
        Ok(ledger)
    }

    /// Deletes an open ledger with its journal lines. Petty cash rows that
    /// were approved into it are detached, not deleted.
    ///
    /// # Errors
    ///
    /// - `LedgerNotFound` for an unknown id
    /// - `LedgerPosted` if the ledger is posted
    /// - `LedgerHasPostings` if any posting references it
    pub async fn delete(&self, id: LedgerId) -> LedgerResult<Ledger> {
        let now = self.clock.now();
        let txn = self.db.begin().await.map_err(db_error)?;

        let ledger = fetch::ledger(&txn, id).await?;
        ensure_editable(&ledger)?;
        let postings = postings::Entity::find()
            .filter(postings::Column::LedgerId.eq(id.0))
            .count(&txn)
            .await
            .map_err(db_error)?;
        if postings > 0 {
            return Err(LedgerError::LedgerHasPostings(id));
        }

        general_journals::Entity::delete_many()
            .filter(general_journals::Column::LedgerId.eq(id.0))
            .exec(&txn)
            .await
            .map_err(db_error)?;
        petty_cashes::Entity::update_many()
            .col_expr(petty_cashes::Column::LedgerId, Expr::value(Value::BigInt(None)))
            .col_expr(petty_cashes::Column::UpdatedAt, Expr::value(now))
            .filter(petty_cashes::Column::LedgerId.eq(id.0))
            .exec(&txn)
            .await
            .map_err(db_error)?;
        general_ledgers::Entity::delete_by_id(id.0)
            .exec(&txn)
            .await
            .map_err(db_error)?;

        let mut plan = CascadePlan::new();
        plan.touch_date(ledger.transaction_date);
        cascade::run(&txn, &plan, now).await?;
        txn.commit().await.map_err(db_error)?;

        info!(ledger_id = %id, "General Ledger deleted");
        Ok(ledger)
    }

    /// Remaining balance carried into `date`: the latest earlier ledger with
    /// journal lines wins. Zero when none exists.
    pub async fn previous_day_balance(&self, date: NaiveDate) -> LedgerResult<Decimal> {
        cascade::seed_before(&self.db, date).await
    }

    /// Overwrites a ledger's aggregates and date, re-deriving `total_balance`,
    /// then re-seeds every later ledger.
    pub async fn update_aggregate(
        &self,
        id: LedgerId,
        date: NaiveDate,
        total_debit: Decimal,
        total_credit: Decimal,
        remaining_balance: Decimal,
    ) -> LedgerResult<Ledger> {
        let now = self.clock.now();
        let txn = self.db.begin().await.map_err(db_error)?;

        let mut ledger = fetch::ledger(&txn, id).await?;
        ensure_editable(&ledger)?;
        let old_date = ledger.transaction_date;
        if old_date != date {
            ledger.transaction_date = date;
            ledger.updated_at = now;
            save(&txn, &ledger).await?;
            let mut plan = CascadePlan::new();
            plan.touch_date(old_date.min(date));
            cascade::run(&txn, &plan, now).await?;
            ledger = fetch::ledger(&txn, id).await?;
        }

        // The override wins over whatever the move re-derived.
        ledger.apply_aggregate(total_debit, total_credit, remaining_balance, now);
        save(&txn, &ledger).await?;
        let mut plan = CascadePlan::new();
        plan.touch_date(date);
        cascade::run(&txn, &plan, now).await?;

        let ledger = fetch::ledger(&txn, id).await?;
        txn.commit().await.map_err(db_error)?;

        info!(
            ledger_id = %id,
            total_balance = %ledger.total_balance,
            remaining_balance = %ledger.remaining_balance,
            "General Ledger aggregate updated"
        );
        Ok(ledger)
    }

    /// Totals over the posted ledgers of one month.
    pub async fn monthly_recap(&self, year: i32, month: u32) -> LedgerResult<MonthlyRecap> {
        let (first, last) = month_bounds(year, month)?;
        let ledgers = general_ledgers::Entity::find()
            .filter(general_ledgers::Column::TransactionDate.between(first, last))
            .filter(general_ledgers::Column::IsPosted.eq(true))
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(Ledger::try_from)
            .collect::<LedgerResult<Vec<_>>>()?;
        build_recap(year, month, &ledgers)
    }
}

/// Writes every column of `ledger`.
pub(crate) async fn save(txn: &DatabaseTransaction, ledger: &Ledger) -> LedgerResult<()> {
    general_ledgers::ActiveModel::from(ledger)
        .update(txn)
        .await
        .map_err(db_error)?;
    Ok(())
}

async fn generate_code(txn: &DatabaseTransaction, candidates: Vec<String>) -> LedgerResult<String> {
    let taken: HashSet<String> = general_ledgers::Entity::find()
        .select_only()
        .column(general_ledgers::Column::TransactionCode)
        .filter(general_ledgers::Column::TransactionCode.is_in(candidates.clone()))
        .into_tuple::<String>()
        .all(txn)
        .await
        .map_err(db_error)?
        .into_iter()
        .collect();
    unique_code(candidates, |code| {
        let collision = taken.contains(code);
        if collision {
            warn!(code, "Transaction code collision, drawing again");
        }
        collision
    })
}
