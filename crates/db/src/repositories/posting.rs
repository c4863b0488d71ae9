//! Posting repository: freeze, bulk unpost, and the read projections.

use std::sync::Arc;

use ledgerline_core::ledger::Ledger;
use ledgerline_core::journal::JournalEntry;
use ledgerline_core::posting::{
    Posting, PostingDetail, PostingFilter, PostingReport, PostingRow, UnpostSummary,
    build_report, create_posting, unpost, validate_period,
};
use ledgerline_core::{LedgerError, LedgerResult};
use ledgerline_shared::types::{LedgerId, PostingId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ledger::{AccountRef, save};
use super::fetch;
use crate::clock::Clock;
use crate::directory::Directories;
use crate::entities::{general_journals, general_ledgers, posting_details, postings};
use crate::error::db_error;

/// A posting with the details written alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingWithDetails {
    /// The posting.
    pub posting: Posting,
    /// Line snapshots.
    pub details: Vec<PostingDetail>,
}

/// A posting detail with its account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingDetailLine {
    /// The snapshot.
    #[serde(flatten)]
    pub detail: PostingDetail,
    /// Account info.
    pub account_info: Option<AccountRef>,
}

/// A posting enriched for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingView {
    /// The posting.
    #[serde(flatten)]
    pub posting: Posting,
    /// Name of the user who posted.
    pub posted_by_name: Option<String>,
    /// Name of the user who reversed it.
    pub unposted_by_name: Option<String>,
    /// Line snapshots in id order.
    pub details: Vec<PostingDetailLine>,
}

/// Repository for posting operations.
#[derive(Debug, Clone)]
pub struct PostingRepository {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
    directories: Directories,
}

impl PostingRepository {
    /// Creates a new posting repository.
    #[must_use]
    pub fn new(db: DatabaseConnection, clock: Arc<dyn Clock>, directories: Directories) -> Self {
        Self {
            db,
            clock,
            directories,
        }
    }

    /// Freezes a ledger: snapshots it and every line, then marks it posted.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` / `LedgerNotFound` for unknown references
    /// - `AlreadyPosted` if the ledger is posted
    /// - `NoJournalEntries` if the ledger has no lines
    pub async fn create_posting(
        &self,
        ledger_id: LedgerId,
        posted_by: UserId,
    ) -> LedgerResult<PostingWithDetails> {
        self.directories.require_user(posted_by).await?;
        let now = self.clock.now();

        let txn = self.db.begin().await.map_err(db_error)?;
        let mut ledger = fetch::ledger(&txn, ledger_id).await?;
        let entries = general_journals::Entity::find()
            .filter(general_journals::Column::LedgerId.eq(ledger_id.0))
            .all(&txn)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(JournalEntry::try_from)
            .collect::<LedgerResult<Vec<_>>>()?;
        let draft = create_posting(&mut ledger, &entries, posted_by, now)?;
        save(&txn, &ledger).await?;

        let header = postings::ActiveModel::for_insert(&draft, now)
            .insert(&txn)
            .await
            .map_err(db_error)?;
        let posting_id = PostingId(header.id);
        let mut details = Vec::with_capacity(draft.details.len());
        for line in draft.details {
            let row = posting_details::ActiveModel::for_insert(posting_id, line, now)
                .insert(&txn)
                .await
                .map_err(db_error)?;
            details.push(PostingDetail::try_from(row)?);
        }
        let posting = Posting::try_from(header)?;
        txn.commit().await.map_err(db_error)?;

        info!(
            posting_id = %posting.id,
            ledger_id = %ledger_id,
            period_month = posting.period_month,
            period_year = posting.period_year,
            details = details.len(),
            "Posting completed"
        );
        Ok(PostingWithDetails { posting, details })
    }

    /// Reverses every active posting of a period and reopens its ledgers.
    ///
    /// # Errors
    ///
    /// - `InvalidPeriod` for a month outside `1..=12`
    /// - `UserNotFound` for an unknown user
    /// - `NoPostingsForPeriod` if the period has no active posting
    pub async fn unpost_month(
        &self,
        month: u32,
        year: i32,
        unposted_by: UserId,
    ) -> LedgerResult<UnpostSummary> {
        validate_period(month, year)?;
        self.directories.require_user(unposted_by).await?;
        let now = self.clock.now();

        let txn = self.db.begin().await.map_err(db_error)?;
        let targets = postings::Entity::find()
            .filter(postings::Column::PeriodMonth.eq(month))
            .filter(postings::Column::PeriodYear.eq(year))
            .filter(postings::Column::IsUnposted.eq(false))
            .order_by_asc(postings::Column::Id)
            .all(&txn)
            .await
            .map_err(db_error)?;
        if targets.is_empty() {
            return Err(LedgerError::NoPostingsForPeriod { month, year });
        }

        let mut ledger_ids = Vec::with_capacity(targets.len());
        for row in &targets {
            let mut posting = Posting::try_from(row.clone())?;
            unpost(&mut posting, unposted_by, now);
            postings::ActiveModel {
                id: Set(posting.id.0),
                is_unposted: Set(posting.is_unposted),
                unposting_date: Set(posting.unposting_date),
                unposted_by: Set(posting.unposted_by.map(|id| id.0)),
                updated_at: Set(posting.updated_at),
                ..Default::default()
            }
            .update(&txn)
            .await
            .map_err(db_error)?;
            ledger_ids.push(posting.ledger_id);
        }
        ledger_ids.sort();
        ledger_ids.dedup();
        for ledger_id in &ledger_ids {
            let mut ledger = fetch::ledger(&txn, *ledger_id).await?;
            ledger.reopen(now);
            save(&txn, &ledger).await?;
        }
        txn.commit().await.map_err(db_error)?;

        info!(month, year, count = targets.len(), unposted_by = %unposted_by, "Postings unposted");
        Ok(UnpostSummary {
            month,
            year,
            count: targets.len(),
            ledger_ids,
        })
    }

    /// Lists postings matching the filter, newest first.
    pub async fn list(&self, filter: &PostingFilter) -> LedgerResult<Vec<PostingRow>> {
        let mut query = postings::Entity::find();
        if let Some(month) = filter.month {
            query = query.filter(postings::Column::PeriodMonth.eq(month));
        }
        if let Some(year) = filter.year {
            query = query.filter(postings::Column::PeriodYear.eq(year));
        }
        if let Some(is_unposted) = filter.is_unposted {
            query = query.filter(postings::Column::IsUnposted.eq(is_unposted));
        }
        let rows = query
            .order_by_desc(postings::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?;
        rows.into_iter()
            .map(|row| Posting::try_from(row).map(|p| PostingRow::from(&p)))
            .collect()
    }

    /// Returns a posting with user names and account-enriched details.
    pub async fn get(&self, id: PostingId) -> LedgerResult<PostingView> {
        let header = postings::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(LedgerError::PostingNotFound(id))?;
        let details = header
            .find_related(posting_details::Entity)
            .order_by_asc(posting_details::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(PostingDetail::try_from)
            .collect::<LedgerResult<Vec<_>>>()?;
        let posting = Posting::try_from(header)?;

        let accounts = self
            .directories
            .accounts_by_id(details.iter().map(|d| d.account_id))
            .await;
        let posted_by_name = self.user_name(Some(posting.posted_by)).await;
        let unposted_by_name = self.user_name(posting.unposted_by).await;

        Ok(PostingView {
            details: details
                .into_iter()
                .map(|detail| PostingDetailLine {
                    account_info: accounts.get(&detail.account_id).map(AccountRef::from),
                    detail,
                })
                .collect(),
            posting,
            posted_by_name,
            unposted_by_name,
        })
    }

    /// Ledgers that are not currently posted, oldest first.
    pub async fn unposted_ledgers(&self) -> LedgerResult<Vec<Ledger>> {
        general_ledgers::Entity::find()
            .filter(general_ledgers::Column::IsPosted.eq(false))
            .order_by_asc(general_ledgers::Column::TransactionDate)
            .order_by_asc(general_ledgers::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(Ledger::try_from)
            .collect()
    }

    /// Every posting of a period, active and reversed, with totals.
    pub async fn report(&self, month: u32, year: i32) -> LedgerResult<PostingReport> {
        validate_period(month, year)?;
        let postings = postings::Entity::find()
            .filter(postings::Column::PeriodMonth.eq(month))
            .filter(postings::Column::PeriodYear.eq(year))
            .order_by_asc(postings::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(Posting::try_from)
            .collect::<LedgerResult<Vec<_>>>()?;
        build_report(month, year, &postings)
    }

    async fn user_name(&self, id: Option<UserId>) -> Option<String> {
        let id = id?;
        self.directories
            .users
            .find_user(id)
            .await
            .map(|u| u.full_name)
    }
}
