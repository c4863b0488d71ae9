//! Posting operations.

use ledgerline_core::ledger::Ledger;
use ledgerline_core::posting::{PostingFilter, PostingReport, PostingRow, UnpostSummary};
use ledgerline_db::repositories::{PostingView, PostingWithDetails};
use ledgerline_shared::ApiResponse;
use ledgerline_shared::types::{LedgerId, PostingId, UserId};
use serde::{Deserialize, Serialize};

use crate::{LedgerApi, respond};

/// Request body for a bulk unpost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnpostMonthRequest {
    /// Period month.
    pub month: u32,
    /// Period year.
    pub year: i32,
    /// Acting user.
    pub unposted_by: UserId,
}

impl LedgerApi {
    /// `createPosting`
    pub async fn create_posting(
        &self,
        ledger_id: LedgerId,
        posted_by: UserId,
    ) -> ApiResponse<PostingWithDetails> {
        respond(
            self.postings.create_posting(ledger_id, posted_by).await,
            "create_posting",
            "Posting completed successfully",
        )
    }

    /// `unpostMonth`
    pub async fn unpost_month(&self, request: UnpostMonthRequest) -> ApiResponse<UnpostSummary> {
        let UnpostMonthRequest {
            month,
            year,
            unposted_by,
        } = request;
        respond(
            self.postings.unpost_month(month, year, unposted_by).await,
            "unpost_month",
            format!("Successfully unposted all transactions for {month}/{year}"),
        )
    }

    /// `listPostings`
    pub async fn list_postings(&self, filter: PostingFilter) -> ApiResponse<Vec<PostingRow>> {
        respond(
            self.postings.list(&filter).await,
            "list_postings",
            "Postings fetched successfully",
        )
    }

    /// `getPosting`
    pub async fn get_posting(&self, id: PostingId) -> ApiResponse<PostingView> {
        respond(
            self.postings.get(id).await,
            "get_posting",
            "Posting fetched successfully",
        )
    }

    /// `getUnpostedLedgers`
    pub async fn unposted_ledgers(&self) -> ApiResponse<Vec<Ledger>> {
        respond(
            self.postings.unposted_ledgers().await,
            "unposted_ledgers",
            "Unposted ledgers fetched successfully",
        )
    }

    /// `getPostingReport`
    pub async fn posting_report(&self, month: u32, year: i32) -> ApiResponse<PostingReport> {
        respond(
            self.postings.report(month, year).await,
            "posting_report",
            "Posting report generated successfully",
        )
    }
}
