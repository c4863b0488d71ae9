//! Ledger operations.

use chrono::NaiveDate;
use ledgerline_core::ledger::{CreateLedgerInput, Ledger, LedgerPatch, MonthlyRecap};
use ledgerline_db::repositories::LedgerDetail;
use ledgerline_shared::ApiResponse;
use ledgerline_shared::types::LedgerId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{LedgerApi, respond};

/// Request body for overwriting a ledger's aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAggregateRequest {
    /// Ledger date.
    pub transaction_date: NaiveDate,
    /// New total debit.
    pub total_debit: Decimal,
    /// New total credit.
    pub total_credit: Decimal,
    /// New remaining balance.
    pub remaining_balance: Decimal,
}

impl LedgerApi {
    /// `createLedger`
    pub async fn create_ledger(&self, input: CreateLedgerInput) -> ApiResponse<Ledger> {
        respond(
            self.ledgers.create(input).await,
            "create_ledger",
            "General Ledger created successfully",
        )
    }

    /// `getLedger`
    pub async fn get_ledger(&self, id: LedgerId) -> ApiResponse<LedgerDetail> {
        respond(
            self.ledgers.find_by_id(id).await,
            "get_ledger",
            "General Ledger fetched successfully",
        )
    }

    /// `listLedgers`, newest date first.
    pub async fn list_ledgers(&self) -> ApiResponse<Vec<Ledger>> {
        respond(
            self.ledgers.list().await,
            "list_ledgers",
            "General Ledgers fetched successfully",
        )
    }

    /// `updateLedger`
    pub async fn update_ledger(&self, id: LedgerId, patch: LedgerPatch) -> ApiResponse<Ledger> {
        respond(
            self.ledgers.update(id, patch).await,
            "update_ledger",
            "General Ledger updated successfully",
        )
    }

    /// `deleteLedger`
    pub async fn delete_ledger(&self, id: LedgerId) -> ApiResponse<Ledger> {
        respond(
            self.ledgers.delete(id).await,
            "delete_ledger",
            "General Ledger deleted successfully",
        )
    }

    /// Remaining balance carried into `date`.
    pub async fn previous_day_balance(&self, date: NaiveDate) -> ApiResponse<Decimal> {
        respond(
            self.ledgers.previous_day_balance(date).await,
            "previous_day_balance",
            "Previous day balance fetched successfully",
        )
    }

    /// `updateAggregate`
    pub async fn update_aggregate(
        &self,
        id: LedgerId,
        request: UpdateAggregateRequest,
    ) -> ApiResponse<Ledger> {
        respond(
            self.ledgers
                .update_aggregate(
                    id,
                    request.transaction_date,
                    request.total_debit,
                    request.total_credit,
                    request.remaining_balance,
                )
                .await,
            "update_aggregate",
            "General Ledger aggregate updated successfully",
        )
    }

    /// `getMonthlyRecap`
    pub async fn monthly_recap(&self, year: i32, month: u32) -> ApiResponse<MonthlyRecap> {
        respond(
            self.ledgers.monthly_recap(year, month).await,
            "monthly_recap",
            "Monthly recapitulation generated successfully",
        )
    }
}
