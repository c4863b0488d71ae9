//! Petty cash operations.

use ledgerline_core::petty_cash::{CreatePettyCashInput, PettyCash, PettyCashPatch};
use ledgerline_db::repositories::{ApprovalResult, PettyCashDetail};
use ledgerline_shared::ApiResponse;
use ledgerline_shared::types::PettyCashId;

use crate::{LedgerApi, respond};

impl LedgerApi {
    /// `createPettyCash`
    pub async fn create_petty_cash(&self, input: CreatePettyCashInput) -> ApiResponse<PettyCash> {
        respond(
            self.petty_cash.create(input).await,
            "create_petty_cash",
            "Petty cash created successfully",
        )
    }

    /// `updatePettyCash`
    pub async fn update_petty_cash(
        &self,
        id: PettyCashId,
        patch: PettyCashPatch,
    ) -> ApiResponse<PettyCash> {
        respond(
            self.petty_cash.update(id, patch).await,
            "update_petty_cash",
            "Petty cash updated successfully",
        )
    }

    /// `deletePettyCash`
    pub async fn delete_petty_cash(&self, id: PettyCashId) -> ApiResponse<PettyCash> {
        respond(
            self.petty_cash.delete(id).await,
            "delete_petty_cash",
            "Petty cash deleted successfully",
        )
    }

    /// `approvePettyCash`
    pub async fn approve_petty_cash(&self, id: PettyCashId) -> ApiResponse<ApprovalResult> {
        respond(
            self.petty_cash.approve(id).await,
            "approve_petty_cash",
            "Petty cash posted successfully to general journal",
        )
    }

    /// `getPettyCash`
    pub async fn get_petty_cash(&self, id: PettyCashId) -> ApiResponse<PettyCashDetail> {
        respond(
            self.petty_cash.get(id).await,
            "get_petty_cash",
            "Petty cash fetched successfully",
        )
    }

    /// `listPettyCash`
    pub async fn list_petty_cash(&self) -> ApiResponse<Vec<PettyCashDetail>> {
        respond(
            self.petty_cash.list().await,
            "list_petty_cash",
            "Petty cash fetched successfully",
        )
    }
}
