//! Journal operations.

use ledgerline_core::journal::{
    CreateJournalEntryInput, JournalEntry, JournalEntryPatch, JournalEntryUpdate,
    ReconcileDayInput,
};
use ledgerline_db::repositories::ReconcileResult;
use ledgerline_shared::ApiResponse;
use ledgerline_shared::types::{JournalEntryId, LedgerId};

use crate::{LedgerApi, respond};

impl LedgerApi {
    /// `createJournalEntry`
    pub async fn create_journal_entry(
        &self,
        input: CreateJournalEntryInput,
    ) -> ApiResponse<JournalEntry> {
        respond(
            self.journals.create(input).await,
            "create_journal_entry",
            "General Journal entry created successfully",
        )
    }

    /// `createJournalEntries`
    pub async fn create_journal_entries(
        &self,
        inputs: Vec<CreateJournalEntryInput>,
    ) -> ApiResponse<Vec<JournalEntry>> {
        let count = inputs.len();
        respond(
            self.journals.create_batch(inputs).await,
            "create_journal_entries",
            format!("{count} General Journal entries created successfully"),
        )
    }

    /// `updateJournalEntry`
    pub async fn update_journal_entry(
        &self,
        id: JournalEntryId,
        patch: JournalEntryPatch,
    ) -> ApiResponse<JournalEntry> {
        respond(
            self.journals.update(id, patch).await,
            "update_journal_entry",
            "General Journal entry updated successfully",
        )
    }

    /// `updateJournalEntries`
    pub async fn update_journal_entries(
        &self,
        updates: Vec<JournalEntryUpdate>,
    ) -> ApiResponse<Vec<JournalEntry>> {
        let count = updates.len();
        respond(
            self.journals.update_batch(updates).await,
            "update_journal_entries",
            format!("{count} General Journal entries updated successfully"),
        )
    }

    /// `deleteJournalEntry`
    pub async fn delete_journal_entry(&self, id: JournalEntryId) -> ApiResponse<JournalEntry> {
        respond(
            self.journals.delete(id).await,
            "delete_journal_entry",
            "General Journal entry deleted successfully",
        )
    }

    /// `reconcileDay`
    pub async fn reconcile_day(&self, input: ReconcileDayInput) -> ApiResponse<ReconcileResult> {
        respond(
            self.journals.reconcile_day(input).await,
            "reconcile_day",
            "General Journal reconciled successfully",
        )
    }

    /// `getJournalEntry`
    pub async fn get_journal_entry(&self, id: JournalEntryId) -> ApiResponse<JournalEntry> {
        respond(
            self.journals.get(id).await,
            "get_journal_entry",
            "General Journal entry fetched successfully",
        )
    }

    /// `listJournalEntries`
    pub async fn list_journal_entries(
        &self,
        ledger_id: Option<LedgerId>,
    ) -> ApiResponse<Vec<JournalEntry>> {
        respond(
            self.journals.list(ledger_id).await,
            "list_journal_entries",
            "General Journal entries fetched successfully",
        )
    }
}
