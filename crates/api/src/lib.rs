//! Operation facade over the ledger repositories.
//!
//! This crate provides:
//! - `LedgerApi`, one method per public operation
//! - Tagged `ApiResponse` results with the domain error code and status
//!
//! Transport layers (HTTP, RPC, CLI) wrap this facade; none is bundled here.

pub mod handlers;

use std::sync::Arc;

use ledgerline_core::{LedgerError, LedgerResult};
use ledgerline_db::{
    Clock, DatabaseConnection, Directories, JournalRepository, LedgerRepository,
    PettyCashRepository, PostingRepository,
};
use ledgerline_shared::ApiResponse;
use ledgerline_shared::config::StoreConfig;

/// Shared state behind every operation.
#[derive(Debug, Clone)]
pub struct LedgerApi {
    ledgers: LedgerRepository,
    journals: JournalRepository,
    petty_cash: PettyCashRepository,
    postings: PostingRepository,
}

impl LedgerApi {
    /// Opens the configured database and wires the repositories over it.
    ///
    /// # Errors
    ///
    /// Returns `StoreBusy` or `Storage` if the database cannot be opened or migrated.
    pub async fn connect(
        config: &StoreConfig,
        clock: Arc<dyn Clock>,
        directories: Directories,
    ) -> LedgerResult<Self> {
        let db = ledgerline_db::connect(config).await?;
        Ok(Self::with_connection(
            db,
            config.transaction_code_attempts,
            clock,
            directories,
        ))
    }

    /// Wires the repositories over an open connection.
    #[must_use]
    pub fn with_connection(
        db: DatabaseConnection,
        code_attempts: u32,
        clock: Arc<dyn Clock>,
        directories: Directories,
    ) -> Self {
        Self {
            ledgers: LedgerRepository::new(
                db.clone(),
                code_attempts,
                clock.clone(),
                directories.clone(),
            ),
            journals: JournalRepository::new(db.clone(), clock.clone(), directories.clone()),
            petty_cash: PettyCashRepository::new(db.clone(), clock.clone(), directories.clone()),
            postings: PostingRepository::new(db, clock, directories),
        }
    }
}

/// Wraps an error into the failure envelope.
pub(crate) fn failure<T>(err: &LedgerError) -> ApiResponse<T> {
    ApiResponse::failure(err.to_string(), err.error_code(), err.http_status_code())
}

/// Turns a repository result into a response, logging failures.
pub(crate) fn respond<T>(
    result: Result<T, LedgerError>,
    operation: &'static str,
    message: impl Into<String>,
) -> ApiResponse<T> {
    match result {
        Ok(data) => ApiResponse::success(message, data),
        Err(e) => {
            if e.is_retryable() {
                tracing::warn!(error = %e, operation, "Operation failed, retry possible");
            } else {
                tracing::error!(error = %e, code = e.error_code(), operation, "Operation failed");
            }
            failure(&e)
        }
    }
}
