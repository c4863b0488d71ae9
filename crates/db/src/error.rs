//! Maps database errors onto the ledger error taxonomy.

use ledgerline_core::LedgerError;
use sea_orm::{ConnAcquireErr, DbErr, RuntimeErr};
use tracing::warn;

// Primary SQLite result codes for a locked database.
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Converts a `DbErr` into a [`LedgerError`].
///
/// Contention (no free connection in time, or SQLite reporting the database
/// busy or locked) becomes the retryable `StoreBusy`; everything else is a
/// `Storage` integrity failure.
pub fn db_error(err: DbErr) -> LedgerError {
    if is_busy(&err) {
        return LedgerError::StoreBusy;
    }
    warn!(error = %err, "Database error");
    LedgerError::Storage(err.to_string())
}

fn is_busy(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(ConnAcquireErr::Timeout) => true,
        DbErr::Conn(RuntimeErr::SqlxError(e))
        | DbErr::Exec(RuntimeErr::SqlxError(e))
        | DbErr::Query(RuntimeErr::SqlxError(e)) => is_busy_sqlx(e),
        _ => false,
    }
}

fn is_busy_sqlx(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut => true,
        sqlx::Error::Database(db) => db
            .code()
            .and_then(|code| code.parse::<i32>().ok())
            .is_some_and(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED)),
        _ => false,
    }
}
