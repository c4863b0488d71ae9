//! Database layer with `SeaORM` entities, migrations and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions over SQLite
//! - Database migrations
//! - The account and user directory seams consumed for enrichment
//! - A clock seam so "today" is controllable in tests
//! - Repository abstractions for ledgers, journals, petty cash and postings

pub mod clock;
pub mod directory;
pub mod entities;
pub mod error;
pub mod migration;
pub mod repositories;

pub use clock::{Clock, FixedClock, SystemClock};
pub use directory::{
    AccountDirectory, AccountInfo, Directories, InMemoryDirectory, UserDirectory, UserInfo,
};
pub use error::db_error;
pub use repositories::{
    JournalRepository, LedgerRepository, PettyCashRepository, PostingRepository,
};
pub use sea_orm::DatabaseConnection;

use std::time::Duration;

use ledgerline_core::LedgerResult;
use ledgerline_shared::config::StoreConfig;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use migration::Migrator;

// An in-memory database lives only as long as its connection.
const KEEP_ALIVE: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Opens the database and brings its schema up to date.
///
/// The pool holds a single connection, so write transactions are serialized
/// and a caller that cannot get the connection within `lock_timeout_ms`
/// fails with `StoreBusy`.
///
/// # Errors
///
/// Returns `StoreBusy` on timeout and `Storage` if the database cannot be
/// opened or migrated.
pub async fn connect(config: &StoreConfig) -> LedgerResult<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(1)
        .min_connections(1)
        .acquire_timeout(Duration::from_millis(config.lock_timeout_ms))
        .idle_timeout(KEEP_ALIVE)
        .max_lifetime(KEEP_ALIVE)
        .sqlx_logging(false);

    let db = Database::connect(options).await.map_err(db_error)?;
    Migrator::up(&db, None).await.map_err(db_error)?;
    info!(database_url = %config.database_url, "Database ready");
    Ok(db)
}
