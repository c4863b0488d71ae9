//! Initial schema: ledgers, journal lines, petty cash and postings.
//!
//! Ids use AUTOINCREMENT so a deleted line's id is never handed out again;
//! the previous-day seed relies on line ids growing with time.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for statement in UP_SQL {
            db.execute_unprepared(statement).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for statement in DOWN_SQL {
            db.execute_unprepared(statement).await?;
        }
        Ok(())
    }
}

const UP_SQL: [&str; 13] = [
    r"
CREATE TABLE general_ledgers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    transaction_date TEXT NOT NULL,
    transaction_code TEXT NOT NULL UNIQUE,
    description TEXT,
    total_debit TEXT NOT NULL DEFAULT '0',
    total_credit TEXT NOT NULL DEFAULT '0',
    total_balance TEXT NOT NULL DEFAULT '0',
    remaining_balance TEXT NOT NULL DEFAULT '0',
    last_entry_id INTEGER,
    is_posted INTEGER NOT NULL DEFAULT 0,
    posting_date TEXT,
    unposting_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)",
    // Timeline walk and the previous-day seed lookup.
    r"CREATE INDEX idx_general_ledgers_timeline ON general_ledgers(transaction_date, id)",
    r"
CREATE INDEX idx_general_ledgers_seed ON general_ledgers(transaction_date, last_entry_id)
WHERE last_entry_id IS NOT NULL",
    r"
CREATE TABLE petty_cashes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ledger_id INTEGER REFERENCES general_ledgers(id),
    account_id INTEGER NOT NULL,
    user_id INTEGER NOT NULL,
    description TEXT,
    transaction_date TEXT NOT NULL,
    debit TEXT NOT NULL,
    credit TEXT NOT NULL,
    balance TEXT NOT NULL,
    is_approved INTEGER NOT NULL DEFAULT 0,
    approved_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)",
    r"CREATE INDEX idx_petty_cashes_date ON petty_cashes(transaction_date, id)",
    r"
CREATE TABLE general_journals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ledger_id INTEGER NOT NULL REFERENCES general_ledgers(id),
    account_id INTEGER NOT NULL,
    description TEXT,
    transaction_date TEXT NOT NULL,
    debit TEXT NOT NULL,
    credit TEXT NOT NULL,
    balance TEXT NOT NULL,
    petty_cash_id INTEGER REFERENCES petty_cashes(id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)",
    // Cascade loads lines per ledger; petty cash approval looks them up by day.
    r"CREATE INDEX idx_general_journals_ledger ON general_journals(ledger_id, transaction_date, id)",
    r"CREATE INDEX idx_general_journals_date ON general_journals(transaction_date)",
    r"
CREATE TABLE postings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ledger_id INTEGER NOT NULL REFERENCES general_ledgers(id),
    posting_date TEXT NOT NULL,
    posted_by INTEGER NOT NULL,
    period_month INTEGER NOT NULL CHECK (period_month BETWEEN 1 AND 12),
    period_year INTEGER NOT NULL,
    transaction_date TEXT NOT NULL,
    transaction_code TEXT NOT NULL,
    description TEXT,
    total_debit TEXT NOT NULL,
    total_credit TEXT NOT NULL,
    total_balance TEXT NOT NULL,
    is_unposted INTEGER NOT NULL DEFAULT 0,
    unposting_date TEXT,
    unposted_by INTEGER,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)",
    r"CREATE INDEX idx_postings_period ON postings(period_year, period_month, is_unposted)",
    r"CREATE INDEX idx_postings_ledger ON postings(ledger_id)",
    // Details keep the source line id without a foreign key: an unposted
    // ledger may later drop the line while its snapshot stays.
    r"
CREATE TABLE posting_details (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    posting_id INTEGER NOT NULL REFERENCES postings(id),
    journal_entry_id INTEGER NOT NULL,
    account_id INTEGER NOT NULL,
    description TEXT,
    transaction_date TEXT NOT NULL,
    debit TEXT NOT NULL,
    credit TEXT NOT NULL,
    balance TEXT NOT NULL,
    created_at TEXT NOT NULL
)",
    r"CREATE INDEX idx_posting_details_posting ON posting_details(posting_id, id)",
];

const DOWN_SQL: [&str; 5] = [
    "DROP TABLE IF EXISTS posting_details",
    "DROP TABLE IF EXISTS postings",
    "DROP TABLE IF EXISTS general_journals",
    "DROP TABLE IF EXISTS petty_cashes",
    "DROP TABLE IF EXISTS general_ledgers",
];
