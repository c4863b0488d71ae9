//! Shared fixtures for repository tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use ledgerline_core::journal::{CreateJournalEntryInput, JournalEntry};
use ledgerline_core::ledger::{CreateLedgerInput, Ledger};
use ledgerline_db::{
    Clock, DatabaseConnection, Directories, FixedClock, InMemoryDirectory, JournalRepository,
    LedgerRepository, PettyCashRepository, PostingRepository,
};
use ledgerline_shared::config::StoreConfig;
use ledgerline_shared::types::{AccountId, LedgerId, UserId};
use rust_decimal::Decimal;

pub const CASH: AccountId = AccountId(110);
pub const BANK: AccountId = AccountId(120);
pub const EXPENSE: AccountId = AccountId(610);
pub const ADMIN: UserId = UserId(1);
pub const CLERK: UserId = UserId(2);

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2013, 9, d).unwrap()
}

pub fn iso(d: u32) -> String {
    day(d).format("%Y-%m-%d").to_string()
}

pub struct Harness {
    pub db: DatabaseConnection,
    pub clock: Arc<FixedClock>,
    pub ledgers: LedgerRepository,
    pub journals: JournalRepository,
    pub petty_cash: PettyCashRepository,
    pub postings: PostingRepository,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_config(StoreConfig {
            lock_timeout_ms: 2_000,
            ..StoreConfig::default()
        })
        .await
    }

    pub async fn with_config(config: StoreConfig) -> Self {
        let directory = Arc::new(InMemoryDirectory::new());
        directory.add_account(CASH, 110, "Kas").await;
        directory.add_account(BANK, 120, "Bank").await;
        directory.add_account(EXPENSE, 610, "Beban Operasional").await;
        directory.add_user(ADMIN, "Admin Keuangan", Some("admin@example.com".into())).await;
        directory.add_user(CLERK, "Staf Kasir", None).await;
        let directories = Directories::in_memory(directory);

        let db = ledgerline_db::connect(&config).await.unwrap();
        let clock = Arc::new(FixedClock::at_date(day(11)));
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        Self {
            ledgers: LedgerRepository::new(
                db.clone(),
                config.transaction_code_attempts,
                dyn_clock.clone(),
                directories.clone(),
            ),
            journals: JournalRepository::new(db.clone(), dyn_clock.clone(), directories.clone()),
            petty_cash: PettyCashRepository::new(db.clone(), dyn_clock.clone(), directories.clone()),
            postings: PostingRepository::new(db.clone(), dyn_clock, directories),
            db,
            clock,
        }
    }

    pub async fn ledger(&self, d: u32) -> Ledger {
        self.ledgers
            .create(CreateLedgerInput {
                transaction_date: Some(iso(d)),
                description: Some(format!("Transaksi {d}")),
            })
            .await
            .unwrap()
    }

    pub async fn line(
        &self,
        ledger_id: LedgerId,
        d: u32,
        debit: Decimal,
        credit: Decimal,
    ) -> JournalEntry {
        self.journals.create(input(ledger_id, d, debit, credit)).await.unwrap()
    }

    pub async fn remaining(&self, id: LedgerId) -> Decimal {
        self.ledgers.find_by_id(id).await.unwrap().ledger.remaining_balance
    }

    pub async fn balances(&self, id: LedgerId) -> Vec<Decimal> {
        self.ledgers
            .find_by_id(id)
            .await
            .unwrap()
            .journals
            .into_iter()
            .map(|l| l.entry.balance)
            .collect()
    }
}

pub fn input(ledger_id: LedgerId, d: u32, debit: Decimal, credit: Decimal) -> CreateJournalEntryInput {
    CreateJournalEntryInput {
        ledger_id: Some(ledger_id),
        account_id: Some(CASH),
        transaction_date: Some(iso(d)),
        description: None,
        debit: Some(debit),
        credit: Some(credit),
    }
}
