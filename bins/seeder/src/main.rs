//! Sample-day seeder for local development.
//!
//! Registers a small chart of accounts, replays the cash movements of
//! 2013-09-11, approves one petty cash slip, posts the day and logs the
//! monthly recapitulation.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use ledgerline_api::LedgerApi;
use ledgerline_core::journal::CreateJournalEntryInput;
use ledgerline_core::ledger::CreateLedgerInput;
use ledgerline_core::petty_cash::CreatePettyCashInput;
use ledgerline_db::{Directories, FixedClock, InMemoryDirectory};
use ledgerline_shared::telemetry::init_tracing;
use ledgerline_shared::types::{AccountId, LedgerId, UserId};
use ledgerline_shared::{ApiResponse, AppConfig};
use rust_decimal::Decimal;
use tracing::info;

const SAMPLE_DAY: &str = "2013-09-11";
const ADMIN: UserId = UserId(1);
const CASH: AccountId = AccountId(110);
const BANK: AccountId = AccountId(120);
const SALES: AccountId = AccountId(410);
const OPERATING: AccountId = AccountId(610);

/// Debit, credit and description of each line of the sample day.
const SAMPLE_LINES: [(i64, i64, AccountId, &str); 6] = [
    (225_000, 0, SALES, "Penjualan tunai"),
    (207_500, 0, SALES, "Penjualan tunai"),
    (117_500, 0, BANK, "Penarikan bank"),
    (0, 165_500, OPERATING, "Pembelian ATK"),
    (0, 242_200, OPERATING, "Biaya listrik"),
    (0, 142_300, BANK, "Setoran bank"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let day = NaiveDate::parse_from_str(SAMPLE_DAY, "%Y-%m-%d")?;
    let directory = Arc::new(InMemoryDirectory::new());
    seed_directory(&directory).await;

    let api = LedgerApi::connect(
        &config.store,
        Arc::new(FixedClock::at_date(day)),
        Directories::in_memory(directory),
    )
    .await
    .context("Failed to open the database")?;

    let ledger = into_data(
        api.create_ledger(CreateLedgerInput {
            transaction_date: Some(SAMPLE_DAY.into()),
            description: Some("Kas harian".into()),
        })
        .await,
    )?;
    info!(ledger_id = %ledger.id, code = %ledger.transaction_code, "Sample ledger created");

    let lines = into_data(api.create_journal_entries(sample_lines(ledger.id)).await)?;
    for line in &lines {
        info!(entry_id = %line.id, debit = %line.debit, credit = %line.credit, balance = %line.balance, "Journal line");
    }

    let slip = into_data(
        api.create_petty_cash(CreatePettyCashInput {
            account_id: Some(OPERATING),
            user_id: Some(ADMIN),
            transaction_date: Some(SAMPLE_DAY.into()),
            description: Some("Parkir kendaraan".into()),
            debit: Some(Decimal::from(2_000)),
            credit: None,
        })
        .await,
    )?;
    let approval = into_data(api.approve_petty_cash(slip.id).await)?;
    info!(
        petty_cash_id = %slip.id,
        entry_id = %approval.journal_entry.id,
        balance = %approval.journal_entry.balance,
        "Petty cash approved"
    );

    let posting = into_data(api.create_posting(ledger.id, ADMIN).await)?;
    info!(
        posting_id = %posting.posting.id,
        details = posting.details.len(),
        "Sample day posted"
    );

    let recap = into_data(api.monthly_recap(2013, 9).await)?;
    info!(recap = %serde_json::to_string(&recap)?, "Monthly recapitulation");

    Ok(())
}

async fn seed_directory(directory: &InMemoryDirectory) {
    directory.add_account(CASH, 110, "Kas").await;
    directory.add_account(BANK, 120, "Bank").await;
    directory.add_account(SALES, 410, "Pendapatan Penjualan").await;
    directory.add_account(OPERATING, 610, "Beban Operasional").await;
    directory
        .add_user(ADMIN, "Administrator", Some("admin@ledgerline.local".into()))
        .await;
}

fn sample_lines(ledger_id: LedgerId) -> Vec<CreateJournalEntryInput> {
    SAMPLE_LINES
        .iter()
        .map(|&(debit, credit, account, description)| CreateJournalEntryInput {
            ledger_id: Some(ledger_id),
            account_id: Some(account),
            transaction_date: Some(SAMPLE_DAY.into()),
            description: Some(description.into()),
            debit: Some(Decimal::from(debit)),
            credit: Some(Decimal::from(credit)),
        })
        .collect()
}

fn into_data<T>(response: ApiResponse<T>) -> anyhow::Result<T> {
    if !response.is_success() {
        bail!(
            "{} ({})",
            response.message,
            response.error_code.unwrap_or_default()
        );
    }
    response.data.context("success response without data")
}
