//! Facade tests: envelopes, messages and error codes end to end.

use std::sync::Arc;

use chrono::NaiveDate;
use ledgerline_api::LedgerApi;
use ledgerline_api::handlers::{UnpostMonthRequest, UpdateAggregateRequest};
use ledgerline_core::journal::CreateJournalEntryInput;
use ledgerline_core::ledger::CreateLedgerInput;
use ledgerline_core::petty_cash::CreatePettyCashInput;
use ledgerline_core::posting::PostingFilter;
use ledgerline_db::{Directories, FixedClock, InMemoryDirectory};
use ledgerline_shared::ResponseStatus;
use ledgerline_shared::config::StoreConfig;
use ledgerline_shared::types::{AccountId, JournalEntryId, LedgerId, UserId};
use rstest::rstest;
use rust_decimal_macros::dec;

const CASH: AccountId = AccountId(1);
const ADMIN: UserId = UserId(1);

async fn api() -> LedgerApi {
    let directory = Arc::new(InMemoryDirectory::new());
    directory.add_account(CASH, 110, "Kas").await;
    directory.add_user(ADMIN, "Admin", None).await;
    let today = NaiveDate::from_ymd_opt(2013, 9, 11).unwrap();
    LedgerApi::connect(
        &StoreConfig::default(),
        Arc::new(FixedClock::at_date(today)),
        Directories::in_memory(directory),
    )
    .await
    .unwrap()
}

fn line(ledger_id: LedgerId, debit: &str, credit: &str) -> CreateJournalEntryInput {
    CreateJournalEntryInput {
        ledger_id: Some(ledger_id),
        account_id: Some(CASH),
        transaction_date: Some("2013-09-11T08:30:00+07:00".into()),
        description: Some("Setoran".into()),
        debit: Some(debit.parse().unwrap()),
        credit: Some(credit.parse().unwrap()),
    }
}

async fn open_ledger(api: &LedgerApi) -> LedgerId {
    api.create_ledger(CreateLedgerInput {
        transaction_date: Some("2013-09-11".into()),
        description: Some("Kas harian".into()),
    })
    .await
    .data
    .unwrap()
    .id
}

#[tokio::test]
async fn test_full_day_lifecycle() {
    let api = api().await;

    let created = api
        .create_ledger(CreateLedgerInput {
            transaction_date: Some("2013-09-11".into()),
            description: None,
        })
        .await;
    assert!(created.is_success());
    assert_eq!(created.message, "General Ledger created successfully");
    let ledger_id = created.data.unwrap().id;

    let lines = api
        .create_journal_entries(vec![
            line(ledger_id, "1000", "0"),
            line(ledger_id, "0", "250.5"),
        ])
        .await;
    assert!(lines.is_success());
    assert_eq!(lines.data.unwrap()[1].balance, dec!(749.50));

    let posted = api.create_posting(ledger_id, ADMIN).await;
    assert_eq!(posted.message, "Posting completed successfully");

    let recap = api.monthly_recap(2013, 9).await;
    assert_eq!(recap.message, "Monthly recapitulation generated successfully");
    assert!(!recap.data.unwrap().summary.is_balanced);

    let unposted = api
        .unpost_month(UnpostMonthRequest {
            month: 9,
            year: 2013,
            unposted_by: ADMIN,
        })
        .await;
    assert_eq!(unposted.message, "Successfully unposted all transactions for 9/2013");

    let report = api.posting_report(9, 2013).await.data.unwrap();
    assert_eq!(report.summary.unposted_count, 1);
    assert_eq!(api.unposted_ledgers().await.data.unwrap().len(), 1);
}

#[tokio::test]
async fn test_error_envelope_carries_domain_code() {
    let api = api().await;
    let ledger_id = open_ledger(&api).await;

    let resp = api.create_journal_entry(line(ledger_id, "10", "5")).await;
    assert_eq!(resp.status, ResponseStatus::Error);
    assert_eq!(resp.error_code.as_deref(), Some("DEBIT_AND_CREDIT"));
    assert_eq!(resp.status_code, Some(400));

    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json["status"], "error");
    assert!(json.get("data").is_none());
}

#[rstest]
#[case::unknown_entry(JournalEntryId(99), "JOURNAL_ENTRY_NOT_FOUND", 404)]
#[tokio::test]
async fn test_delete_unknown_entry(
    #[case] id: JournalEntryId,
    #[case] code: &str,
    #[case] status: u16,
) {
    let api = api().await;
    let resp = api.delete_journal_entry(id).await;
    assert_eq!(resp.error_code.as_deref(), Some(code));
    assert_eq!(resp.status_code, Some(status));
}

#[tokio::test]
async fn test_petty_cash_approval_message() {
    let api = api().await;
    let ledger_id = open_ledger(&api).await;
    api.create_journal_entry(line(ledger_id, "100", "0")).await;

    let row = api
        .create_petty_cash(CreatePettyCashInput {
            account_id: Some(CASH),
            user_id: Some(ADMIN),
            transaction_date: Some("2013-09-11".into()),
            description: Some("Parkir".into()),
            debit: None,
            credit: Some(dec!(20)),
        })
        .await;
    assert_eq!(row.message, "Petty cash created successfully");
    let id = row.data.unwrap().id;

    let approved = api.approve_petty_cash(id).await;
    assert_eq!(approved.message, "Petty cash posted successfully to general journal");
    assert_eq!(approved.data.unwrap().journal_entry.balance, dec!(80));

    let again = api.approve_petty_cash(id).await;
    assert_eq!(again.error_code.as_deref(), Some("ALREADY_APPROVED"));
    assert_eq!(again.status_code, Some(409));
}

#[tokio::test]
async fn test_list_postings_and_aggregate_override() {
    let api = api().await;
    let ledger_id = open_ledger(&api).await;

    let resp = api
        .update_aggregate(
            ledger_id,
            UpdateAggregateRequest {
                transaction_date: NaiveDate::from_ymd_opt(2013, 9, 11).unwrap(),
                total_debit: dec!(10),
                total_credit: dec!(4),
                remaining_balance: dec!(6),
            },
        )
        .await;
    assert_eq!(resp.data.unwrap().total_balance, dec!(6));

    let postings = api.list_postings(PostingFilter::default()).await;
    assert_eq!(postings.message, "Postings fetched successfully");
    assert!(postings.data.unwrap().is_empty());

    let missing = api.create_posting(ledger_id, ADMIN).await;
    assert_eq!(missing.error_code.as_deref(), Some("NO_JOURNAL_ENTRIES"));
    assert_eq!(missing.status_code, Some(404));
}
