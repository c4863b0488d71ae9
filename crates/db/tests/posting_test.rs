//! Posting repository tests: freeze, bulk unpost, report and recap.

mod common;

use common::{ADMIN, CLERK, Harness, day};
use ledgerline_core::LedgerError;
use ledgerline_core::journal::{CreateJournalEntryInput, JournalEntryPatch};
use ledgerline_core::ledger::CreateLedgerInput;
use ledgerline_core::posting::PostingFilter;
use ledgerline_shared::types::{LedgerId, PostingId, UserId};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_posting_snapshots_ledger_and_lines() {
    let h = Harness::new().await;
    let ledger = h.ledger(11).await;
    h.line(ledger.id, 11, dec!(1000), dec!(0)).await;
    h.line(ledger.id, 11, dec!(0), dec!(400)).await;

    let posted = h.postings.create_posting(ledger.id, ADMIN).await.unwrap();

    assert_eq!(posted.posting.period_month, 9);
    assert_eq!(posted.posting.period_year, 2013);
    assert_eq!(posted.posting.total_debit, dec!(1000));
    assert_eq!(posted.posting.total_balance, dec!(600));
    assert_eq!(posted.posting.transaction_code, ledger.transaction_code);
    assert_eq!(posted.details.len(), 2);
    assert_eq!(posted.details[1].balance, dec!(600));

    let ledger = h.ledgers.find_by_id(ledger.id).await.unwrap().ledger;
    assert!(ledger.is_posted);
    assert!(ledger.posting_date.is_some());
}

#[tokio::test]
async fn test_posting_preconditions() {
    let h = Harness::new().await;
    let empty = h.ledger(11).await;

    let err = h.postings.create_posting(empty.id, ADMIN).await.unwrap_err();
    assert_eq!(err, LedgerError::NoJournalEntries(empty.id));

    let err = h.postings.create_posting(LedgerId(99), ADMIN).await.unwrap_err();
    assert_eq!(err, LedgerError::LedgerNotFound(LedgerId(99)));

    let err = h.postings.create_posting(empty.id, UserId(99)).await.unwrap_err();
    assert_eq!(err, LedgerError::UserNotFound(UserId(99)));

    h.line(empty.id, 11, dec!(1), dec!(0)).await;
    h.postings.create_posting(empty.id, ADMIN).await.unwrap();
    let err = h.postings.create_posting(empty.id, ADMIN).await.unwrap_err();
    assert_eq!(err, LedgerError::AlreadyPosted(empty.id));
}

#[tokio::test]
async fn test_posted_ledger_is_frozen() {
    let h = Harness::new().await;
    let early = h.ledger(10).await;
    let late = h.ledger(12).await;
    let line = h.line(early.id, 10, dec!(100), dec!(0)).await;
    h.line(late.id, 12, dec!(10), dec!(0)).await;
    h.postings.create_posting(late.id, ADMIN).await.unwrap();

    // Direct edit of the posted ledger.
    let late_line = h.journals.list(Some(late.id)).await.unwrap().remove(0);
    let err = h.journals.delete(late_line.id).await.unwrap_err();
    assert_eq!(err, LedgerError::LedgerPosted(late.id));

    // A backdated edit whose cascade would reach the posted ledger.
    let err = h
        .journals
        .update(
            line.id,
            JournalEntryPatch {
                debit: Some(dec!(90)),
                ..JournalEntryPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, LedgerError::LedgerPosted(late.id));
    assert_eq!(h.journals.get(line.id).await.unwrap().debit, dec!(100));
    assert_eq!(h.remaining(late.id).await, dec!(110));
}

#[tokio::test]
async fn test_unpost_month_reopens_ledgers() {
    let h = Harness::new().await;
    let a = h.ledger(10).await;
    let b = h.ledger(11).await;
    h.line(a.id, 10, dec!(10), dec!(0)).await;
    h.line(b.id, 11, dec!(0), dec!(4)).await;
    let october = h
        .ledgers
        .create(CreateLedgerInput {
            transaction_date: Some("2013-10-01".into()),
            description: None,
        })
        .await
        .unwrap();
    h.journals
        .create(CreateJournalEntryInput {
            ledger_id: Some(october.id),
            account_id: Some(common::CASH),
            transaction_date: Some("2013-10-01".into()),
            description: None,
            debit: Some(dec!(7)),
            credit: Some(dec!(0)),
        })
        .await
        .unwrap();
    h.postings.create_posting(a.id, ADMIN).await.unwrap();
    h.postings.create_posting(b.id, ADMIN).await.unwrap();
    let october_posting = h.postings.create_posting(october.id, ADMIN).await.unwrap().posting;
    assert_eq!((october_posting.period_month, october_posting.period_year), (10, 2013));

    let summary = h.postings.unpost_month(9, 2013, CLERK).await.unwrap();
    assert_eq!(summary.count, 2);
    assert_eq!(summary.ledger_ids, vec![a.id, b.id]);

    // Other periods are left alone.
    assert!(h.ledgers.find_by_id(october.id).await.unwrap().ledger.is_posted);
    let kept = h.postings.get(october_posting.id).await.unwrap().posting;
    assert!(!kept.is_unposted);
    assert!(kept.unposted_by.is_none());

    let a = h.ledgers.find_by_id(a.id).await.unwrap().ledger;
    assert!(!a.is_posted);
    assert!(a.posting_date.is_none());
    assert!(a.unposting_date.is_some());

    let reversed = h
        .postings
        .list(&PostingFilter {
            is_unposted: Some(true),
            ..PostingFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(reversed.len(), 2);
    assert!(reversed.iter().all(|p| p.unposted_by == Some(CLERK)));

    let err = h.postings.unpost_month(9, 2013, CLERK).await.unwrap_err();
    assert_eq!(err, LedgerError::NoPostingsForPeriod { month: 9, year: 2013 });

    // Reopened ledgers can be posted again.
    h.postings.create_posting(b.id, ADMIN).await.unwrap();
}

#[tokio::test]
async fn test_unpost_rejects_bad_period() {
    let h = Harness::new().await;
    let err = h.postings.unpost_month(13, 2013, ADMIN).await.unwrap_err();
    assert_eq!(err, LedgerError::InvalidPeriod { year: 2013, month: 13 });
}

#[tokio::test]
async fn test_list_filters_and_orders_newest_first() {
    let h = Harness::new().await;
    for d in [10, 11, 12] {
        let ledger = h.ledger(d).await;
        h.line(ledger.id, d, dec!(1), dec!(0)).await;
        h.postings.create_posting(ledger.id, ADMIN).await.unwrap();
    }

    let rows = h.postings.list(&PostingFilter::default()).await.unwrap();
    let ids: Vec<_> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![PostingId(3), PostingId(2), PostingId(1)]);

    let october = h
        .postings
        .list(&PostingFilter {
            month: Some(10),
            year: Some(2013),
            is_unposted: None,
        })
        .await
        .unwrap();
    assert!(october.is_empty());
}

#[tokio::test]
async fn test_get_enriches_details() {
    let h = Harness::new().await;
    let ledger = h.ledger(11).await;
    h.line(ledger.id, 11, dec!(25), dec!(0)).await;
    let posted = h.postings.create_posting(ledger.id, ADMIN).await.unwrap();

    let view = h.postings.get(posted.posting.id).await.unwrap();
    assert_eq!(view.posted_by_name.as_deref(), Some("Admin Keuangan"));
    assert!(view.unposted_by_name.is_none());
    assert_eq!(view.details[0].account_info.as_ref().unwrap().code, 110);

    let err = h.postings.get(PostingId(9)).await.unwrap_err();
    assert_eq!(err, LedgerError::PostingNotFound(PostingId(9)));
}

#[tokio::test]
async fn test_report_counts_active_and_reversed() {
    let h = Harness::new().await;
    let a = h.ledger(10).await;
    h.line(a.id, 10, dec!(300), dec!(0)).await;
    h.postings.create_posting(a.id, ADMIN).await.unwrap();
    h.postings.unpost_month(9, 2013, ADMIN).await.unwrap();
    h.postings.create_posting(a.id, ADMIN).await.unwrap();

    let report = h.postings.report(9, 2013).await.unwrap();
    assert_eq!(report.summary.total_count, 2);
    assert_eq!(report.summary.posted_count, 1);
    assert_eq!(report.summary.unposted_count, 1);
    assert_eq!(report.summary.total_debit, dec!(600));

    let unposted = h.postings.unposted_ledgers().await.unwrap();
    assert!(unposted.is_empty());
}

#[tokio::test]
async fn test_monthly_recap_balance_flag() {
    let h = Harness::new().await;
    let balanced = h.ledger(11).await;
    h.line(balanced.id, 11, dec!(550000), dec!(0)).await;
    h.line(balanced.id, 11, dec!(0), dec!(550000)).await;
    h.postings.create_posting(balanced.id, ADMIN).await.unwrap();

    // Open ledgers are left out of the recap.
    let open = h.ledger(12).await;
    h.line(open.id, 12, dec!(7), dec!(0)).await;

    let recap = h.ledgers.monthly_recap(2013, 9).await.unwrap();
    assert_eq!(recap.month_name, "September");
    assert_eq!(recap.daily_entries.len(), 1);
    assert_eq!(recap.daily_entries[0].date, "11.09.13");
    assert!(recap.summary.is_balanced);

    h.postings.create_posting(open.id, ADMIN).await.unwrap();
    let recap = h.ledgers.monthly_recap(2013, 9).await.unwrap();
    assert_eq!(recap.summary.balance, dec!(7));
    assert!(!recap.summary.is_balanced);
    assert_eq!(recap.daily_entries[1].transaction_date, day(12));

    let unposted = h.postings.unposted_ledgers().await.unwrap();
    assert!(unposted.is_empty());
}
