//! Property-based tests for the forward cascade.
//!
//! - Every ledger's entries chain from the global previous-day balance
//! - Removing an entry and recomputing matches never having inserted it
//! - A partial recompute after an edit matches a full recompute

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use ledgerline_shared::types::{AccountId, JournalEntryId, LedgerId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::cascade::{CascadePlan, LedgerSlice, recompute, verify_chain};
use super::types::JournalEntry;
use crate::ledger::{Ledger, TimelineIndex};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2013, 10, 1, 0, 0, 0).unwrap()
}

/// Strategy for one line: `(day offset, is_debit, cents)`.
fn line() -> impl Strategy<Value = (u32, bool, i64)> {
    (0u32..3, any::<bool>(), 0i64..10_000_000)
}

/// Strategy for a timeline: each ledger is `(day, lines)`.
fn timeline_spec() -> impl Strategy<Value = Vec<(u32, Vec<(u32, bool, i64)>)>> {
    prop::collection::vec((1u32..20, prop::collection::vec(line(), 0..6)), 1..6)
}

fn build(spec: &[(u32, Vec<(u32, bool, i64)>)]) -> (TimelineIndex, Vec<LedgerSlice>) {
    let mut timeline = TimelineIndex::new();
    let mut slices = Vec::new();
    let mut next_entry = 1;
    for (idx, (day, lines)) in spec.iter().enumerate() {
        let ledger_id = LedgerId(i64::try_from(idx).unwrap() + 1);
        let date = NaiveDate::from_ymd_opt(2013, 9, *day).unwrap();
        let ledger = Ledger::new(ledger_id, date, format!("{}", 10_000_000 + idx), None, now());
        let entries = lines
            .iter()
            .map(|(offset, is_debit, cents)| {
                let amount = Decimal::new(*cents, 2);
                let entry = JournalEntry {
                    id: JournalEntryId(next_entry),
                    ledger_id,
                    account_id: AccountId(110),
                    description: None,
                    transaction_date: date + chrono::Days::new(u64::from(*offset)),
                    debit: if *is_debit { amount } else { Decimal::ZERO },
                    credit: if *is_debit { Decimal::ZERO } else { amount },
                    balance: Decimal::ZERO,
                    petty_cash_id: None,
                    created_at: now(),
                    updated_at: now(),
                };
                next_entry += 1;
                entry
            })
            .collect();
        timeline.upsert(date, ledger_id, Decimal::ZERO, None);
        slices.push(LedgerSlice::new(ledger, entries));
    }
    (timeline, slices)
}

fn full_plan(slices: &[LedgerSlice]) -> CascadePlan {
    let mut plan = CascadePlan::new();
    for s in slices {
        plan.touch_ledger(s.ledger.id, s.ledger.transaction_date, NaiveDate::MIN);
    }
    plan
}

fn snapshot(slices: &[LedgerSlice]) -> Vec<(LedgerId, Decimal, Decimal, Decimal, Vec<(JournalEntryId, Decimal)>)> {
    let mut out: Vec<_> = slices
        .iter()
        .map(|s| {
            let mut lines: Vec<_> = s.entries.iter().map(|e| (e.id, e.balance)).collect();
            lines.sort();
            (
                s.ledger.id,
                s.ledger.total_debit,
                s.ledger.total_credit,
                s.ledger.remaining_balance,
                lines,
            )
        })
        .collect();
    out.sort_by_key(|row| row.0);
    out
}

proptest! {
    #[test]
    fn prop_chain_holds_after_full_recompute(spec in timeline_spec()) {
        let (mut timeline, mut slices) = build(&spec);
        let plan = full_plan(&slices);
        recompute(&mut timeline, &mut slices, &plan, now()).unwrap();

        for slice in &slices {
            let seed = timeline.previous_day_balance(slice.ledger.transaction_date);
            prop_assert_eq!(
                verify_chain(slice.ledger.id, &slice.entries, seed),
                Ok(slice.ledger.remaining_balance)
            );
            prop_assert_eq!(
                slice.ledger.total_balance,
                slice.ledger.total_debit - slice.ledger.total_credit
            );
            prop_assert_eq!(
                timeline.get(slice.ledger.transaction_date, slice.ledger.id),
                Some(slice.ledger.remaining_balance)
            );
        }
    }

    #[test]
    fn prop_delete_then_rederive_equals_never_existed(
        spec in timeline_spec(),
        pick in any::<prop::sample::Index>(),
    ) {
        let total: usize = spec.iter().map(|(_, lines)| lines.len()).sum();
        prop_assume!(total > 0);

        let (mut timeline, mut slices) = build(&spec);
        let plan = full_plan(&slices);
        recompute(&mut timeline, &mut slices, &plan, now()).unwrap();

        // Remove the chosen entry and cascade from its ledger.
        let target = pick.index(total);
        let mut seen = 0;
        let mut removed = None;
        for slice in &mut slices {
            if target < seen + slice.entries.len() {
                let entry = slice.entries.remove(target - seen);
                removed = Some((slice.ledger.id, slice.ledger.transaction_date, entry));
                break;
            }
            seen += slice.entries.len();
        }
        let (ledger_id, ledger_date, entry) = removed.unwrap();
        let mut plan = CascadePlan::new();
        plan.touch_ledger(ledger_id, ledger_date, entry.transaction_date);
        recompute(&mut timeline, &mut slices, &plan, now()).unwrap();

        // Build the same timeline without that entry from scratch.
        let (mut fresh_timeline, mut fresh) = build(&spec);
        for slice in &mut fresh {
            slice.entries.retain(|e| e.id != entry.id);
        }
        let plan = full_plan(&fresh);
        recompute(&mut fresh_timeline, &mut fresh, &plan, now()).unwrap();

        prop_assert_eq!(snapshot(&slices), snapshot(&fresh));
        prop_assert_eq!(timeline, fresh_timeline);
    }

    #[test]
    fn prop_partial_recompute_matches_full(
        spec in timeline_spec(),
        extra in line(),
        which in any::<prop::sample::Index>(),
    ) {
        let (mut timeline, mut slices) = build(&spec);
        let plan = full_plan(&slices);
        recompute(&mut timeline, &mut slices, &plan, now()).unwrap();

        let idx = which.index(slices.len());
        let (offset, is_debit, cents) = extra;
        let amount = Decimal::new(cents, 2);
        let date = slices[idx].ledger.transaction_date + chrono::Days::new(u64::from(offset));
        let ledger_id = slices[idx].ledger.id;
        let ledger_date = slices[idx].ledger.transaction_date;
        slices[idx].entries.push(JournalEntry {
            id: JournalEntryId(10_000),
            ledger_id,
            account_id: AccountId(110),
            description: None,
            transaction_date: date,
            debit: if is_debit { amount } else { Decimal::ZERO },
            credit: if is_debit { Decimal::ZERO } else { amount },
            balance: Decimal::ZERO,
            petty_cash_id: None,
            created_at: now(),
            updated_at: now(),
        });

        let mut partial_timeline = timeline.clone();
        let mut partial = slices.clone();
        let mut plan = CascadePlan::new();
        plan.touch_ledger(ledger_id, ledger_date, date);
        recompute(&mut partial_timeline, &mut partial, &plan, now()).unwrap();

        let plan = full_plan(&slices);
        recompute(&mut timeline, &mut slices, &plan, now()).unwrap();

        prop_assert_eq!(snapshot(&partial), snapshot(&slices));
        prop_assert_eq!(partial_timeline, timeline);
    }
}
