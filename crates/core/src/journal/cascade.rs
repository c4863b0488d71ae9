//! Forward balance cascade.
//!
//! Entries of a ledger, ordered by `(transaction_date, id)`, form a chain:
//! `balance[i] = balance[i-1] + debit[i] - credit[i]`, seeded by the remaining
//! balance of the latest ledger dated before the ledger's own date. An edit in
//! one ledger shifts that ledger's remaining balance, which seeds every later
//! ledger, so a single mutation is followed by one bounded recompute pass
//! over the edited ledger and everything dated after it.
//!
//! The pass is pure: the store loads the affected [`LedgerSlice`]s once per
//! transaction, runs [`recompute`], and writes back whatever changed.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use ledgerline_shared::types::{JournalEntryId, LedgerId};
use rust_decimal::Decimal;

use super::types::JournalEntry;
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{Ledger, TimelineIndex};

/// A ledger and all of its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSlice {
    /// The ledger record.
    pub ledger: Ledger,
    /// Its entries. Sorted by `(transaction_date, id)` before recomputing.
    pub entries: Vec<JournalEntry>,
}

impl LedgerSlice {
    /// Creates a slice.
    #[must_use]
    pub fn new(ledger: Ledger, entries: Vec<JournalEntry>) -> Self {
        Self { ledger, entries }
    }
}

/// What a mutation touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadePlan {
    boundary: Option<NaiveDate>,
    partial: BTreeMap<LedgerId, (NaiveDate, NaiveDate)>,
}

impl CascadePlan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an edit to the entries of a ledger.
    ///
    /// `from` is the earliest entry date affected; for a moved entry pass the
    /// earlier of its old and new date.
    pub fn touch_ledger(&mut self, ledger_id: LedgerId, ledger_date: NaiveDate, from: NaiveDate) {
        self.touch_date(ledger_date);
        self.partial
            .entry(ledger_id)
            .and_modify(|(date, earliest)| {
                *date = ledger_date;
                *earliest = (*earliest).min(from);
            })
            .or_insert((ledger_date, from));
    }

    /// Records that the remaining balance at `date` changed without a
    /// specific ledger to partially recompute (ledger removed or moved away).
    pub fn touch_date(&mut self, date: NaiveDate) {
        self.boundary = Some(self.boundary.map_or(date, |b| b.min(date)));
    }

    /// Earliest ledger date affected.
    #[must_use]
    pub fn boundary(&self) -> Option<NaiveDate> {
        self.boundary
    }

    /// Returns true when nothing was touched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boundary.is_none()
    }

    /// Ledgers that must be loaded for [`recompute`], in timeline order.
    ///
    /// The timeline must already reflect the current date of every ledger.
    #[must_use]
    pub fn scope(&self, timeline: &TimelineIndex) -> Vec<LedgerId> {
        let Some(boundary) = self.boundary else {
            return Vec::new();
        };
        let mut ids: Vec<LedgerId> = timeline
            .on(boundary)
            .filter(|id| self.partial.contains_key(id))
            .collect();
        ids.extend(timeline.after(boundary).map(|(_, id)| id));
        ids
    }

    fn partial_start(&self, ledger: &Ledger) -> Option<NaiveDate> {
        let boundary = self.boundary?;
        if ledger.transaction_date != boundary {
            return None;
        }
        self.partial.get(&ledger.id).map(|(_, from)| *from)
    }
}

/// Cost and effect of a recompute pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeOutcome {
    /// Ledgers whose aggregates changed.
    pub changed_ledgers: Vec<LedgerId>,
    /// Entries whose balance changed.
    pub changed_entries: Vec<JournalEntryId>,
    /// Entries whose balance was re-derived.
    pub entries_recomputed: usize,
    /// Ledgers visited.
    pub ledgers_recomputed: usize,
}

/// Re-derives balances and aggregates for every slice inside the plan's scope.
///
/// Slices outside the scope are left alone. The timeline is updated as each
/// ledger is processed so later ledgers are seeded from the new values.
///
/// # Errors
///
/// - [`LedgerError::LedgerPosted`] if a posted ledger's values would change
/// - [`LedgerError::BalanceOverflow`] if a total or running balance leaves the
///   representable range
/// - [`LedgerError::BrokenChain`] if an entry belongs to another ledger,
///   carries both sides or a negative amount, the totals do not reconcile, or
///   the entries a partial pass keeps do not chain from the seed
pub fn recompute(
    timeline: &mut TimelineIndex,
    slices: &mut [LedgerSlice],
    plan: &CascadePlan,
    now: DateTime<Utc>,
) -> LedgerResult<CascadeOutcome> {
    let mut outcome = CascadeOutcome::default();
    let Some(boundary) = plan.boundary() else {
        return Ok(outcome);
    };

    slices.sort_by_key(|s| (s.ledger.transaction_date, s.ledger.id));

    for slice in slices.iter_mut() {
        let date = slice.ledger.transaction_date;
        if date < boundary {
            continue;
        }
        let start_from = plan.partial_start(&slice.ledger);
        if date == boundary && start_from.is_none() {
            continue;
        }

        outcome.ledgers_recomputed += 1;
        let seed = timeline.previous_day_balance(date);
        recompute_slice(slice, seed, start_from, now, &mut outcome)?;
        timeline.upsert(
            date,
            slice.ledger.id,
            slice.ledger.remaining_balance,
            slice.ledger.last_entry_id,
        );
    }

    Ok(outcome)
}

fn recompute_slice(
    slice: &mut LedgerSlice,
    seed: Decimal,
    start_from: Option<NaiveDate>,
    now: DateTime<Utc>,
    outcome: &mut CascadeOutcome,
) -> LedgerResult<()> {
    let ledger_id = slice.ledger.id;
    let posted = slice.ledger.is_posted;
    if !slice.ledger.totals_consistent() {
        return Err(LedgerError::BrokenChain {
            ledger_id,
            detail: "total_balance does not equal total_debit - total_credit".into(),
        });
    }
    slice.entries.sort_by_key(JournalEntry::sort_key);

    let start = start_from.map_or(0, |from| {
        slice.entries.partition_point(|e| e.transaction_date < from)
    });
    // Kept entries are trusted only if they still chain from the seed.
    let mut running = verify_chain(ledger_id, &slice.entries[..start], seed)?;

    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;

    for (idx, entry) in slice.entries.iter_mut().enumerate() {
        total_debit = checked_sum(total_debit, entry.debit)?;
        total_credit = checked_sum(total_credit, entry.credit)?;
        if idx < start {
            continue;
        }

        check_entry(ledger_id, entry)?;
        running = checked_sum(running, entry.net())?;
        outcome.entries_recomputed += 1;
        if entry.balance != running {
            if posted {
                return Err(LedgerError::LedgerPosted(ledger_id));
            }
            entry.balance = running;
            entry.updated_at = now;
            outcome.changed_entries.push(entry.id);
        }
    }

    let remaining = slice.entries.last().map_or(seed, |e| e.balance);
    let last_entry = slice.entries.iter().map(|e| e.id).max();

    let mut candidate = slice.ledger.clone();
    let mut changed = candidate.apply_aggregate(total_debit, total_credit, remaining, now);
    if candidate.last_entry_id != last_entry {
        candidate.last_entry_id = last_entry;
        candidate.updated_at = now;
        changed = true;
    }
    if changed {
        if posted {
            return Err(LedgerError::LedgerPosted(ledger_id));
        }
        slice.ledger = candidate;
        outcome.changed_ledgers.push(ledger_id);
    }
    Ok(())
}

fn checked_sum(lhs: Decimal, rhs: Decimal) -> LedgerResult<Decimal> {
    lhs.checked_add(rhs).ok_or(LedgerError::BalanceOverflow)
}

fn check_entry(ledger_id: LedgerId, entry: &JournalEntry) -> LedgerResult<()> {
    let detail = if entry.ledger_id != ledger_id {
        format!("entry {} belongs to ledger {}", entry.id, entry.ledger_id)
    } else if !entry.debit.is_zero() && !entry.credit.is_zero() {
        format!("entry {} carries both debit and credit", entry.id)
    } else if is_negative(entry.debit) || is_negative(entry.credit) {
        format!("entry {} carries a negative amount", entry.id)
    } else {
        return Ok(());
    };
    Err(LedgerError::BrokenChain { ledger_id, detail })
}

fn is_negative(amount: Decimal) -> bool {
    amount.is_sign_negative() && !amount.is_zero()
}

/// Verifies stored balances against a chain seeded by `seed` without modifying them.
///
/// `entries` must already be ordered by `(transaction_date, id)`. Returns the
/// balance after the last entry, or `seed` when there are none.
///
/// # Errors
///
/// Returns [`LedgerError::BrokenChain`] at the first entry whose stored
/// balance does not follow from its predecessor, and
/// [`LedgerError::BalanceOverflow`] if the chain leaves the representable range.
pub fn verify_chain(
    ledger_id: LedgerId,
    entries: &[JournalEntry],
    seed: Decimal,
) -> LedgerResult<Decimal> {
    let mut running = seed;
    for entry in entries {
        check_entry(ledger_id, entry)?;
        running = checked_sum(running, entry.net())?;
        if entry.balance != running {
            return Err(LedgerError::BrokenChain {
                ledger_id,
                detail: format!(
                    "entry {} has balance {} but chain gives {}",
                    entry.id, entry.balance, running
                ),
            });
        }
    }
    Ok(running)
}
