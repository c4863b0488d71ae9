//! Ordered view of ledger remaining balances.
//!
//! The previous-day seed of any ledger is looked up across every ledger, not
//! only the one being edited. The store loads the slice of the timeline a
//! cascade needs into this index, and the cascade keeps it current as it
//! re-derives each ledger.
//!
//! A ledger without journal lines never seeds a later date. When several
//! ledgers with lines share the latest earlier date, the one holding the most
//! recent line wins.

use std::collections::BTreeMap;
use std::ops::Bound;

use chrono::NaiveDate;
use ledgerline_shared::types::{JournalEntryId, LedgerId};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Mark {
    remaining: Decimal,
    last_entry: Option<JournalEntryId>,
}

/// Remaining balance and latest line of every ledger keyed by `(transaction_date, id)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineIndex {
    entries: BTreeMap<(NaiveDate, LedgerId), Mark>,
}

impl TimelineIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a ledger's remaining balance and latest line.
    pub fn upsert(
        &mut self,
        date: NaiveDate,
        ledger_id: LedgerId,
        remaining: Decimal,
        last_entry: Option<JournalEntryId>,
    ) {
        self.entries.insert((date, ledger_id), Mark { remaining, last_entry });
    }

    /// Remaining balance carried into `date`.
    ///
    /// Taken from the latest earlier date that has a ledger with lines; on that
    /// date the ledger holding the highest line id wins. Returns zero when no
    /// such ledger exists.
    #[must_use]
    pub fn previous_day_balance(&self, date: NaiveDate) -> Decimal {
        let mut best: Option<(NaiveDate, JournalEntryId, Decimal)> = None;
        for ((day, _), mark) in self.entries.range(..(date, LedgerId(i64::MIN))).rev() {
            if best.is_some_and(|(best_day, ..)| *day < best_day) {
                break;
            }
            let Some(last) = mark.last_entry else {
                continue;
            };
            if best.is_none_or(|(_, best_last, _)| last > best_last) {
                best = Some((*day, last, mark.remaining));
            }
        }
        best.map_or(Decimal::ZERO, |(.., remaining)| remaining)
    }

    /// Ledgers dated strictly after `date`, in timeline order.
    pub fn after(&self, date: NaiveDate) -> impl Iterator<Item = (NaiveDate, LedgerId)> + '_ {
        self.entries
            .range((Bound::Excluded((date, LedgerId(i64::MAX))), Bound::Unbounded))
            .map(|(key, _)| *key)
    }

    /// Ledgers dated exactly `date`, ordered by id.
    pub fn on(&self, date: NaiveDate) -> impl Iterator<Item = LedgerId> + '_ {
        self.entries
            .range((date, LedgerId(i64::MIN))..=(date, LedgerId(i64::MAX)))
            .map(|((_, id), _)| *id)
    }

    #[cfg(test)]
    pub(crate) fn get(&self, date: NaiveDate, ledger_id: LedgerId) -> Option<Decimal> {
        self.entries.get(&(date, ledger_id)).map(|mark| mark.remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2013, 9, day).unwrap()
    }

    fn line(id: i64) -> Option<JournalEntryId> {
        Some(JournalEntryId(id))
    }

    #[test]
    fn test_empty_index_seeds_zero() {
        assert_eq!(TimelineIndex::new().previous_day_balance(d(11)), dec!(0));
    }

    #[test]
    fn test_previous_day_is_strictly_before() {
        let mut idx = TimelineIndex::new();
        idx.upsert(d(10), LedgerId(1), dec!(100), line(1));
        idx.upsert(d(11), LedgerId(2), dec!(250), line(2));
        assert_eq!(idx.previous_day_balance(d(11)), dec!(100));
        assert_eq!(idx.previous_day_balance(d(12)), dec!(250));
        assert_eq!(idx.previous_day_balance(d(10)), dec!(0));
    }

    #[test]
    fn test_gap_days_use_latest_earlier_ledger() {
        let mut idx = TimelineIndex::new();
        idx.upsert(d(2), LedgerId(1), dec!(40), line(1));
        assert_eq!(idx.previous_day_balance(d(20)), dec!(40));
    }

    #[test]
    fn test_same_date_latest_line_wins() {
        let mut idx = TimelineIndex::new();
        idx.upsert(d(10), LedgerId(7), dec!(70), line(4));
        idx.upsert(d(10), LedgerId(3), dec!(30), line(9));
        assert_eq!(idx.previous_day_balance(d(11)), dec!(30));
    }

    #[test]
    fn test_empty_ledger_never_seeds() {
        let mut idx = TimelineIndex::new();
        idx.upsert(d(10), LedgerId(1), dec!(500), line(1));
        idx.upsert(d(10), LedgerId(2), dec!(0), None);
        idx.upsert(d(11), LedgerId(3), dec!(0), None);
        assert_eq!(idx.previous_day_balance(d(12)), dec!(500));
    }

    #[test]
    fn test_after_and_on() {
        let mut idx = TimelineIndex::new();
        idx.upsert(d(10), LedgerId(1), dec!(1), None);
        idx.upsert(d(11), LedgerId(2), dec!(2), None);
        idx.upsert(d(11), LedgerId(5), dec!(5), None);
        idx.upsert(d(12), LedgerId(3), dec!(3), None);

        let after: Vec<_> = idx.after(d(10)).collect();
        assert_eq!(
            after,
            vec![(d(11), LedgerId(2)), (d(11), LedgerId(5)), (d(12), LedgerId(3))]
        );
        let on: Vec<_> = idx.on(d(11)).collect();
        assert_eq!(on, vec![LedgerId(2), LedgerId(5)]);
        assert_eq!(idx.get(d(11), LedgerId(5)), Some(dec!(5)));
        assert_eq!(idx.get(d(11), LedgerId(9)), None);
    }
}
