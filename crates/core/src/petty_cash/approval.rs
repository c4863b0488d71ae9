//! Petty cash approval.
//!
//! Approval is one-way: it stamps the entry and produces exactly one journal
//! line dated the approval day, inside a ledger that already has journal
//! activity on that day.

use chrono::{DateTime, NaiveDate, Utc};
use ledgerline_shared::types::LedgerId;

use super::types::PettyCash;
use crate::error::{LedgerError, LedgerResult};
use crate::journal::NewJournalEntry;
use crate::ledger::Ledger;

/// Fails if the entry was already approved.
pub fn check_approvable(petty_cash: &PettyCash) -> LedgerResult<()> {
    if petty_cash.is_approved {
        return Err(LedgerError::AlreadyApproved(petty_cash.id));
    }
    Ok(())
}

/// Fails if the entry is approved and therefore immutable.
pub fn check_mutable(petty_cash: &PettyCash) -> LedgerResult<()> {
    if petty_cash.is_approved {
        return Err(LedgerError::PettyCashApproved(petty_cash.id));
    }
    Ok(())
}

/// Chooses the ledger that receives the converted line.
///
/// `candidates` are ledgers with at least one journal line dated `today`.
/// The open ledger with the lowest id wins.
///
/// # Errors
///
/// - [`LedgerError::NoLedgerForDate`] if there is no candidate
/// - [`LedgerError::LedgerPosted`] if every candidate is posted
pub fn select_ledger<'a, I>(candidates: I, today: NaiveDate) -> LedgerResult<LedgerId>
where
    I: IntoIterator<Item = &'a Ledger>,
{
    let mut first_posted = None;
    let mut best: Option<LedgerId> = None;
    for ledger in candidates {
        if ledger.is_posted {
            first_posted = Some(first_posted.map_or(ledger.id, |id: LedgerId| id.min(ledger.id)));
        } else {
            best = Some(best.map_or(ledger.id, |id| id.min(ledger.id)));
        }
    }
    match (best, first_posted) {
        (Some(id), _) => Ok(id),
        (None, Some(id)) => Err(LedgerError::LedgerPosted(id)),
        (None, None) => Err(LedgerError::NoLedgerForDate(today)),
    }
}

/// Marks the entry approved into `ledger_id`.
pub fn approve(petty_cash: &mut PettyCash, ledger_id: LedgerId, today: NaiveDate, now: DateTime<Utc>) {
    petty_cash.is_approved = true;
    petty_cash.approved_date = Some(today);
    petty_cash.ledger_id = Some(ledger_id);
    petty_cash.updated_at = now;
}

/// Builds the journal line an approved entry converts into.
#[must_use]
pub fn to_journal_entry(petty_cash: &PettyCash, ledger_id: LedgerId, today: NaiveDate) -> NewJournalEntry {
    NewJournalEntry {
        ledger_id,
        account_id: petty_cash.account_id,
        transaction_date: today,
        description: petty_cash.description.clone(),
        debit: petty_cash.debit,
        credit: petty_cash.credit,
        petty_cash_id: Some(petty_cash.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerline_shared::types::{AccountId, PettyCashId, UserId};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2013, 9, 11).unwrap()
    }

    fn petty() -> PettyCash {
        PettyCash {
            id: PettyCashId(4),
            ledger_id: None,
            account_id: AccountId(101),
            user_id: UserId(1),
            description: Some("Bensin".into()),
            transaction_date: NaiveDate::from_ymd_opt(2013, 9, 10).unwrap(),
            debit: Decimal::ZERO,
            credit: dec!(75000),
            balance: dec!(-75000),
            is_approved: false,
            approved_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn ledger(id: i64, posted: bool) -> Ledger {
        let mut l = Ledger::new(LedgerId(id), today(), "10000000".into(), None, Utc::now());
        if posted {
            l.mark_posted(Utc::now());
        }
        l
    }

    #[test]
    fn test_approve_once() {
        let mut pc = petty();
        check_approvable(&pc).unwrap();
        approve(&mut pc, LedgerId(2), today(), Utc::now());
        assert!(pc.is_approved);
        assert_eq!(pc.ledger_id, Some(LedgerId(2)));
        assert_eq!(pc.approved_date, Some(today()));
        assert_eq!(check_approvable(&pc).unwrap_err(), LedgerError::AlreadyApproved(PettyCashId(4)));
        assert_eq!(check_mutable(&pc).unwrap_err(), LedgerError::PettyCashApproved(PettyCashId(4)));
    }

    #[test]
    fn test_journal_line_is_dated_today_and_back_references() {
        let line = to_journal_entry(&petty(), LedgerId(2), today());
        assert_eq!(line.transaction_date, today());
        assert_eq!(line.petty_cash_id, Some(PettyCashId(4)));
        assert_eq!(line.credit, dec!(75000));
        assert_eq!(line.account_id, AccountId(101));
    }

    #[test]
    fn test_select_ledger() {
        let ledgers = [ledger(5, false), ledger(3, true), ledger(4, false)];
        assert_eq!(select_ledger(&ledgers, today()).unwrap(), LedgerId(4));

        let posted = [ledger(3, true)];
        assert_eq!(
            select_ledger(&posted, today()).unwrap_err(),
            LedgerError::LedgerPosted(LedgerId(3))
        );

        assert_eq!(
            select_ledger([], today()).unwrap_err(),
            LedgerError::NoLedgerForDate(today())
        );
    }
}
