//! Property-based tests for line validation.

use ledgerline_shared::types::{AccountId, LedgerId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::types::CreateJournalEntryInput;
use super::validation::validate_new_entry;
use crate::error::LedgerError;

fn cents() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|c| Decimal::new(c, 2))
}

fn input(debit: Option<Decimal>, credit: Option<Decimal>) -> CreateJournalEntryInput {
    CreateJournalEntryInput {
        ledger_id: Some(LedgerId(1)),
        account_id: Some(AccountId(110)),
        transaction_date: Some("2013-09-11".into()),
        description: None,
        debit,
        credit,
    }
}

proptest! {
    #[test]
    fn prop_both_sides_nonzero_rejected(d in cents(), c in cents()) {
        prop_assert_eq!(
            validate_new_entry(input(Some(d), Some(c))).unwrap_err(),
            LedgerError::DebitAndCredit
        );
    }

    #[test]
    fn prop_single_side_accepted(amount in cents(), is_debit in any::<bool>()) {
        let (d, c) = if is_debit { (Some(amount), None) } else { (None, Some(amount)) };
        let entry = validate_new_entry(input(d, c)).unwrap();
        prop_assert_eq!(entry.debit + entry.credit, amount);
    }

    #[test]
    fn prop_amounts_keep_two_places(raw in 0i64..1_000_000_000i64, scale in 0u32..6) {
        let amount = Decimal::new(raw, scale);
        let entry = validate_new_entry(input(Some(amount), None)).unwrap();
        prop_assert!(entry.debit.scale() <= 2);
        prop_assert!((entry.debit - amount).abs() <= Decimal::new(5, 3));
    }
}
