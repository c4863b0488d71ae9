//! Petty cash input validation.

use chrono::NaiveDate;
use ledgerline_shared::types::{AccountId, UserId};
use rust_decimal::Decimal;

use super::types::{CreatePettyCashInput, NewPettyCash, PettyCash, PettyCashPatch};
use crate::error::{LedgerError, LedgerResult};
use crate::journal::validation::{
    normalize_description, parse_date, require_date, validate_amount, validate_sides,
};

/// Validates a create input.
pub fn validate_new_petty_cash(input: CreatePettyCashInput) -> LedgerResult<NewPettyCash> {
    let account_id = input.account_id.ok_or(LedgerError::MissingField("account_id"))?;
    let user_id = input.user_id.ok_or(LedgerError::MissingField("user_id"))?;
    let transaction_date = require_date("transaction_date", input.transaction_date.as_deref())?;
    let debit = validate_amount("debit", input.debit)?;
    let credit = validate_amount("credit", input.credit)?;
    validate_sides(debit, credit)?;

    Ok(NewPettyCash {
        account_id,
        user_id,
        transaction_date,
        description: normalize_description(input.description),
        debit,
        credit,
    })
}

/// A petty cash patch with its date parsed and amounts rounded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedPettyCashPatch {
    /// New account.
    pub account_id: Option<AccountId>,
    /// New user.
    pub user_id: Option<UserId>,
    /// New date.
    pub transaction_date: Option<NaiveDate>,
    /// New description. `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New debit.
    pub debit: Option<Decimal>,
    /// New credit.
    pub credit: Option<Decimal>,
}

impl ValidatedPettyCashPatch {
    /// Applies the patch after checking side exclusivity on the merged entry.
    pub fn apply(&self, row: &mut PettyCash) -> LedgerResult<()> {
        let debit = self.debit.unwrap_or(row.debit);
        let credit = self.credit.unwrap_or(row.credit);
        validate_sides(debit, credit)?;

        if let Some(account_id) = self.account_id {
            row.account_id = account_id;
        }
        if let Some(user_id) = self.user_id {
            row.user_id = user_id;
        }
        if let Some(date) = self.transaction_date {
            row.transaction_date = date;
        }
        if let Some(description) = &self.description {
            row.description.clone_from(description);
        }
        row.debit = debit;
        row.credit = credit;
        Ok(())
    }
}

/// Validates a patch. An empty patch is rejected.
pub fn validate_petty_cash_patch(patch: PettyCashPatch) -> LedgerResult<ValidatedPettyCashPatch> {
    if patch.is_empty() {
        return Err(LedgerError::EmptyUpdate);
    }
    let transaction_date = patch
        .transaction_date
        .as_deref()
        .map(|raw| parse_date("transaction_date", raw))
        .transpose()?;
    let debit = patch.debit.map(|d| validate_amount("debit", Some(d))).transpose()?;
    let credit = patch.credit.map(|c| validate_amount("credit", Some(c))).transpose()?;

    Ok(ValidatedPettyCashPatch {
        account_id: patch.account_id,
        user_id: patch.user_id,
        transaction_date,
        description: patch.description.map(|d| normalize_description(Some(d))),
        debit,
        credit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input() -> CreatePettyCashInput {
        CreatePettyCashInput {
            account_id: Some(AccountId(101)),
            user_id: Some(UserId(1)),
            transaction_date: Some("2013-09-11".into()),
            description: None,
            debit: Some(dec!(50000)),
            credit: None,
        }
    }

    #[test]
    fn test_valid_input() {
        let pc = validate_new_petty_cash(input()).unwrap();
        assert_eq!(pc.debit, dec!(50000));
        assert_eq!(pc.credit, dec!(0));
    }

    #[test]
    fn test_user_required() {
        let mut i = input();
        i.user_id = None;
        assert_eq!(
            validate_new_petty_cash(i).unwrap_err(),
            LedgerError::MissingField("user_id")
        );
    }

    #[test]
    fn test_both_sides_rejected() {
        let mut i = input();
        i.credit = Some(dec!(1));
        assert_eq!(validate_new_petty_cash(i).unwrap_err(), LedgerError::DebitAndCredit);
    }

    #[test]
    fn test_patch_merges_sides() {
        let mut row = validate_new_petty_cash(input())
            .unwrap()
            .into_petty_cash(ledgerline_shared::types::PettyCashId(1), chrono::Utc::now());
        let patch = validate_petty_cash_patch(PettyCashPatch {
            credit: Some(dec!(3)),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(patch.apply(&mut row).unwrap_err(), LedgerError::DebitAndCredit);

        let patch = validate_petty_cash_patch(PettyCashPatch {
            debit: Some(dec!(0)),
            credit: Some(dec!(3)),
            ..Default::default()
        })
        .unwrap();
        patch.apply(&mut row).unwrap();
        assert_eq!(row.credit, dec!(3));
    }
}
