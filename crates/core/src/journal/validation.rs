//! Input validation for journal and petty cash lines.
//!
//! Amounts are rounded to two places, must be non-negative, and at most one
//! side of a line may be nonzero. A line with both sides zero is accepted.

use chrono::{DateTime, NaiveDate};
use ledgerline_shared::types::{AccountId, JournalEntryId, LedgerId, round_amount};
use rust_decimal::Decimal;

use super::types::{CreateJournalEntryInput, JournalEntry, JournalEntryPatch, NewJournalEntry};
use crate::error::{LedgerError, LedgerResult};

/// Parses `YYYY-MM-DD` or an RFC 3339 timestamp into a calendar date.
pub fn parse_date(field: &'static str, raw: &str) -> LedgerResult<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::MissingField(field));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|_| LedgerError::InvalidDate {
            field,
            value: trimmed.to_string(),
        })
}

/// Parses a required date field.
pub fn require_date(field: &'static str, raw: Option<&str>) -> LedgerResult<NaiveDate> {
    parse_date(field, raw.ok_or(LedgerError::MissingField(field))?)
}

/// Rounds an optional amount, defaulting to zero, and rejects negatives.
pub fn validate_amount(field: &'static str, amount: Option<Decimal>) -> LedgerResult<Decimal> {
    let value = round_amount(amount.unwrap_or(Decimal::ZERO));
    if value.is_sign_negative() && !value.is_zero() {
        return Err(LedgerError::NegativeAmount(field));
    }
    Ok(value)
}

/// Rejects a line with both sides nonzero.
pub fn validate_sides(debit: Decimal, credit: Decimal) -> LedgerResult<()> {
    if !debit.is_zero() && !credit.is_zero() {
        return Err(LedgerError::DebitAndCredit);
    }
    Ok(())
}

/// Normalizes a description: blank becomes `None`.
#[must_use]
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description.and_then(|d| {
        let trimmed = d.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Validates a create input.
pub fn validate_new_entry(input: CreateJournalEntryInput) -> LedgerResult<NewJournalEntry> {
    let ledger_id = input.ledger_id.ok_or(LedgerError::MissingField("ledger_id"))?;
    validate_with_defaults(input, ledger_id, None)
}

/// Validates a create input inside a reconcile, where ledger and date default
/// to the reconciled ones.
pub fn validate_reconcile_entry(
    input: CreateJournalEntryInput,
    ledger_id: LedgerId,
    date: NaiveDate,
) -> LedgerResult<NewJournalEntry> {
    let ledger_id = input.ledger_id.unwrap_or(ledger_id);
    validate_with_defaults(input, ledger_id, Some(date))
}

fn validate_with_defaults(
    input: CreateJournalEntryInput,
    ledger_id: LedgerId,
    default_date: Option<NaiveDate>,
) -> LedgerResult<NewJournalEntry> {
    let account_id = input.account_id.ok_or(LedgerError::MissingField("account_id"))?;
    let transaction_date = match (input.transaction_date.as_deref(), default_date) {
        (Some(raw), _) => parse_date("transaction_date", raw)?,
        (None, Some(date)) => date,
        (None, None) => return Err(LedgerError::MissingField("transaction_date")),
    };
    let debit = validate_amount("debit", input.debit)?;
    let credit = validate_amount("credit", input.credit)?;
    validate_sides(debit, credit)?;

    Ok(NewJournalEntry {
        ledger_id,
        account_id,
        transaction_date,
        description: normalize_description(input.description),
        debit,
        credit,
        petty_cash_id: None,
    })
}

/// A patch with its date parsed and amounts rounded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedPatch {
    /// New ledger.
    pub ledger_id: Option<LedgerId>,
    /// New account.
    pub account_id: Option<AccountId>,
    /// New date.
    pub transaction_date: Option<NaiveDate>,
    /// New description. `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New debit.
    pub debit: Option<Decimal>,
    /// New credit.
    pub credit: Option<Decimal>,
}

impl ValidatedPatch {
    /// Applies the patch and re-checks side exclusivity on the merged line.
    ///
    /// The balance is left untouched; the cascade recomputes it.
    pub fn apply(&self, entry: &mut JournalEntry) -> LedgerResult<()> {
        let debit = self.debit.unwrap_or(entry.debit);
        let credit = self.credit.unwrap_or(entry.credit);
        validate_sides(debit, credit)?;

        if let Some(ledger_id) = self.ledger_id {
            entry.ledger_id = ledger_id;
        }
        if let Some(account_id) = self.account_id {
            entry.account_id = account_id;
        }
        if let Some(date) = self.transaction_date {
            entry.transaction_date = date;
        }
        if let Some(description) = &self.description {
            entry.description.clone_from(description);
        }
        entry.debit = debit;
        entry.credit = credit;
        Ok(())
    }
}

/// Validates a patch. An empty patch is rejected.
pub fn validate_patch(patch: JournalEntryPatch) -> LedgerResult<ValidatedPatch> {
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
    if let (Some(d), Some(c)) = (debit, credit) {
        validate_sides(d, c)?;
    }

    Ok(ValidatedPatch {
        ledger_id: patch.ledger_id,
        account_id: patch.account_id,
        transaction_date,
        description: patch.description.map(|d| normalize_description(Some(d))),
        debit,
        credit,
    })
}

/// Rejects duplicate ids inside one batch update.
pub fn ensure_distinct(ids: &[JournalEntryId]) -> LedgerResult<()> {
    let mut seen = std::collections::BTreeSet::new();
    for id in ids {
        if !seen.insert(*id) {
            return Err(LedgerError::DuplicateEntry(*id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn input(debit: Option<Decimal>, credit: Option<Decimal>) -> CreateJournalEntryInput {
        CreateJournalEntryInput {
            ledger_id: Some(LedgerId(1)),
            account_id: Some(AccountId(110)),
            transaction_date: Some("2013-09-11".into()),
            description: Some("  Kas  ".into()),
            debit,
            credit,
        }
    }

    #[rstest]
    #[case("2013-09-11")]
    #[case("2013-09-11T00:00:00Z")]
    #[case("2013-09-11T23:30:00+07:00")]
    fn test_parse_date_accepts(#[case] raw: &str) {
        assert_eq!(
            parse_date("transaction_date", raw).unwrap(),
            NaiveDate::from_ymd_opt(2013, 9, 11).unwrap()
        );
    }

    #[rstest]
    #[case("11/09/2013")]
    #[case("2013-13-01")]
    #[case("yesterday")]
    fn test_parse_date_rejects(#[case] raw: &str) {
        assert!(matches!(
            parse_date("transaction_date", raw),
            Err(LedgerError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_blank_date_is_missing() {
        assert_eq!(
            parse_date("transaction_date", "  ").unwrap_err(),
            LedgerError::MissingField("transaction_date")
        );
    }

    #[test]
    fn test_valid_entry() {
        let e = validate_new_entry(input(Some(dec!(225000)), None)).unwrap();
        assert_eq!(e.debit, dec!(225000));
        assert_eq!(e.credit, dec!(0));
        assert_eq!(e.description.as_deref(), Some("Kas"));
    }

    #[test]
    fn test_amounts_rounded_to_cents() {
        let e = validate_new_entry(input(None, Some(dec!(10.005)))).unwrap();
        assert_eq!(e.credit, dec!(10.01));
    }

    #[test]
    fn test_both_sides_rejected() {
        assert_eq!(
            validate_new_entry(input(Some(dec!(1)), Some(dec!(1)))).unwrap_err(),
            LedgerError::DebitAndCredit
        );
    }

    #[test]
    fn test_zero_line_accepted() {
        let e = validate_new_entry(input(None, None)).unwrap();
        assert!(e.debit.is_zero() && e.credit.is_zero());
    }

    #[test]
    fn test_negative_rejected() {
        assert_eq!(
            validate_new_entry(input(Some(dec!(-5)), None)).unwrap_err(),
            LedgerError::NegativeAmount("debit")
        );
    }

    #[test]
    fn test_missing_fields() {
        let mut i = input(None, None);
        i.account_id = None;
        assert_eq!(
            validate_new_entry(i).unwrap_err(),
            LedgerError::MissingField("account_id")
        );

        let mut i = input(None, None);
        i.ledger_id = None;
        assert_eq!(
            validate_new_entry(i).unwrap_err(),
            LedgerError::MissingField("ledger_id")
        );

        let mut i = input(None, None);
        i.transaction_date = None;
        assert_eq!(
            validate_new_entry(i).unwrap_err(),
            LedgerError::MissingField("transaction_date")
        );
    }

    #[test]
    fn test_reconcile_defaults() {
        let mut i = input(Some(dec!(3)), None);
        i.ledger_id = None;
        i.transaction_date = None;
        let day = NaiveDate::from_ymd_opt(2013, 9, 12).unwrap();
        let e = validate_reconcile_entry(i, LedgerId(4), day).unwrap();
        assert_eq!(e.ledger_id, LedgerId(4));
        assert_eq!(e.transaction_date, day);
    }

    #[test]
    fn test_empty_patch_rejected() {
        assert_eq!(
            validate_patch(JournalEntryPatch::default()).unwrap_err(),
            LedgerError::EmptyUpdate
        );
    }

    #[test]
    fn test_patch_checks_merged_sides() {
        let entry = validate_new_entry(input(Some(dec!(100)), None))
            .unwrap()
            .into_entry(JournalEntryId(1), chrono::Utc::now());

        let patch = validate_patch(JournalEntryPatch {
            credit: Some(dec!(5)),
            ..Default::default()
        })
        .unwrap();
        let mut target = entry.clone();
        assert_eq!(patch.apply(&mut target).unwrap_err(), LedgerError::DebitAndCredit);
        assert_eq!(target, entry);

        let patch = validate_patch(JournalEntryPatch {
            debit: Some(dec!(0)),
            credit: Some(dec!(5)),
            description: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        let mut target = entry;
        patch.apply(&mut target).unwrap();
        assert_eq!(target.debit, dec!(0));
        assert_eq!(target.credit, dec!(5));
        assert_eq!(target.description, None);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        assert!(ensure_distinct(&[JournalEntryId(1), JournalEntryId(2)]).is_ok());
        assert_eq!(
            ensure_distinct(&[JournalEntryId(1), JournalEntryId(1)]).unwrap_err(),
            LedgerError::DuplicateEntry(JournalEntryId(1))
        );
    }
}
