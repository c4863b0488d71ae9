//! Amount helpers.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is a `rust_decimal::Decimal` rounded to two places on input.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept for every stored amount.
pub const AMOUNT_SCALE: u32 = 2;

/// Maximum absolute difference at which debit and credit totals count as balanced.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 3);

/// Rounds an amount to two decimal places, half away from zero.
#[must_use]
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns true when `|debit - credit|` is below [`BALANCE_TOLERANCE`].
#[must_use]
pub fn is_balanced(debit: Decimal, credit: Decimal) -> bool {
    (debit - credit).abs() < BALANCE_TOLERANCE
}
