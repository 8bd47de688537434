//! Checked decimal arithmetic.
//!
//! Every running total in the engine goes through these helpers so that
//! overflow surfaces as [`LedgerError::ArithmeticOverflow`] instead of a panic
//! or a silently wrong figure.

use crate::core::error::LedgerError;
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn add(a: Decimal, b: Decimal, context: &'static str) -> Result<Decimal, LedgerError> {
    a.checked_add(b)
        .ok_or(LedgerError::ArithmeticOverflow { context })
}

pub fn sub(a: Decimal, b: Decimal, context: &'static str) -> Result<Decimal, LedgerError> {
    a.checked_sub(b)
        .ok_or(LedgerError::ArithmeticOverflow { context })
}

/// Sum an iterator of amounts, failing on overflow.
pub fn sum<I>(amounts: I, context: &'static str) -> Result<Decimal, LedgerError>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| add(acc, amount, context))
}

/// Parse a decimal amount from user-supplied text.
///
/// Accepts plain and scientific notation; rejects anything `Decimal` cannot
/// represent exactly rather than rounding it.
pub fn parse(field: impl Into<String>, value: &str) -> Result<Decimal, LedgerError> {
    let trimmed = value.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| LedgerError::InvalidAmount {
            field: field.into(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}
