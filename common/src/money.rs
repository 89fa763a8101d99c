use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure modes for `Money` construction and arithmetic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("currency code must be a non-empty 3-letter code, got {0:?}")]
    InvalidCurrency(String),

    #[error("amount cannot be negative")]
    NegativeAmount,

    #[error("currency mismatch: {lhs} vs {rhs}")]
    CurrencyMismatch { lhs: String, rhs: String },

    #[error("operation would result in a negative balance")]
    NegativeResult,
}

/// Immutable monetary value: an arbitrary-precision integer amount in minor
/// units plus a 3-letter currency code. Every operation returns a new value;
/// there is no in-place mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: BigInt,
    currency: String,
}

fn normalize_currency(currency: &str) -> Result<String, MoneyError> {
    let upper = currency.trim().to_uppercase();
    if upper.len() != 3 {
        return Err(MoneyError::InvalidCurrency(currency.to_string()));
    }
    Ok(upper)
}

impl Money {
    /// Constructs a `Money` value from an externally supplied amount (wire
    /// payloads, HTTP request bodies). Rejects a negative amount: external
    /// inputs never get to express "negative money" directly, only through
    /// subtraction that a wallet is free to reject.
    pub fn new(amount: BigInt, currency: &str) -> Result<Self, MoneyError> {
        if amount.is_negative() {
            return Err(MoneyError::NegativeAmount);
        }
        Ok(Self {
            amount,
            currency: normalize_currency(currency)?,
        })
    }

    /// Constructs the zero value for a currency. Always succeeds once the
    /// currency code itself is well-formed.
    pub fn zero(currency: &str) -> Result<Self, MoneyError> {
        Ok(Self {
            amount: BigInt::zero(),
            currency: normalize_currency(currency)?,
        })
    }

    /// Internal constructor used by arithmetic results, which may be
    /// transiently negative before the caller decides what that means.
    fn from_parts(amount: BigInt, currency: String) -> Self {
        Self { amount, currency }
    }

    pub fn amount(&self) -> BigInt {
        self.amount.clone()
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.amount.is_negative()
    }

    fn check_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                lhs: self.currency.clone(),
                rhs: other.currency.clone(),
            });
        }
        Ok(())
    }

    /// Adds two amounts of the same currency.
    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.check_same_currency(other)?;
        Ok(Money::from_parts(
            &self.amount + &other.amount,
            self.currency.clone(),
        ))
    }

    /// Subtracts `other` from `self`. Fails on currency mismatch or if the
    /// result would be negative.
    pub fn subtract(&self, other: &Money) -> Result<Money, MoneyError> {
        self.check_same_currency(other)?;
        let result = &self.amount - &other.amount;
        if result.is_negative() {
            return Err(MoneyError::NegativeResult);
        }
        Ok(Money::from_parts(result, self.currency.clone()))
    }

    /// `self >= other`. Fails on currency mismatch.
    pub fn greater_than_or_equal(&self, other: &Money) -> Result<bool, MoneyError> {
        self.check_same_currency(other)?;
        Ok(self.amount >= other.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(v: i64) -> Money {
        Money::new(BigInt::from(v), "usd").unwrap()
    }

    #[test]
    fn normalizes_currency_case() {
        assert_eq!(usd(10).currency(), "USD");
    }

    #[test]
    fn rejects_non_three_letter_currency() {
        assert_eq!(
            Money::new(BigInt::from(1), "US").unwrap_err(),
            MoneyError::InvalidCurrency("US".to_string())
        );
    }

    #[test]
    fn rejects_negative_external_amount() {
        assert_eq!(
            Money::new(BigInt::from(-1), "USD").unwrap_err(),
            MoneyError::NegativeAmount
        );
    }

    #[test]
    fn add_identity() {
        let m = usd(1000);
        let zero = Money::zero("USD").unwrap();
        assert_eq!(m.add(&zero).unwrap(), m);
    }

    #[test]
    fn subtract_self_is_zero() {
        let m = usd(250);
        assert!(m.subtract(&m).unwrap().is_zero());
    }

    #[test]
    fn subtract_mismatched_currency_fails() {
        let usd = usd(100);
        let eur = Money::new(BigInt::from(100), "EUR").unwrap();
        assert!(matches!(
            usd.subtract(&eur),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn subtract_yielding_negative_fails() {
        let small = usd(10);
        let big = usd(20);
        assert_eq!(small.subtract(&big).unwrap_err(), MoneyError::NegativeResult);
    }

    #[test]
    fn greater_than_or_equal_cross_currency_fails() {
        let usd = usd(100);
        let eur = Money::new(BigInt::from(50), "EUR").unwrap();
        assert!(matches!(
            usd.greater_than_or_equal(&eur),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
    }
}
