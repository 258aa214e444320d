//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    ZAR,
    USD,
    EUR,
    GBP,
}

impl Currency {
    /// Get the currency code (e.g., "ZAR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::ZAR => "ZAR",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
        }
    }

    /// Get the currency symbol (e.g., "R").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::ZAR => "R",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "ZAR" => Some(Currency::ZAR),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in cents. All arithmetic is checked; overflow and
/// currency mismatches surface as `None` from the `try_*` methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use bazaar_commerce::money::{Currency, Money};
    /// let price = Money::from_decimal(100.0, Currency::ZAR);
    /// assert_eq!(price.amount_cents, 10000);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        Self::new((amount * 100.0).round() as i64, currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }

    /// Format as a display string (e.g., "R630.00").
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency.symbol(), self.to_decimal())
    }

    /// Try to add another Money value.
    ///
    /// Returns `None` on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        let amount = self.amount_cents.checked_add(other.amount_cents)?;
        Some(Money::new(amount, self.currency))
    }

    /// Try to multiply by a scalar. Returns `None` on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        let amount = self.amount_cents.checked_mul(factor)?;
        Some(Money::new(amount, self.currency))
    }

    /// Try to sum an iterator of Money values.
    ///
    /// Returns `None` on currency mismatch or overflow.
    pub fn try_sum<'a>(iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        let mut total = Money::zero(currency);
        for m in iter {
            total = total.try_add(m)?;
        }
        Some(total)
    }

    /// Apply a percentage discount, rounding once.
    ///
    /// `percent` is in 0..=100; e.g. 10.0 turns R700.00 into R630.00.
    pub fn percentage_off(&self, percent: f64) -> Money {
        let factor = 1.0 - percent / 100.0;
        let amount = (self.amount_cents as f64 * factor).round() as i64;
        Money::new(amount, self.currency)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_cents() {
        let m = Money::new(10000, Currency::ZAR);
        assert_eq!(m.amount_cents, 10000);
        assert_eq!(m.currency, Currency::ZAR);
    }

    #[test]
    fn test_money_from_decimal() {
        let m = Money::from_decimal(49.99, Currency::ZAR);
        assert_eq!(m.amount_cents, 4999);
    }

    #[test]
    fn test_money_display() {
        let m = Money::new(63000, Currency::ZAR);
        assert_eq!(m.display(), "R630.00");
    }

    #[test]
    fn test_try_add() {
        let a = Money::new(1000, Currency::ZAR);
        let b = Money::new(500, Currency::ZAR);
        assert_eq!(a.try_add(&b).unwrap().amount_cents, 1500);
    }

    #[test]
    fn test_try_add_currency_mismatch() {
        let zar = Money::new(1000, Currency::ZAR);
        let usd = Money::new(1000, Currency::USD);
        assert!(zar.try_add(&usd).is_none());
    }

    #[test]
    fn test_try_multiply_overflow() {
        let m = Money::new(i64::MAX, Currency::ZAR);
        assert!(m.try_multiply(2).is_none());
    }

    #[test]
    fn test_try_sum() {
        let values = [
            Money::new(100, Currency::ZAR),
            Money::new(200, Currency::ZAR),
        ];
        let total = Money::try_sum(values.iter(), Currency::ZAR).unwrap();
        assert_eq!(total.amount_cents, 300);
    }

    #[test]
    fn test_percentage_off() {
        let m = Money::new(70000, Currency::ZAR);
        assert_eq!(m.percentage_off(10.0).amount_cents, 63000);
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("zar"), Some(Currency::ZAR));
        assert_eq!(Currency::from_code("INVALID"), None);
    }
}
