//! Money type

use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

/// A monetary value represented as a decimal.
///
/// Used for deck prices. Displays with a dollar sign and exactly two
/// decimal places.
///
/// # Example
///
/// ```
/// use skatedeck_lib::model::Money;
/// use rust_decimal::Decimal;
///
/// let price = Money::new(Decimal::new(5999, 2)); // 59.99
/// assert_eq!(price.to_string(), "$59.99");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub Decimal);

impl Money {
    /// Creates a new Money value.
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the inner decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Creates a Money value from a whole number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Returns the value as a whole number of cents, rounded to the nearest
    /// cent. `None` if the value overflows an `i64` cent count.
    pub fn to_cents(&self) -> Option<i64> {
        use rust_decimal::prelude::ToPrimitive;
        (self.0.round_dp(2) * Decimal::new(100, 0)).to_i64()
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rounded = self.0.round_dp(2);
        rounded.rescale(2);
        write!(f, "${}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_cents() {
        assert_eq!(Money::from_cents(5999).to_string(), "$59.99");
        assert_eq!(Money::new(Decimal::new(60, 0)).to_string(), "$60.00");
        assert_eq!(Money::new(Decimal::new(605, 1)).to_string(), "$60.50");
    }

    #[test]
    fn test_cents_round_trip() {
        assert_eq!(Money::from_cents(8950).to_cents(), Some(8950));
        assert_eq!(Money::new(Decimal::new(60, 0)).to_cents(), Some(6000));
    }
}
