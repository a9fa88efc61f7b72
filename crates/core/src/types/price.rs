//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is zero or negative.
    #[error("price must be greater than 0")]
    NotPositive,
    /// The amount has more than two decimal places.
    #[error("price may have at most 2 decimal places")]
    TooPrecise,
    /// The amount exceeds the representable range.
    #[error("price must be less than {max}")]
    TooLarge {
        /// Exclusive upper bound.
        max: Decimal,
    },
}

/// A strictly positive monetary amount with at most two decimal places.
///
/// Prices can only be obtained through [`Price::new`] (or
/// [`Price::from_cents`]), so a `Price` held anywhere in the system is
/// known to satisfy the catalog invariants. Serialized as a decimal
/// string to avoid float rounding on the wire.
///
/// ## Constraints
///
/// - Amount > 0
/// - At most 2 decimal places
/// - Amount < 100,000,000 (8 integer digits)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Exclusive upper bound on the amount.
    pub const MAX_AMOUNT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

    /// Validate and construct a `Price`.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not strictly positive, has
    /// more than two decimal places, or is out of range.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }

        if amount.normalize().scale() > 2 {
            return Err(PriceError::TooPrecise);
        }

        if amount >= Self::MAX_AMOUNT {
            return Err(PriceError::TooLarge {
                max: Self::MAX_AMOUNT,
            });
        }

        Ok(Self(amount))
    }

    /// Construct a `Price` from an integer number of cents.
    ///
    /// # Errors
    ///
    /// Returns an error if `cents` is zero, negative, or out of range.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The amount as a `Decimal`.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount as an integer number of cents.
    ///
    /// Infallible: the constructor guarantees the amount fits and has
    /// at most two decimal places.
    #[must_use]
    pub fn as_cents(&self) -> i64 {
        (self.0 * Decimal::ONE_HUNDRED).to_i64().unwrap_or(i64::MAX)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_new_valid() {
        assert!(Price::new(dec!(0.01)).is_ok());
        assert!(Price::new(dec!(50)).is_ok());
        assert!(Price::new(dec!(99999999.99)).is_ok());
    }

    #[test]
    fn test_new_rejects_zero_and_negative() {
        assert_eq!(Price::new(dec!(0)), Err(PriceError::NotPositive));
        assert_eq!(Price::new(dec!(-3.50)), Err(PriceError::NotPositive));
    }

    #[test]
    fn test_new_rejects_sub_cent_precision() {
        assert_eq!(Price::new(dec!(1.999)), Err(PriceError::TooPrecise));
    }

    #[test]
    fn test_trailing_zeros_are_fine() {
        // 2.500 normalizes to 2.5
        assert!(Price::new(dec!(2.500)).is_ok());
    }

    #[test]
    fn test_new_rejects_too_large() {
        assert!(matches!(
            Price::new(dec!(100000000)),
            Err(PriceError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_cents_roundtrip() {
        let price = Price::from_cents(1999).unwrap();
        assert_eq!(price.amount(), dec!(19.99));
        assert_eq!(price.as_cents(), 1999);
    }

    #[test]
    fn test_display() {
        let price = Price::new(dec!(5)).unwrap();
        assert_eq!(price.to_string(), "5.00");
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let err = serde_json::from_str::<Price>("\"-1.00\"");
        assert!(err.is_err());
    }
}
