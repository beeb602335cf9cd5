use serde::{Deserialize, Serialize};

use doorx_core::{DomainError, DomainResult, ValueObject, impl_value_object_equality};

use crate::errors::codes;

/// A non-negative monetary amount.
///
/// Amounts are kept in the smallest currency unit (e.g. cents) to avoid
/// floating-point rounding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Money {
    amount_minor: i64,
    currency: String,
}

impl Money {
    pub const DEFAULT_CURRENCY: &'static str = "USD";

    /// Validate and build an amount. The currency code is trimmed and upper-cased.
    pub fn new(amount_minor: i64, currency: &str) -> DomainResult<Self> {
        if amount_minor < 0 {
            return Err(DomainError::validation(
                codes::MONEY_AMOUNT,
                "amount cannot be negative",
            ));
        }

        let currency = currency.trim();
        if currency.is_empty() {
            return Err(DomainError::validation(
                codes::MONEY_CURRENCY,
                "currency is required",
            ));
        }

        Ok(Self {
            amount_minor,
            currency: currency.to_uppercase(),
        })
    }

    pub fn usd(amount_minor: i64) -> DomainResult<Self> {
        Self::new(amount_minor, Self::DEFAULT_CURRENCY)
    }

    pub fn zero() -> Self {
        Self {
            amount_minor: 0,
            currency: Self::DEFAULT_CURRENCY.to_string(),
        }
    }

    pub fn amount_minor(&self) -> i64 {
        self.amount_minor
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

impl ValueObject for Money {
    type Components = (i64, String);

    fn equality_components(&self) -> Self::Components {
        (self.amount_minor, self.currency.clone())
    }
}

impl_value_object_equality!(Money);

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} {}.{:02}",
            self.currency,
            self.amount_minor / 100,
            self.amount_minor % 100
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doorx_core::ErrorKind;

    #[test]
    fn normalizes_currency() {
        let m = Money::new(15000, " usd ").unwrap();
        assert_eq!(m.currency(), "USD");
        assert_eq!(m, Money::usd(15000).unwrap());
    }

    #[test]
    fn rejects_negative_amount() {
        let err = Money::usd(-1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.code(), codes::MONEY_AMOUNT);
    }

    #[test]
    fn rejects_blank_currency() {
        let err = Money::new(100, "  ").unwrap_err();
        assert_eq!(err.code(), codes::MONEY_CURRENCY);
    }

    #[test]
    fn zero_is_usd() {
        assert_eq!(Money::zero(), Money::usd(0).unwrap());
    }

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Money::usd(15000).unwrap().to_string(), "USD 150.00");
        assert_eq!(Money::new(5, "eur").unwrap().to_string(), "EUR 0.05");
    }

    #[test]
    fn differing_currency_is_not_equal() {
        assert_ne!(Money::usd(100).unwrap(), Money::new(100, "EUR").unwrap());
    }
}
