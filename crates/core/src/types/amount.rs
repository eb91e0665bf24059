//! Quoted price amounts.

use core::fmt;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`QuoteAmount`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// The input is not a decimal number.
    #[error("amount is not a number: {0}")]
    NotANumber(String),
    /// The amount is zero or negative.
    #[error("amount must be greater than zero")]
    NotPositive,
}

/// A positive price in the store currency, rounded to cents.
///
/// Accepts JSON numbers and numeric strings; the admin dashboard sends
/// either depending on the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct QuoteAmount(Decimal);

impl QuoteAmount {
    /// Create an amount, rounding half-up to two decimal places.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::NotPositive`] if the rounded value is not
    /// greater than zero.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded <= Decimal::ZERO {
            return Err(AmountError::NotPositive);
        }
        Ok(Self(rounded))
    }

    /// The underlying decimal.
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Fixed two-decimal representation used for Shopify `Money` inputs.
    #[must_use]
    pub fn to_money_string(&self) -> String {
        format!("{:.2}", self.0)
    }
}

impl TryFrom<Decimal> for QuoteAmount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QuoteAmount> for Decimal {
    fn from(amount: QuoteAmount) -> Self {
        amount.0
    }
}

impl FromStr for QuoteAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = Decimal::from_str(trimmed)
            .map_err(|_| AmountError::NotANumber(trimmed.to_owned()))?;
        Self::new(value)
    }
}

impl fmt::Display for QuoteAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
