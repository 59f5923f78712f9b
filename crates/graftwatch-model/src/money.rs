use crate::ids::ParseError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

/// Non-negative monetary amount with exactly two fractional digits.
/// Backed by a fixed-point decimal, never binary floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub fn new(amount: Decimal) -> Result<Self, ParseError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ParseError::OutOfBounds(
                "money must not be negative".to_string(),
            ));
        }
        Ok(Self(amount.round_dp(2)))
    }

    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let amount = Decimal::from_str(raw.trim())
            .map_err(|_| ParseError::OutOfBounds(format!("not a decimal amount: {raw}")))?;
        Self::new(amount)
    }

    #[must_use]
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Canonical wire form: two fractional digits, no grouping.
    #[must_use]
    pub fn canonical_string(&self) -> String {
        format!("{:.2}", self.0)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Ownership share as a percentage in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Share(Decimal);

impl Share {
    pub fn new(pct: Decimal) -> Result<Self, ParseError> {
        if pct < Decimal::ZERO || pct > Decimal::from(100) {
            return Err(ParseError::OutOfBounds(format!(
                "share must be within [0, 100], got {pct}"
            )));
        }
        Ok(Self(pct))
    }

    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let pct = Decimal::from_str(raw.trim())
            .map_err(|_| ParseError::OutOfBounds(format!("not a decimal share: {raw}")))?;
        Self::new(pct)
    }

    #[must_use]
    pub const fn percent(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
