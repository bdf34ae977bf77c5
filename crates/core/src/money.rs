//! Cash amounts in the account's single unit of account.

use core::ops::{Add, Sub};
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Signed decimal amount of cash (balances, prices, costs, proceeds).
///
/// Backed by `rust_decimal::Decimal`, so `150.0 * 2` is exactly `300` and a
/// buy followed by a sell at the same price restores the balance bit-for-bit.
///
/// `Display` prints the normalized value (`500`, `0.5`) unless a precision is
/// requested, in which case it rounds: `format!("{:.2}", amount)`.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl ValueObject for Amount {}

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    /// Strictly greater than zero.
    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Strictly less than zero.
    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn checked_add(self, other: Amount) -> DomainResult<Amount> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or_else(|| DomainError::overflow(format!("{self} + {other}")))
    }

    pub fn checked_sub(self, other: Amount) -> DomainResult<Amount> {
        self.0
            .checked_sub(other.0)
            .map(Amount)
            .ok_or_else(|| DomainError::overflow(format!("{self} - {other}")))
    }

    /// Price × share count.
    pub fn checked_mul_qty(self, quantity: u64) -> DomainResult<Amount> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map(Amount)
            .ok_or_else(|| DomainError::overflow(format!("{self} * {quantity}")))
    }
}

/// Unchecked; panics on overflow like `Decimal`. Aggregates only use these in
/// `apply`, after `handle` has proven the result fits.
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        Amount(self.0 - rhs.0)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<Amount> for Decimal {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl FromStr for Amount {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Decimal::from_str(trimmed)
            .map(Amount)
            .map_err(|e| DomainError::invalid_amount(format!("'{trimmed}' is not a decimal number ({e})")))
    }
}

impl core::fmt::Display for Amount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let value = match f.precision() {
            Some(precision) => self
                .0
                .round_dp_with_strategy(precision as u32, RoundingStrategy::MidpointAwayFromZero),
            None => self.0.normalize(),
        };
        // Decimal's Display applies the precision, width, fill and alignment.
        core::fmt::Display::fmt(&value, f)
    }
}
