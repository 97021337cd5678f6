//! Currency-agnostic monetary amounts using decimal arithmetic.
//!
//! The API reports prices and order totals as bare numbers in the
//! distributor's single trading currency, so no currency code is carried.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in the store currency's standard unit.
///
/// Addition saturates at the decimal range instead of panicking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price, or `None` when the
    /// result does not fit in a decimal.
    #[must_use]
    pub fn checked_times(self, quantity: i64) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_times_quantity() {
        let unit = Money::new(Decimal::new(1250, 2));
        assert_eq!(unit.checked_times(4), Some(Money::new(Decimal::new(50, 0))));
    }

    #[test]
    fn test_times_out_of_range() {
        assert_eq!(Money::new(Decimal::MAX).checked_times(2), None);
        assert_eq!(Money::new(Decimal::MAX).checked_times(1), Some(Money::new(Decimal::MAX)));
    }

    #[test]
    fn test_addition_saturates() {
        let mut total = Money::new(Decimal::MAX);
        total += Money::new(Decimal::ONE);
        assert_eq!(total, Money::new(Decimal::MAX));
        assert_eq!(
            [Money::new(Decimal::MIN), Money::new(Decimal::NEGATIVE_ONE)].iter().sum::<Money>(),
            Money::new(Decimal::MIN)
        );
    }

    #[test]
    fn test_display_two_places() {
        assert_eq!(Money::new(Decimal::new(15, 0)).to_string(), "15.00");
        assert_eq!(Money::new(Decimal::new(8905, 1)).to_string(), "890.50");
    }

    #[test]
    fn test_sum_of_empty_is_zero() {
        let total: Money = Vec::<Money>::new().into_iter().sum();
        assert!(total.is_zero());
    }

    #[test]
    fn test_equality_ignores_scale() {
        assert_eq!(Money::new(Decimal::new(125, 1)), Money::new(Decimal::new(1250, 2)));
    }
}
