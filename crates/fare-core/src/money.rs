//! # Money Module
//!
//! Provides the `Money` type for cash amounts.
//!
//! ## Whole Units Only
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Fare collection happens in banknotes and coins of ONE currency.        │
//! │                                                                         │
//! │    fare 15, passenger hands over 50  →  change 35                       │
//! │                                                                         │
//! │  Every amount is an integer count of the currency's unit. No floats,   │
//! │  no sub-units, no conversion. The display symbol ("Br") is config.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fare_core::money::Money;
//!
//! let fare = Money::from_units(15);
//! let paid = Money::from_units(50);
//!
//! assert_eq!((paid - fare).positive_part(), Money::from_units(35));
//! assert_eq!((fare - paid).positive_part(), Money::zero());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A cash amount in whole currency units.
///
/// ## Design Decisions
/// - **i64 (signed)**: Differences such as the discrepancy may be negative
/// - **Single field tuple struct**: Serializes as a bare JSON integer, which
///   is exactly what the persisted snapshot stores
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from whole currency units.
    ///
    /// ## Example
    /// ```rust
    /// use fare_core::money::Money;
    ///
    /// let fare = Money::from_units(20);
    /// assert_eq!(fare.units(), 20);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the amount in whole currency units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Returns `max(0, self)`.
    ///
    /// This is the shape of both change (`paid - fare`) and amount due
    /// (`fare - paid`): only the positive side means anything.
    #[inline]
    pub const fn positive_part(&self) -> Self {
        if self.0 > 0 {
            Money(self.0)
        } else {
            Money(0)
        }
    }

    /// Adds without overflowing.
    ///
    /// Same as `+`; kept as a named call for the payment path.
    #[inline]
    pub const fn saturating_add(&self, other: Money) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Payments and fares have no upper bound, so every operator saturates at the
// i64 limits instead of panicking or wrapping.

/// Shows the bare number; the front end appends the currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by a head count (theoretical revenue = count × fare).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, count: i64) -> Self {
        Money(self.0.saturating_mul(count))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_units() {
        let money = Money::from_units(35);
        assert_eq!(money.units(), 35);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_units(50)), "50");
        assert_eq!(format!("{}", Money::from_units(-5)), "-5");
        assert_eq!(format!("{}", Money::zero()), "0");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(50);
        let b = Money::from_units(15);

        assert_eq!((a + b).units(), 65);
        assert_eq!((a - b).units(), 35);
        assert_eq!((b * 4).units(), 60);
    }

    #[test]
    fn test_positive_part() {
        assert_eq!(Money::from_units(35).positive_part().units(), 35);
        assert_eq!(Money::from_units(-35).positive_part().units(), 0);
        assert_eq!(Money::zero().positive_part().units(), 0);
    }

    #[test]
    fn test_saturating_add() {
        let near_max = Money::from_units(i64::MAX - 1);
        assert_eq!(
            near_max.saturating_add(Money::from_units(100)).units(),
            i64::MAX
        );
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::from_units(10), Money::from_units(15)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.units(), 25);
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_units(20)).unwrap();
        assert_eq!(json, "20");

        let back: Money = serde_json::from_str("20").unwrap();
        assert_eq!(back, Money::from_units(20));
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_units(-5);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().units(), 5);
    }

    #[test]
    fn test_operators_saturate() {
        let max = Money::from_units(i64::MAX);
        let min = Money::from_units(i64::MIN);

        assert_eq!(max + Money::from_units(1), max);
        assert_eq!(min - Money::from_units(1), min);
        assert_eq!(max * 2, max);
        assert_eq!(Money::from_units(-2) * i64::MAX, min);
        assert_eq!(min.abs(), max);

        let mut total = max;
        total += Money::from_units(10);
        assert_eq!(total, max);
        total -= max;
        total -= max;
        total -= max;
        assert_eq!(total, min);
    }

    #[test]
    fn test_sum_saturates() {
        let total: Money = [Money::from_units(i64::MAX), Money::from_units(i64::MAX)]
            .iter()
            .sum();
        assert_eq!(total.units(), i64::MAX);
    }
}
