//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  EVERY PRICE IN THE SHOP IS A WHOLE NUMBER                              │
//! │                                                                         │
//! │  Base price:        $50                                                 │
//! │  Modifier deltas:   +15 (加蛋), -5 (不加蛋), 0 (不加菜)                  │
//! │  Drink tables:      S=15 / M=20 / L=25                                  │
//! │                                                                         │
//! │  The engine stores amounts in the smallest currency unit (i64) and     │
//! │  never rounds. Floating point never enters the pricing path.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mealdesk_core::money::Money;
//!
//! let base = Money::from_units(50);
//! let egg = Money::from_units(15);
//! let line = (base + egg) * 3u32;
//! assert_eq!(line.units(), 195);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: modifier deltas may be negative (`不加蛋` = -5)
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: serializes as a bare integer in JSON and TOML
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  MenuItem.base_price ──┐                                                │
/// │  RuleOption.price ─────┼──► PriceBreakdown.unit ──► × quantity ──► total│
/// │  DrinkConfig.prices ───┘                                                │
/// │                                                                         │
/// │  PricedOption.price ──► OrderLine.subtotal (handed to the cart)        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    ///
    /// ## Example
    /// ```rust
    /// use mealdesk_core::money::Money;
    ///
    /// let price = Money::from_units(35);
    /// assert_eq!(price.units(), 35);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in the smallest currency unit.
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

    /// Clamps negative amounts to zero.
    ///
    /// Surcharges are always floored this way: a drink cheaper than its
    /// credit is free, never a refund.
    ///
    /// ## Example
    /// ```rust
    /// use mealdesk_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(-10).floor_zero(), Money::zero());
    /// assert_eq!(Money::from_units(30).floor_zero().units(), 30);
    /// ```
    #[inline]
    pub const fn floor_zero(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Multiplies money by a quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Unit price: $90 (漢堡 + 加蛋 + 加培根)
    /// Quantity: 3
    ///      │
    ///      ▼
    /// multiply_quantity(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line Total: $270
    /// ```
    ///
    /// Saturates at the `i64` bounds instead of overflowing.
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows whole units with a dollar sign (`$45`, `-$5`).
///
/// ## Note
/// The CLI formats with the configured currency symbol instead.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}", sign, self.0.abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

/// Multiplication by a line quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
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
        let money = Money::from_units(45);
        assert_eq!(money.units(), 45);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_units(45)), "$45");
        assert_eq!(format!("{}", Money::from_units(-5)), "-$5");
        assert_eq!(format!("{}", Money::zero()), "$0");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(50);
        let b = Money::from_units(15);

        assert_eq!((a + b).units(), 65);
        assert_eq!((a - b).units(), 35);
        assert_eq!((a * 3u32).units(), 150);

        let mut c = a;
        c += b;
        c -= Money::from_units(5);
        assert_eq!(c.units(), 60);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_units(i64::MAX / 2);
        assert_eq!(huge.multiply_quantity(3).units(), i64::MAX);
        assert_eq!((huge + huge + Money::from_units(5)).units(), i64::MAX);
        assert_eq!((Money::from_units(i64::MIN) - Money::from_units(1)).units(), i64::MIN);
    }

    #[test]
    fn test_sum() {
        let deltas = [Money::from_units(15), Money::from_units(25), Money::from_units(-5)];
        let total: Money = deltas.iter().sum();
        assert_eq!(total.units(), 35);

        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_floor_zero() {
        assert_eq!(Money::from_units(-1).floor_zero(), Money::zero());
        assert_eq!(Money::zero().floor_zero(), Money::zero());
        assert_eq!(Money::from_units(10).floor_zero().units(), 10);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_units(-5);
        assert!(negative.is_negative());
        assert!(!negative.is_positive());
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_units(39)).unwrap();
        assert_eq!(json, "39");
        let back: Money = serde_json::from_str("-5").unwrap();
        assert_eq!(back, Money::from_units(-5));
    }
}
