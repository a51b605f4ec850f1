//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  The original order form summed line totals as floats and leaned on    │
//! │  toFixed(2) to hide the drift. Across a dozen lines with 21% VAT and   │
//! │  a 5.2% surcharge, the displayed total and the stored total diverge.   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every amount is an i64 number of euro cents.                        │
//! │    Rate application rounds half-up, once, at a single place.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use farmalink_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099); // 10.99 €
//!
//! // Arithmetic operations
//! let doubled = price * 2;                     // 21.98 €
//! let total = price + Money::from_cents(500);  // 15.99 €
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in euro cents (the smallest currency unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for corrections and refunds
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money Flows
/// ```text
/// Product.unit_price_cents ──► LineItem.unit_price ──► LineItem.subtotal_excl_vat
///                                                            │
///          OrderTotals.subtotal ◄────────────────────────────┘
///                   │
///                   ├──► apply_rate(vat)       ──► OrderTotals.total_vat
///                   ├──► apply_rate(surcharge) ──► OrderTotals.surcharge
///                   └──► OrderTotals.grand_total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use farmalink_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents 10.99 €
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (euros and cents).
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50 €, not -4.50 €.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (whole euros) portion.
    #[inline]
    pub const fn euros(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
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
        Money(self.0.abs())
    }

    /// Applies a basis-point rate to this amount, rounding half-up.
    ///
    /// This is the single rounding point for every derived amount in the
    /// system: per-line VAT and the client equivalence surcharge both go
    /// through it, so the two can never round differently.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`
    /// The +5000 provides half-up rounding (5000/10000 = 0.5).
    /// i128 intermediate prevents overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use farmalink_core::money::Money;
    /// use farmalink_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(3000); // 30.00 €
    ///
    /// // 21% VAT on 30.00 € = 6.30 €
    /// assert_eq!(subtotal.apply_rate(TaxRate::from_bps(2100)).cents(), 630);
    ///
    /// // 5.2% equivalence surcharge on 30.00 € = 1.56 €
    /// assert_eq!(subtotal.apply_rate(TaxRate::from_bps(520)).cents(), 156);
    /// ```
    pub fn apply_rate(&self, rate: TaxRate) -> Money {
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use farmalink_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // 2.99 €
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 897); // 8.97 €
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. Display formatting for the UI is a
/// frontend concern and deliberately lives outside this crate.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}€", sign, self.euros().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.euros(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        let money = Money::from_major_minor(10, 99);
        assert_eq!(money.cents(), 1099);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99€");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00€");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50€");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00€");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);
    }

    #[test]
    fn test_apply_rate_basic() {
        // 10.00 € at 10% = 1.00 €
        let amount = Money::from_cents(1000);
        let rate = TaxRate::from_bps(1000);
        assert_eq!(amount.apply_rate(rate).cents(), 100);
    }

    #[test]
    fn test_apply_rate_with_rounding() {
        // 10.00 € at 5.2% = 0.52 €; 10.01 € at 5.2% = 0.52052 → 0.52 €
        let rate = TaxRate::from_bps(520);
        assert_eq!(Money::from_cents(1000).apply_rate(rate).cents(), 52);
        assert_eq!(Money::from_cents(1001).apply_rate(rate).cents(), 52);

        // 0.96 € at 5.2% = 4.992 cents → 5 cents
        assert_eq!(Money::from_cents(96).apply_rate(rate).cents(), 5);

        // Exact half rounds up: 0.50 € at 1% = 0.5 cents → 1 cent
        assert_eq!(Money::from_cents(50).apply_rate(TaxRate::from_bps(100)).cents(), 1);
    }

    #[test]
    fn test_apply_rate_spanish_vat_set() {
        let amount = Money::from_cents(3000); // 30.00 €
        assert_eq!(amount.apply_rate(TaxRate::from_bps(400)).cents(), 120);
        assert_eq!(amount.apply_rate(TaxRate::from_bps(1000)).cents(), 300);
        assert_eq!(amount.apply_rate(TaxRate::from_bps(2100)).cents(), 630);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_cents(100);
        assert!(!positive.is_zero());
        assert!(positive.is_positive());
        assert!(!positive.is_negative());

        let negative = Money::from_cents(-100);
        assert!(!negative.is_zero());
        assert!(!negative.is_positive());
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(299);
        let line_total = unit_price.multiply_quantity(3);
        assert_eq!(line_total.cents(), 897);
    }
}
