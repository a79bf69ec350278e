//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! All monetary values in the storefront are integer paise. The catalog
//! API, the cart, and the credit calculator all exchange paise; only the
//! UI converts to rupees for display.
//!
//! ## Usage
//! ```rust
//! use mandi_core::money::Money;
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(1099); // ₹10.99
//!
//! // Arithmetic operations
//! let doubled = price * 2;                     // ₹21.98
//! let total = price + Money::from_paise(500);  // ₹15.99
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in paise (the smallest rupee unit).
///
/// - **i64 (signed)**: allows negative values for refunds and shortfalls
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ## Example
    /// ```rust
    /// use mandi_core::money::Money;
    ///
    /// let price = Money::from_paise(1099); // Represents ₹10.99
    /// assert_eq!(price.paise(), 1099);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// ## Example
    /// ```rust
    /// use mandi_core::money::Money;
    ///
    /// let price = Money::from_rupees_paise(10, 99); // ₹10.99
    /// assert_eq!(price.paise(), 1099);
    ///
    /// let refund = Money::from_rupees_paise(-5, 50); // -₹5.50
    /// assert_eq!(refund.paise(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the rupee part should be negative.
    /// `from_rupees_paise(-5, 50)` = -₹5.50, not -₹4.50
    #[inline]
    pub const fn from_rupees_paise(rupees: i64, paise: i64) -> Self {
        if rupees < 0 {
            Money(rupees * 100 - paise)
        } else {
            Money(rupees * 100 + paise)
        }
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
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

    /// Applies a percentage rate and returns the resulting amount.
    ///
    /// This is the single rate-application primitive used by the credit
    /// calculator for both discount and interest tiers.
    ///
    /// ## Implementation
    /// Integer math with half-up rounding: `(paise * bps + 5000) / 10000`,
    /// widened to i128 so large carts cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use mandi_core::money::Money;
    /// use mandi_core::types::Rate;
    ///
    /// let subtotal = Money::from_paise(1_000_000); // ₹10,000.00
    /// let rate = Rate::from_bps(500);              // 5.00%
    ///
    /// let amount = subtotal.apply_rate(rate);
    /// assert_eq!(amount.paise(), 50_000); // ₹500.00
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Money {
        let amount = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_paise(amount as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use mandi_core::money::Money;
    ///
    /// let unit_price = Money::from_paise(299); // ₹2.99
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.paise(), 897); // ₹8.97
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
/// This is for debugging. Use frontend formatting for actual UI display
/// to handle locale grouping (₹1,00,000) properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
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
