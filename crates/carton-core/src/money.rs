//! # Money Module
//!
//! Integer-cents monetary values for cart math.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In JavaScript/floating point:                                      │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Cents                                        │
//! │    Every subtotal, discount, tax, and total is an i64 cent count.   │
//! │    The frontend converts to a display string; the engine never      │
//! │    touches a float.                                                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: discounts and adjustments can be negative mid-math,
///   even though a finished summary never is
/// - **Single-field tuple struct**: zero-cost abstraction over i64
///
/// Every monetary field in the cart (`unit_price`, `line_total`,
/// `CartSummary` columns) flows through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Why Cents?
    /// The storage layer, calculations, and frontend DTOs all use cents.
    /// Only the UI converts to dollars for display.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99, absolute value).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the smaller of two values.
    ///
    /// Used when capping a fixed-amount discount at the running subtotal
    /// so a single discount never contributes below zero.
    #[inline]
    pub fn min(self, other: Money) -> Money {
        Money(self.0.min(other.0))
    }

    /// Clamps a negative value to zero.
    ///
    /// Stacked discounts can push the taxable amount below zero; the
    /// summary clamps here so tax and total never go negative.
    #[inline]
    pub const fn clamp_non_negative(self) -> Money {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Calculates a basis-point fraction of this amount, rounded half-up.
    ///
    /// ## Implementation
    /// Integer math: `(amount × bps + 5000) / 10000`. The `+5000` rounds
    /// the half-cent boundary up. i128 intermediates prevent overflow on
    /// large carts.
    ///
    /// ## Example
    /// ```rust
    /// use carton_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(4000); // $40.00
    /// assert_eq!(subtotal.percentage_of(1000).cents(), 400); // 10% → $4.00
    /// ```
    ///
    /// Used twice in the pricing pipeline: percentage discounts and the
    /// configured tax rate.
    pub fn percentage_of(&self, bps: u32) -> Money {
        let part = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_cents(part as i64)
    }

    /// Multiplies by a line-item quantity.
    ///
    /// ## Example
    /// ```rust
    /// use carton_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(2000); // $20.00
    /// assert_eq!(unit_price.multiply_quantity(2).cents(), 4000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly formatting. The frontend formats for locale; this is
/// for logs and test assertions only.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity.
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
