//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With floating point rupees:                                            │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  An invoice adds many line items (rate × area), three charges and GST. │
//! │  Every one of those additions can drift by a fraction of a paisa.     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    ₹1,000.40 is stored as 100040 paise                                 │
//! │    Rounding happens once, at well-defined points                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The billing backend speaks JSON numbers in rupees (`1000.4`). `Money`
//! serializes to and from that representation, rounding to the nearest paisa
//! on the way in. Floats never travel further than the serde boundary.
//!
//! ## Usage
//! ```rust
//! use billing_core::money::Money;
//!
//! let rate = Money::from_rupees(4_500);        // ₹4,500 per sq ft
//! let line = rate.multiply_area(1_200.0);     // 1,200 sq ft
//! assert_eq!(line, Money::from_rupees(54_00_000));
//! assert_eq!(line.to_string(), "₹54,00,000.00");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::GstRate;

/// Paise in one rupee.
pub const PAISE_PER_RUPEE: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in paise (1/100 of a rupee).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows intermediate negative values (advance larger
///   than total) before they are clamped
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serde as rupees**: Matches the backend's JSON numbers
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.rate × area ──► items_total ──┐                               │
/// │                                         ├──► sub_total ──► GST          │
/// │  parking + amenities + other ───────────┘                    │          │
/// │                                                              ▼          │
/// │                    total_amount - advance ──► remaining (ceil ₹)        │
/// │                                                              │          │
/// │                                          Payment.amount ◄────┘          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    ///
    /// ```rust
    /// use billing_core::money::Money;
    ///
    /// let amount = Money::from_paise(100040); // ₹1,000.40
    /// assert_eq!(amount.paise(), 100040);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * PAISE_PER_RUPEE)
    }

    /// Creates a Money value from a rupee amount as the backend sends it.
    ///
    /// Rounds half away from zero to the nearest paisa. Non-finite input
    /// (NaN, infinity) maps to zero.
    ///
    /// ```rust
    /// use billing_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees_f64(1000.4).paise(), 100040);
    /// assert_eq!(Money::from_rupees_f64(0.125).paise(), 13);
    /// ```
    pub fn from_rupees_f64(rupees: f64) -> Self {
        if !rupees.is_finite() {
            return Money::zero();
        }
        Money((rupees * PAISE_PER_RUPEE as f64).round() as i64)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated toward zero).
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / PAISE_PER_RUPEE
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % PAISE_PER_RUPEE).abs()
    }

    /// Returns the amount in rupees as a float, for the wire only.
    #[inline]
    pub fn to_rupees_f64(&self) -> f64 {
        self.0 as f64 / PAISE_PER_RUPEE as f64
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

    /// Clamps negative values to zero.
    ///
    /// ```rust
    /// use billing_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(-500).floor_zero(), Money::zero());
    /// assert_eq!(Money::from_paise(500).floor_zero().paise(), 500);
    /// ```
    #[inline]
    pub const fn floor_zero(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            Money(self.0)
        }
    }

    /// Rounds up to the next whole rupee.
    ///
    /// This is how the outstanding balance of an invoice is presented: any
    /// fraction of a rupee still owed is charged as a full rupee.
    ///
    /// ```rust
    /// use billing_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(70040).ceil_to_rupee(), Money::from_rupees(701));
    /// assert_eq!(Money::from_rupees(700).ceil_to_rupee(), Money::from_rupees(700));
    /// assert_eq!(Money::from_paise(-250).ceil_to_rupee(), Money::from_rupees(-2));
    /// ```
    pub const fn ceil_to_rupee(&self) -> Self {
        let rem = self.0.rem_euclid(PAISE_PER_RUPEE);
        if rem == 0 {
            Money(self.0)
        } else {
            Money(self.0 - rem + PAISE_PER_RUPEE)
        }
    }

    /// Calculates GST on this amount.
    ///
    /// ## Implementation
    /// Integer math on basis points: `(amount × bps + 5000) / 10000`.
    /// The +5000 rounds half away from zero to the nearest paisa; negative
    /// amounts are rounded symmetrically.
    ///
    /// ```rust
    /// use billing_core::money::Money;
    /// use billing_core::types::GstRate;
    ///
    /// let sub_total = Money::from_rupees(1_000);
    /// let gst = sub_total.calculate_gst(GstRate::from_percentage(18.0));
    /// assert_eq!(gst, Money::from_rupees(180));
    /// ```
    pub fn calculate_gst(&self, rate: GstRate) -> Money {
        // i128 keeps crore-scale amounts × 10000 bps well clear of overflow
        let magnitude = (self.0.unsigned_abs() as i128 * rate.bps() as i128 + 5000) / 10000;
        let signed = if self.0 < 0 { -magnitude } else { magnitude };
        Money(signed as i64)
    }

    /// Multiplies a per-square-foot rate by an area.
    ///
    /// Area is a physical measure and may be fractional (e.g. 1,250.5 sq ft),
    /// so it stays an `f64`; the product is rounded to the nearest paisa.
    ///
    /// ```rust
    /// use billing_core::money::Money;
    ///
    /// let rate = Money::from_paise(350050); // ₹3,500.50 / sq ft
    /// assert_eq!(rate.multiply_area(2.0).paise(), 700100);
    /// assert_eq!(rate.multiply_area(0.0), Money::zero());
    /// ```
    pub fn multiply_area(&self, area: f64) -> Money {
        if !area.is_finite() {
            return Money::zero();
        }
        Money((self.0 as f64 * area).round() as i64)
    }
}

// =============================================================================
// Display
// =============================================================================

/// Groups digits the Indian way: the last three digits, then pairs.
///
/// `12345678` becomes `1,23,45,678`.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Formats an amount as `₹1,23,456.78`.
///
/// This is the presentation used on invoices, payment lists and analytics.
pub fn format_inr(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let whole = group_indian(&amount.rupees().unsigned_abs().to_string());
    format!("{}₹{}.{:02}", sign, whole, amount.paise_part())
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_inr(*self))
    }
}

// =============================================================================
// Serde (rupees on the wire)
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % PAISE_PER_RUPEE == 0 {
            serializer.serialize_i64(self.rupees())
        } else {
            serializer.serialize_f64(self.to_rupees_f64())
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rupees = f64::deserialize(deserializer)?;
        Ok(Money::from_rupees_f64(rupees))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
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
