//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The backend sends prices as JSON numbers:                              │
//! │    19.99 × 2 = 39.980000000000004  ❌ WRONG!                            │
//! │                                                                         │
//! │  OUR SOLUTION: convert once at the API boundary                         │
//! │    19.99 ──► 1999 cents ──► 1999 × 2 = 3998 cents  ✅                   │
//! │                                                                         │
//! │  Floats only exist on the wire; every sum, product and tax             │
//! │  computation inside the crate is exact integer math.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use folio_core::money::Money;
//!
//! let price = Money::from_cents(1999); // $19.99
//! let line = price * 2;                // $39.98
//! assert_eq!(line.to_string(), "$39.98");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::CoreError;
use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Book.price ──► CartItem.line_total ──► CartTotals.subtotal            │
/// │                                              │                          │
/// │                                              ▼                          │
/// │                              calculate_tax(7%) ──► CartTotals.tax       │
/// │                                              │                          │
/// │                                              ▼                          │
/// │                              subtotal + tax ──► CartTotals.total        │
/// │                                              │                          │
/// │                                              ▼                          │
/// │                              OrderRequest (dollars on the wire)         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from dollars and cents.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -$5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts a decimal dollar amount received from the backend.
    ///
    /// Rounds to the nearest cent, half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// assert_eq!(Money::from_dollars(19.99).unwrap().cents(), 1999);
    /// assert!(Money::from_dollars(f64::NAN).is_err());
    /// ```
    pub fn from_dollars(dollars: f64) -> Result<Self, CoreError> {
        if !dollars.is_finite() {
            return Err(CoreError::InvalidPrice {
                reason: format!("{dollars} is not a finite number"),
            });
        }

        let cents = (dollars * 100.0).round();
        if cents.abs() > i64::MAX as f64 {
            return Err(CoreError::InvalidPrice {
                reason: format!("{dollars} is out of range"),
            });
        }

        Ok(Money(cents as i64))
    }

    /// Returns the value as decimal dollars, for the JSON wire format only.
    #[inline]
    pub fn to_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the dollars portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
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

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax on this amount.
    ///
    /// ## Rounding
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF AWAY FROM ZERO at the cent boundary                    │
    /// │                                                                     │
    /// │   $44.98 × 7% = $3.1486   →  $3.15                                  │
    /// │   $27.50 × 7% = $1.925    →  $1.93                                  │
    /// │  -$27.50 × 7% = -$1.925   → -$1.93                                  │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::money::Money;
    /// use folio_core::types::TaxRate;
    ///
    /// let tax = Money::from_cents(2750).calculate_tax(TaxRate::from_bps(700));
    /// assert_eq!(tax.cents(), 193);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps cents * bps from overflowing on large carts
        let scaled = self.0 as i128 * rate.bps() as i128;
        let rounded = (scaled.abs() + 5000) / 10000;
        let cents = if scaled < 0 { -rounded } else { rounded };
        Money::from_cents(i64::try_from(cents).unwrap_or(if cents < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use folio_core::money::Money;
    ///
    /// let line_total = Money::from_cents(750).multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 2250);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Multiplies money by a quantity, or `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, or `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Wire Format
// =============================================================================

/// Serde adapter for fields carried as decimal dollars on the wire.
///
/// ```rust,ignore
/// #[serde(with = "crate::money::dollars")]
/// pub price: Money,
/// ```
pub mod dollars {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::Money;

    pub fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.to_dollars())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Money::from_dollars(raw).map_err(de::Error::custom)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
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
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_from_dollars_rounds_to_nearest_cent() {
        assert_eq!(Money::from_dollars(19.99).unwrap().cents(), 1999);
        assert_eq!(Money::from_dollars(5.0).unwrap().cents(), 500);
        assert_eq!(Money::from_dollars(0.1 + 0.2).unwrap().cents(), 30);
        assert_eq!(Money::from_dollars(7.5).unwrap().cents(), 750);
    }

    #[test]
    fn test_from_dollars_rejects_non_finite() {
        assert!(Money::from_dollars(f64::NAN).is_err());
        assert!(Money::from_dollars(f64::INFINITY).is_err());
        assert!(Money::from_dollars(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_arithmetic_saturates_instead_of_panicking() {
        let huge = Money::from_cents(i64::MAX / 2);

        assert_eq!(huge.multiply_quantity(3).cents(), i64::MAX);
        assert_eq!((huge * 3).cents(), i64::MAX);
        assert_eq!((huge + huge + huge).cents(), i64::MAX);
        assert_eq!(huge.checked_multiply_quantity(3), None);
        assert_eq!(huge.checked_multiply_quantity(2), Some(Money::from_cents(i64::MAX - 1)));
        assert_eq!(huge.checked_add(huge), Some(Money::from_cents(i64::MAX - 1)));
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);

        let tax = Money::from_cents(i64::MAX).calculate_tax(TaxRate::from_bps(700));
        assert!(tax.cents() > 0);
    }

    #[test]
    fn test_tax_rounds_half_away_from_zero() {
        let rate = TaxRate::from_bps(700);

        // 27.50 × 7% = 1.925 → 1.93
        assert_eq!(Money::from_cents(2750).calculate_tax(rate).cents(), 193);
        // 44.98 × 7% = 3.1486 → 3.15
        assert_eq!(Money::from_cents(4498).calculate_tax(rate).cents(), 315);
        // 10.00 × 7% = 0.70 exactly
        assert_eq!(Money::from_cents(1000).calculate_tax(rate).cents(), 70);
        // Negative amounts mirror positive ones
        assert_eq!(Money::from_cents(-2750).calculate_tax(rate).cents(), -193);
    }

    #[test]
    fn test_tax_on_zero() {
        let tax = Money::zero().calculate_tax(TaxRate::from_bps(700));
        assert!(tax.is_zero());
    }

    #[test]
    fn test_dollars_wire_format() {
        #[derive(Serialize, Deserialize)]
        struct Priced {
            #[serde(with = "dollars")]
            price: Money,
        }

        let parsed: Priced = serde_json::from_str(r#"{"price": 19.99}"#).unwrap();
        assert_eq!(parsed.price.cents(), 1999);

        let json = serde_json::to_string(&Priced {
            price: Money::from_cents(4813),
        })
        .unwrap();
        assert_eq!(json, r#"{"price":48.13}"#);
    }
}
