//! # Money Module
//!
//! Provides the `Money` and `Weight` types for handling quantities that must
//! never drift.
//!
//! ## Why Exact Decimals?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In a tiered pricing system:                                            │
//! │    subtotal 1000.0000001 > 1000 → 20% discount instead of 10%  ❌      │
//! │    weight 5.0000001 kg > 5 → shipping charged on a free parcel  ❌      │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal::Decimal                                    │
//! │    600 × 0.90 = 540 exactly, 9 kg × 2 × 0.50 = 9 exactly               │
//! │    Boundaries (500, 1000, 5 kg, 10 kg, 50 kg) compare exactly          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::{Money, Weight};
//!
//! // Create from cents or whole units (preferred)
//! let price = Money::from_cents(1099); // 10.99
//!
//! // Arithmetic operations
//! let doubled = price.multiply_quantity(2);            // 21.98
//! let total = price + Money::from_cents(500);          // 15.99
//! assert_eq!(total, Money::from_cents(1599));
//!
//! // Weights follow the same rules
//! let parcel = Weight::from_kg(4).multiply_quantity(3);
//! assert_eq!(parcel, Weight::from_kg(12));
//!
//! // NEVER do this:
//! // let bad = Money::from_f64(10.99); // NO SUCH METHOD EXISTS!
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use crate::CURRENCY_DECIMAL_PLACES;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value as an exact decimal in the store currency.
///
/// ## Design Decisions
/// - **Decimal (signed)**: Allows negative values for discounts in breakdowns
/// - **Single field tuple struct**: Zero-cost abstraction over Decimal
/// - **No implicit rounding**: Intermediate results keep full precision, only
///   [`Money::round_to_cents`] and `Display` round
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Product.price ──► CartLine.line_total ──► subtotal ──► volume discount │
/// │                                                                         │
/// │  Weight × rate per kg ──► shipping ──► loyalty modifier                 │
/// │                                                                         │
/// │  discounted subtotal + shipping ──► total ──► payment authorization    │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.amount(), Decimal::new(1099, 2));
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, CURRENCY_DECIMAL_PLACES))
    }

    /// Creates a Money value from whole currency units.
    #[inline]
    pub fn from_major(major: i64) -> Self {
        Money(Decimal::from(major))
    }

    /// Returns the exact decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let zero = Money::zero();
    /// assert!(zero.is_zero());
    /// ```
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total, Money::from_cents(897));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Multiplies money by an exact factor (discount or loyalty multiplier).
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let subtotal = Money::from_major(600);
    /// let discounted = subtotal.scale(Decimal::new(90, 2)); // 10% off
    /// assert_eq!(discounted, Money::from_major(540));
    /// ```
    #[inline]
    pub fn scale(&self, factor: Decimal) -> Self {
        Money(self.0 * factor)
    }

    /// Rounds to whole cents using Bankers Rounding (round half to even).
    ///
    /// ## Bankers Rounding Explained
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  BANKERS ROUNDING (Round Half to Even)                              │
    /// │                                                                     │
    /// │  Standard rounding always rounds 0.005 UP, causing systematic bias │
    /// │  Bankers Rounding rounds 0.005 to the nearest EVEN cent:           │
    /// │    0.125 → 0.12, 0.135 → 0.14                                       │
    /// │                                                                     │
    /// │  Used only at the boundary: the amount sent to the payment         │
    /// │  processor and the amount displayed to a person.                   │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let exact = Money::from_decimal(Decimal::new(299997, 3)); // 299.997
    /// assert_eq!(exact.round_to_cents(), Money::from_cents(30000));
    /// ```
    pub fn round_to_cents(&self) -> Self {
        Money(self.0.round_dp(CURRENCY_DECIMAL_PLACES))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money rounded to cents, always with two decimals.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut shown = self.0.round_dp(CURRENCY_DECIMAL_PLACES);
        shown.rescale(CURRENCY_DECIMAL_PLACES);
        write!(f, "{}", shown)
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Weight Type
// =============================================================================

/// A shipping weight in kilograms, as an exact decimal.
///
/// Shipping bands use inclusive upper bounds (5 kg, 10 kg, 50 kg), so the
/// comparison at the boundary must be exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weight(Decimal);

impl Weight {
    /// Wraps an exact decimal number of kilograms.
    #[inline]
    pub const fn from_decimal(kilograms: Decimal) -> Self {
        Weight(kilograms)
    }

    /// Creates a weight from whole kilograms.
    #[inline]
    pub fn from_kg(kilograms: i64) -> Self {
        Weight(Decimal::from(kilograms))
    }

    /// Creates a weight from grams.
    #[inline]
    pub fn from_grams(grams: i64) -> Self {
        Weight(Decimal::new(grams, 3))
    }

    /// Returns the weight in kilograms.
    #[inline]
    pub const fn kilograms(&self) -> Decimal {
        self.0
    }

    /// Zero weight (digital goods, empty cart).
    #[inline]
    pub const fn zero() -> Self {
        Weight(Decimal::ZERO)
    }

    /// Multiplies the weight by a quantity.
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Self {
        Weight(self.0 * Decimal::from(qty))
    }

    /// Prices this weight at a per-kilogram rate.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::{Money, Weight};
    ///
    /// let shipping = Weight::from_kg(9).at_rate(Money::from_major(2));
    /// assert_eq!(shipping, Money::from_major(18));
    /// ```
    #[inline]
    pub fn at_rate(&self, rate_per_kg: Money) -> Money {
        Money::from_decimal(self.0 * rate_per_kg.amount())
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} kg", self.0.normalize())
    }
}

impl Default for Weight {
    fn default() -> Self {
        Weight::zero()
    }
}

impl Add for Weight {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Weight(self.0 + other.0)
    }
}

impl AddAssign for Weight {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sum for Weight {
    fn sum<I: Iterator<Item = Weight>>(iter: I) -> Self {
        iter.fold(Weight::zero(), Add::add)
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
        assert_eq!(money.amount(), Decimal::new(1099, 2));
        assert_eq!(money, Money::from_decimal(Decimal::new(10990, 3)));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_major(549)), "549.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::zero()), "0.00");
        assert_eq!(format!("{}", Money::from_decimal(Decimal::new(4925, 1))), "492.50");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a + b, Money::from_cents(1500));
        assert_eq!(a - b, Money::from_cents(500));
        assert_eq!(a.multiply_quantity(3), Money::from_cents(3000));

        let mut running = Money::zero();
        running += a;
        running -= b;
        assert_eq!(running, b);
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::from_major(1), Money::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_cents(350));
    }

    #[test]
    fn test_scale_keeps_exact_precision() {
        // 0.1 + 0.2 style drift must not happen
        let a = Money::from_decimal(Decimal::new(1, 1));
        let b = Money::from_decimal(Decimal::new(2, 1));
        assert_eq!(a + b, Money::from_decimal(Decimal::new(3, 1)));

        let discounted = Money::from_cents(33333).scale(Decimal::new(90, 2));
        assert_eq!(discounted.amount(), Decimal::new(2999970, 4));
    }

    #[test]
    fn test_round_to_cents_bankers() {
        let half_even_down = Money::from_decimal(Decimal::new(125, 3)); // 0.125
        let half_even_up = Money::from_decimal(Decimal::new(135, 3)); // 0.135
        assert_eq!(half_even_down.round_to_cents(), Money::from_cents(12));
        assert_eq!(half_even_up.round_to_cents(), Money::from_cents(14));
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_negative());
        assert!(Money::from_cents(-1).is_negative());
        assert!(!Money::from_cents(1).is_negative());
    }

    #[test]
    fn test_weight_arithmetic() {
        let w = Weight::from_grams(4500).multiply_quantity(2);
        assert_eq!(w, Weight::from_kg(9));
        assert_eq!(w.at_rate(Money::from_major(2)), Money::from_major(18));

        let total: Weight = [Weight::from_kg(1), Weight::from_grams(250)]
            .into_iter()
            .sum();
        assert_eq!(total.kilograms(), Decimal::new(125, 2));
        assert_eq!(total.to_string(), "1.25 kg");
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&Money::from_cents(1099)).unwrap();
        assert_eq!(json, "\"10.99\"");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Money::from_cents(1099));
    }
}
