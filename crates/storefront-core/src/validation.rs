//! # Validation Module
//!
//! Input validation utilities for the checkout domain.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Constructors (this module)                                   │
//! │  ├── Product::new  → name, price and weight within bounds              │
//! │  ├── CartLine::new → quantity >= 1                                     │
//! │  └── PricingPolicy::validate → tier ordering, multipliers in [0, 1]    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Pricing (pure)                                               │
//! │  └── Assumes valid input, never re-checks                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: External providers                                           │
//! │  └── Stock levels, payment limits (authoritative)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{validate_product_name, validate_quantity};
//!
//! assert!(validate_product_name("Monitor 27\"").is_ok());
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::{Money, Weight};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product name accepted.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Highest unit price accepted.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Highest unit weight accepted, in kilograms.
pub const MAX_UNIT_WEIGHT: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Highest per-kilogram shipping rate accepted.
pub const MAX_RATE_PER_KG: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

// With quantities capped by u32, these bounds keep line totals, weights and
// shipping of any cart that fits in memory far below Decimal::MAX.

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Coffee grinder").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart line quantity.
///
/// ## Rules
/// - Must be positive (>= 1)
///
/// ## Checkout Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart rebuilt from storage                                              │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  CartLine::new(product, qty)                                            │
/// │       │                                                                 │
/// │       ├── qty == 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       └── OK → line priced and sent to the stock provider              │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
/// - Must not exceed [`MAX_UNIT_PRICE`]
///
/// ## Example
/// ```rust
/// use storefront_core::money::Money;
/// use storefront_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(1099)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    non_negative("price", price.amount())?;
    at_most("price", price.amount(), MAX_UNIT_PRICE)
}

/// Validates a unit weight.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (digital goods)
/// - Must not exceed [`MAX_UNIT_WEIGHT`] kg
pub fn validate_weight(weight: Weight) -> ValidationResult<()> {
    non_negative("weight", weight.kilograms())?;
    at_most("weight", weight.kilograms(), MAX_UNIT_WEIGHT)
}

/// Validates a per-kilogram shipping rate (0 to [`MAX_RATE_PER_KG`]).
pub fn validate_rate(field: &str, rate: Money) -> ValidationResult<()> {
    non_negative(field, rate.amount())?;
    at_most(field, rate.amount(), MAX_RATE_PER_KG)
}

/// Validates a threshold amount such as a discount boundary.
pub fn validate_threshold(field: &str, amount: Money) -> ValidationResult<()> {
    non_negative(field, amount.amount())
}

/// Validates a price multiplier (discount factor or loyalty modifier).
///
/// ## Rules
/// - Must be between 0 and 1 inclusive (a multiplier never raises a price)
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use storefront_core::validation::validate_multiplier;
///
/// assert!(validate_multiplier("silver", Decimal::new(50, 2)).is_ok());
/// assert!(validate_multiplier("silver", Decimal::new(150, 2)).is_err());
/// ```
pub fn validate_multiplier(field: &str, multiplier: Decimal) -> ValidationResult<()> {
    if multiplier < Decimal::ZERO || multiplier > Decimal::ONE {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: Decimal::ZERO.to_string(),
            max: Decimal::ONE.to_string(),
            value: multiplier.to_string(),
        });
    }

    Ok(())
}

fn non_negative(field: &str, value: Decimal) -> ValidationResult<()> {
    if value < Decimal::ZERO {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value: value.to_string(),
        });
    }

    Ok(())
}

fn at_most(field: &str, value: Decimal, max: Decimal) -> ValidationResult<()> {
    if value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: Decimal::ZERO.to_string(),
            max: max.to_string(),
            value: value.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
