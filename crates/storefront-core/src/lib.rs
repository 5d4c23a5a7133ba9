//! # storefront-core: Pure Business Logic for Storefront Checkout
//!
//! This crate is the **heart** of the checkout workflow. It contains the data
//! model and the pricing rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Storefront Checkout Architecture                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Caller (HTTP handler, CLI, job runner)             │   │
//! │  │          finalize_checkout(cart_id, customer_id)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              storefront-checkout (orchestrator)                 │   │
//! │  │   stock check ──► pricing ──► authorize ──► deduct ──► cancel?  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ Calculator│  │   rules   │  │   │
//! │  │   │   Cart    │  │  Weight   │  │  Policy   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Cart, Customer, CheckoutOutcome)
//! - [`money`] - Money and Weight with exact decimal arithmetic (no floating point!)
//! - [`pricing`] - Volume discounts, shipping bands and loyalty modifiers
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Exact Money**: All monetary and weight values are `rust_decimal::Decimal`
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::money::{Money, Weight};
//! use storefront_core::pricing::PricingCalculator;
//! use storefront_core::types::{Cart, CartId, CartLine, Customer, CustomerId, LoyaltyTier};
//! use storefront_core::types::{Product, ProductCategory, ProductId};
//! use std::sync::Arc;
//!
//! let customer = Arc::new(Customer::new(CustomerId(1), "Ana", "Rua A, 10", LoyaltyTier::Silver));
//! let product = Product::new(
//!     ProductId(1),
//!     "Monitor",
//!     Money::from_major(600),
//!     Weight::from_kg(9),
//!     ProductCategory::Electronics,
//! )
//! .unwrap();
//! let cart = Cart::new(CartId(1), customer, vec![CartLine::new(product, 1).unwrap()]);
//!
//! // 600 - 10% = 540, shipping 9kg × 2 = 18, halved for SILVER = 9
//! let total = PricingCalculator::default().compute_total(&cart);
//! assert_eq!(total, Money::from_major(549));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use storefront_core::Money` instead of
// `use storefront_core::money::Money`

pub use error::{CoreError, ValidationError};
pub use money::{Money, Weight};
pub use pricing::{PriceBreakdown, PricingCalculator, PricingPolicy};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of decimal places used when money is displayed or charged.
pub const CURRENCY_DECIMAL_PLACES: u32 = 2;
