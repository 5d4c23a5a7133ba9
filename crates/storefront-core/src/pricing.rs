//! # Pricing Module
//!
//! Computes the chargeable amount of a cart: volume discount on the product
//! subtotal, weight-banded shipping, and the loyalty-tier shipping modifier.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PricingCalculator::price                         │
//! │                                                                         │
//! │  for each line:                                                         │
//! │     subtotal += price × qty          weight += unit weight × qty       │
//! │          │                                  │                           │
//! │          ▼                                  ▼                           │
//! │  VOLUME DISCOUNT (highest first,    SHIPPING BAND (ascending,          │
//! │  strict >)                          inclusive ≤)                        │
//! │    > 1000 → × 0.80                    ≤ 5 kg  → 0                       │
//! │    >  500 → × 0.90                    ≤ 10 kg → weight × 2              │
//! │    else   → × 1                       ≤ 50 kg → weight × 4              │
//! │          │                            > 50 kg → weight × 7              │
//! │          │                                  │                           │
//! │          │                                  ▼                           │
//! │          │                          LOYALTY MODIFIER                    │
//! │          │                            GOLD → × 0, SILVER → × 0.50,      │
//! │          │                            BRONZE → × 1                      │
//! │          │                                  │                           │
//! │          └──────────────► total ◄───────────┘                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tiers above are the [`PricingPolicy::default`] schedule. A policy can
//! be replaced through configuration, and is validated before use.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use storefront_core::money::{Money, Weight};
//! use storefront_core::pricing::PricingCalculator;
//! use storefront_core::types::*;
//!
//! let customer = Arc::new(Customer::new(CustomerId(1), "Bo", "Elm St", LoyaltyTier::Bronze));
//! let crate_of_books = Product::new(
//!     ProductId(9),
//!     "Encyclopedia set",
//!     Money::from_major(1200),
//!     Weight::from_kg(70),
//!     ProductCategory::Books,
//! )
//! .unwrap();
//! let cart = Cart::new(CartId(3), customer, vec![CartLine::new(crate_of_books, 1).unwrap()]);
//!
//! let breakdown = PricingCalculator::default().price(&cart);
//! assert_eq!(breakdown.discounted_subtotal, Money::from_major(960));
//! assert_eq!(breakdown.shipping, Money::from_major(490));
//! assert_eq!(breakdown.total, Money::from_major(1450));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Weight};
use crate::types::{Cart, LoyaltyTier};
use crate::validation::{validate_multiplier, validate_rate, validate_threshold};

// =============================================================================
// Policy Types
// =============================================================================

/// A volume discount tier: subtotals strictly above `above` are multiplied
/// by `multiplier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountTier {
    pub above: Money,
    pub multiplier: Decimal,
}

/// A shipping band: weights up to and including `up_to` pay `rate_per_kg`
/// for every kilogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingBand {
    pub up_to: Weight,
    pub rate_per_kg: Money,
}

/// Shipping multiplier per loyalty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyMultipliers {
    pub gold: Decimal,
    pub silver: Decimal,
    pub bronze: Decimal,
}

impl LoyaltyMultipliers {
    /// Returns the shipping multiplier for a tier.
    pub fn for_tier(&self, tier: LoyaltyTier) -> Decimal {
        match tier {
            LoyaltyTier::Gold => self.gold,
            LoyaltyTier::Silver => self.silver,
            LoyaltyTier::Bronze => self.bronze,
        }
    }
}

impl Default for LoyaltyMultipliers {
    fn default() -> Self {
        LoyaltyMultipliers {
            gold: Decimal::ZERO,
            silver: Decimal::new(50, 2),
            bronze: Decimal::ONE,
        }
    }
}

/// The complete set of pricing tiers.
///
/// ## Ordering Rules
/// - `volume_discounts` is checked in order and the first match wins, so
///   thresholds must be strictly descending
/// - `shipping_bands` is checked in order and the first band whose `up_to`
///   covers the weight wins, so bounds must be strictly ascending
/// - weights above the last band pay `overflow_rate_per_kg`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    #[serde(default = "default_overflow_rate")]
    pub overflow_rate_per_kg: Money,

    #[serde(default = "default_volume_discounts")]
    pub volume_discounts: Vec<DiscountTier>,

    #[serde(default = "default_shipping_bands")]
    pub shipping_bands: Vec<ShippingBand>,

    #[serde(default)]
    pub loyalty: LoyaltyMultipliers,
}

fn default_volume_discounts() -> Vec<DiscountTier> {
    vec![
        DiscountTier {
            above: Money::from_major(1000),
            multiplier: Decimal::new(80, 2), // 20% off
        },
        DiscountTier {
            above: Money::from_major(500),
            multiplier: Decimal::new(90, 2), // 10% off
        },
    ]
}

fn default_shipping_bands() -> Vec<ShippingBand> {
    vec![
        ShippingBand {
            up_to: Weight::from_kg(5),
            rate_per_kg: Money::zero(),
        },
        ShippingBand {
            up_to: Weight::from_kg(10),
            rate_per_kg: Money::from_major(2),
        },
        ShippingBand {
            up_to: Weight::from_kg(50),
            rate_per_kg: Money::from_major(4),
        },
    ]
}

fn default_overflow_rate() -> Money {
    Money::from_major(7)
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            overflow_rate_per_kg: default_overflow_rate(),
            volume_discounts: default_volume_discounts(),
            shipping_bands: default_shipping_bands(),
            loyalty: LoyaltyMultipliers::default(),
        }
    }
}

impl PricingPolicy {
    /// Checks that the tiers can be evaluated in order without ambiguity.
    pub fn validate(&self) -> CoreResult<()> {
        for pair in self.volume_discounts.windows(2) {
            if pair[1].above >= pair[0].above {
                return Err(CoreError::InvalidPolicy {
                    reason: format!(
                        "discount thresholds must be strictly descending ({} then {})",
                        pair[0].above, pair[1].above
                    ),
                });
            }
        }
        for tier in &self.volume_discounts {
            validate_threshold("discount threshold", tier.above)?;
            validate_multiplier("discount multiplier", tier.multiplier)?;
        }

        for pair in self.shipping_bands.windows(2) {
            if pair[1].up_to <= pair[0].up_to {
                return Err(CoreError::InvalidPolicy {
                    reason: format!(
                        "shipping bands must be strictly ascending ({} then {})",
                        pair[0].up_to, pair[1].up_to
                    ),
                });
            }
        }
        for band in &self.shipping_bands {
            validate_rate("shipping rate", band.rate_per_kg)?;
        }
        validate_rate("overflow shipping rate", self.overflow_rate_per_kg)?;

        validate_multiplier("gold shipping multiplier", self.loyalty.gold)?;
        validate_multiplier("silver shipping multiplier", self.loyalty.silver)?;
        validate_multiplier("bronze shipping multiplier", self.loyalty.bronze)?;

        Ok(())
    }

    /// Multiplier applied to the product subtotal. Only one tier ever applies.
    pub fn discount_multiplier(&self, subtotal: Money) -> Decimal {
        self.volume_discounts
            .iter()
            .find(|tier| subtotal > tier.above)
            .map_or(Decimal::ONE, |tier| tier.multiplier)
    }

    /// Shipping cost before the loyalty modifier.
    pub fn base_shipping(&self, weight: Weight) -> Money {
        let rate = self
            .shipping_bands
            .iter()
            .find(|band| weight <= band.up_to)
            .map_or(self.overflow_rate_per_kg, |band| band.rate_per_kg);

        weight.at_rate(rate)
    }
}

// =============================================================================
// Price Breakdown
// =============================================================================

/// Every intermediate figure of a cart's price. All values are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    /// Sum of price × quantity.
    pub subtotal: Money,
    /// Amount taken off by the volume discount.
    pub discount: Money,
    pub discounted_subtotal: Money,
    /// Sum of unit weight × quantity.
    pub total_weight: Weight,
    /// Shipping before the loyalty modifier.
    pub base_shipping: Money,
    /// Shipping after the loyalty modifier.
    pub shipping: Money,
    /// discounted_subtotal + shipping.
    pub total: Money,
}

// =============================================================================
// Pricing Calculator
// =============================================================================

/// Pure pricing function over a [`PricingPolicy`].
///
/// Holds no state besides the policy, so pricing the same cart twice always
/// yields the same result.
#[derive(Debug, Clone, Default)]
pub struct PricingCalculator {
    policy: PricingPolicy,
}

impl PricingCalculator {
    /// Creates a calculator after validating the policy.
    pub fn new(policy: PricingPolicy) -> CoreResult<Self> {
        policy.validate()?;
        Ok(PricingCalculator { policy })
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Final chargeable amount for the cart.
    ///
    /// An empty cart costs zero.
    pub fn compute_total(&self, cart: &Cart) -> Money {
        self.price(cart).total
    }

    /// Full breakdown of the cart's price.
    pub fn price(&self, cart: &Cart) -> PriceBreakdown {
        let mut subtotal = Money::zero();
        let mut total_weight = Weight::zero();

        for line in cart.lines() {
            subtotal += line.line_total();
            total_weight += line.line_weight();
        }

        let discounted_subtotal = subtotal.scale(self.policy.discount_multiplier(subtotal));

        let base_shipping = self.policy.base_shipping(total_weight);
        let shipping = base_shipping.scale(
            self.policy
                .loyalty
                .for_tier(cart.customer().loyalty_tier),
        );

        PriceBreakdown {
            subtotal,
            discount: subtotal - discounted_subtotal,
            discounted_subtotal,
            total_weight,
            base_shipping,
            shipping,
            total: discounted_subtotal + shipping,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
