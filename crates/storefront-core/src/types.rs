//! # Domain Types
//!
//! Core domain types used throughout the checkout workflow.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │◄──│      Cart       │──►│    CartLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  product        │       │
//! │  │  name, address  │   │  customer (Arc) │   │  quantity ≥ 1   │       │
//! │  │  loyalty_tier   │   │  lines (owned)  │   └────────┬────────┘       │
//! │  └─────────────────┘   └─────────────────┘            │                │
//! │                                                        ▼                │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  LoyaltyTier    │   │ CheckoutOutcome │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Gold           │   │  success        │   │  price (Money)  │       │
//! │  │  Silver         │   │  transaction_id │   │  weight (kg)    │       │
//! │  │  Bronze         │   │  message        │   │  category       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! A cart exclusively owns its lines. It only shares the customer (`Arc`),
//! whose lifecycle is managed by whoever looked it up.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ValidationError;
use crate::money::{Money, Weight};
use crate::validation::{
    validate_price, validate_product_name, validate_quantity, validate_weight, ValidationResult,
};

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifies a product in the catalog.
    ProductId
);
numeric_id!(
    /// Identifies a customer.
    CustomerId
);
numeric_id!(
    /// Identifies a shopping cart.
    CartId
);

/// Opaque payment transaction identifier issued by the payment processor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Wraps the processor's identifier as-is.
    pub fn new(id: impl Into<String>) -> Self {
        TransactionId(id.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Loyalty Tier
// =============================================================================

/// Customer classification. Affects shipping cost only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoyaltyTier {
    /// Free shipping.
    Gold,
    /// Half-price shipping.
    Silver,
    /// Full shipping.
    #[default]
    Bronze,
}

impl fmt::Display for LoyaltyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoyaltyTier::Gold => write!(f, "GOLD"),
            LoyaltyTier::Silver => write!(f, "SILVER"),
            LoyaltyTier::Bronze => write!(f, "BRONZE"),
        }
    }
}

impl FromStr for LoyaltyTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gold" => Ok(LoyaltyTier::Gold),
            "silver" => Ok(LoyaltyTier::Silver),
            "bronze" => Ok(LoyaltyTier::Bronze),
            other => Err(ValidationError::InvalidFormat {
                field: "loyalty_tier".to_string(),
                reason: format!("unknown tier '{}', expected gold, silver or bronze", other),
            }),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// Product category. Informational; pricing does not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Electronics,
    Apparel,
    Food,
    Books,
    Furniture,
    #[default]
    Other,
}

/// A product available for sale.
///
/// Fields are private: price and weight are only accepted through
/// [`Product::new`], including when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProductRecord")]
pub struct Product {
    id: ProductId,
    name: String,
    description: Option<String>,
    /// Unit price (exact decimal, never negative).
    price: Money,
    /// Unit weight in kilograms (exact decimal, never negative).
    weight: Weight,
    category: ProductCategory,
}

/// Unchecked wire shape of a [`Product`].
#[derive(Deserialize)]
struct ProductRecord {
    id: ProductId,
    name: String,
    #[serde(default)]
    description: Option<String>,
    price: Money,
    weight: Weight,
    #[serde(default)]
    category: ProductCategory,
}

impl TryFrom<ProductRecord> for Product {
    type Error = ValidationError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let product = Product::new(
            record.id,
            record.name,
            record.price,
            record.weight,
            record.category,
        )?;
        Ok(Product {
            description: record.description,
            ..product
        })
    }
}

impl Product {
    /// Creates a validated product.
    ///
    /// ## Rules
    /// - Name must not be empty
    /// - Price must be >= 0 (free items allowed) and within `MAX_UNIT_PRICE`
    /// - Weight must be >= 0 (digital goods allowed) and within `MAX_UNIT_WEIGHT`
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Money,
        weight: Weight,
        category: ProductCategory,
    ) -> ValidationResult<Self> {
        let name = name.into();
        validate_product_name(&name)?;
        validate_price(price)?;
        validate_weight(weight)?;

        Ok(Product {
            id,
            name,
            description: None,
            price,
            weight,
            category,
        })
    }

    /// Attaches a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn category(&self) -> ProductCategory {
        self.category
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A store customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub address: String,
    pub loyalty_tier: LoyaltyTier,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        name: impl Into<String>,
        address: impl Into<String>,
        loyalty_tier: LoyaltyTier,
    ) -> Self {
        Customer {
            id,
            name: name.into(),
            address: address.into(),
            loyalty_tier,
        }
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One (product, quantity) entry of a cart.
///
/// ## Snapshot Pattern
/// The product is copied into the line, so a cart prices consistently even
/// if the catalog changes while checkout is running.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    product: Product,
    quantity: u32,
}

impl CartLine {
    /// Creates a cart line.
    ///
    /// ## Errors
    /// `ValidationError::MustBePositive` if `quantity` is zero.
    pub fn new(product: Product, quantity: u32) -> ValidationResult<Self> {
        validate_quantity(quantity)?;
        Ok(CartLine { product, quantity })
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.product.price.multiply_quantity(self.quantity)
    }

    /// Unit weight × quantity.
    pub fn line_weight(&self) -> Weight {
        self.product.weight.multiply_quantity(self.quantity)
    }

    /// The (product id, quantity) pair sent to the stock provider.
    pub fn stock_item(&self) -> StockItem {
        StockItem {
            product_id: self.product.id,
            quantity: self.quantity,
        }
    }
}

/// A (product id, quantity) pair as understood by the stock provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

// =============================================================================
// Cart
// =============================================================================

/// A customer's cart, pending checkout.
///
/// ## Invariants
/// - Every line has quantity >= 1 (enforced by [`CartLine::new`])
/// - Immutable once built: there are no `&mut self` methods
#[derive(Debug, Clone)]
pub struct Cart {
    id: CartId,
    customer: Arc<Customer>,
    lines: Vec<CartLine>,
    created_on: NaiveDate,
}

impl Cart {
    /// Creates a cart dated today (UTC).
    pub fn new(id: CartId, customer: Arc<Customer>, lines: Vec<CartLine>) -> Self {
        Cart {
            id,
            customer,
            lines,
            created_on: Utc::now().date_naive(),
        }
    }

    /// Overrides the creation date (used when rebuilding stored carts).
    pub fn created_on(mut self, date: NaiveDate) -> Self {
        self.created_on = date;
        self
    }

    pub fn id(&self) -> CartId {
        self.id
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn creation_date(&self) -> NaiveDate {
        self.created_on
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total quantity of all lines.
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// The stock request for this cart, in line order.
    pub fn stock_items(&self) -> Vec<StockItem> {
        self.lines.iter().map(CartLine::stock_item).collect()
    }
}

// =============================================================================
// Checkout Outcome
// =============================================================================

/// Message carried by a successful checkout.
pub const CHECKOUT_SUCCESS_MESSAGE: &str = "Purchase completed successfully.";

/// Result of one checkout attempt, as handed to the caller.
///
/// Produced exactly once per attempt. Fields are private so the value cannot
/// be altered after creation.
///
/// ## Serialization
/// ```json
/// {
///   "success": true,
///   "paymentTransactionId": "9b2c…",
///   "message": "Purchase completed successfully."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOutcome {
    success: bool,
    payment_transaction_id: Option<TransactionId>,
    message: String,
}

impl CheckoutOutcome {
    /// A completed checkout carrying the payment transaction id.
    pub fn succeeded(transaction_id: TransactionId) -> Self {
        CheckoutOutcome {
            success: true,
            payment_transaction_id: Some(transaction_id),
            message: CHECKOUT_SUCCESS_MESSAGE.to_string(),
        }
    }

    /// A failed checkout with a message describing the cause.
    pub fn failed(message: impl Into<String>) -> Self {
        CheckoutOutcome {
            success: false,
            payment_transaction_id: None,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn payment_transaction_id(&self) -> Option<&TransactionId> {
        self.payment_transaction_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u64, price: i64, weight: i64) -> Product {
        Product::new(
            ProductId(id),
            format!("Product {}", id),
            Money::from_major(price),
            Weight::from_kg(weight),
            ProductCategory::Electronics,
        )
        .unwrap()
    }

    fn customer() -> Arc<Customer> {
        Arc::new(Customer::new(CustomerId(1), "Test", "Test Street", LoyaltyTier::Gold))
    }

    #[test]
    fn test_loyalty_tier_parsing() {
        assert_eq!("gold".parse::<LoyaltyTier>().unwrap(), LoyaltyTier::Gold);
        assert_eq!(" SILVER ".parse::<LoyaltyTier>().unwrap(), LoyaltyTier::Silver);
        assert_eq!("Bronze".parse::<LoyaltyTier>().unwrap(), LoyaltyTier::Bronze);
        assert!("platinum".parse::<LoyaltyTier>().is_err());
    }

    #[test]
    fn test_loyalty_tier_default_is_bronze() {
        assert_eq!(LoyaltyTier::default(), LoyaltyTier::Bronze);
    }

    #[test]
    fn test_product_rejects_negative_values() {
        let negative_price = Product::new(
            ProductId(1),
            "Broken",
            Money::from_cents(-1),
            Weight::zero(),
            ProductCategory::Other,
        );
        assert!(negative_price.is_err());

        let negative_weight = Product::new(
            ProductId(1),
            "Broken",
            Money::zero(),
            Weight::from_grams(-1),
            ProductCategory::Other,
        );
        assert!(negative_weight.is_err());
    }

    #[test]
    fn test_product_deserialization_is_validated() {
        let product: Product = serde_json::from_str(
            r#"{ "id": 4, "name": "Lamp", "price": "19.90", "weight": "1.2", "category": "furniture" }"#,
        )
        .unwrap();
        assert_eq!(product.id(), ProductId(4));
        assert_eq!(product.price(), Money::from_cents(1990));
        assert_eq!(product.category(), ProductCategory::Furniture);
        assert!(product.description().is_none());

        let negative = serde_json::from_str::<Product>(
            r#"{ "id": 4, "name": "Lamp", "price": "-1", "weight": "1" }"#,
        );
        assert!(negative.is_err());

        let unnamed = serde_json::from_str::<Product>(
            r#"{ "id": 4, "name": " ", "price": "1", "weight": "1" }"#,
        );
        assert!(unnamed.is_err());
    }

    #[test]
    fn test_product_serialization_round_trips_through_validation() {
        let original = product(2, 15, 3).with_description("Desk lamp");
        let json = serde_json::to_string(&original).unwrap();
        let restored: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original);
        assert_eq!(restored.description(), Some("Desk lamp"));
    }

    #[test]
    fn test_cart_line_rejects_zero_quantity() {
        assert!(CartLine::new(product(1, 10, 1), 0).is_err());
        assert!(CartLine::new(product(1, 10, 1), 1).is_ok());
    }

    #[test]
    fn test_cart_line_totals() {
        let line = CartLine::new(product(1, 25, 2), 3).unwrap();
        assert_eq!(line.line_total(), Money::from_major(75));
        assert_eq!(line.line_weight(), Weight::from_kg(6));
        assert_eq!(
            line.stock_item(),
            StockItem {
                product_id: ProductId(1),
                quantity: 3
            }
        );
    }

    #[test]
    fn test_cart_stock_items_keep_line_order() {
        let cart = Cart::new(
            CartId(7),
            customer(),
            vec![
                CartLine::new(product(3, 1, 1), 2).unwrap(),
                CartLine::new(product(1, 1, 1), 5).unwrap(),
            ],
        );

        let ids: Vec<ProductId> = cart.stock_items().iter().map(|i| i.product_id).collect();
        assert_eq!(ids, vec![ProductId(3), ProductId(1)]);
        assert_eq!(cart.total_quantity(), 7);
        assert_eq!(cart.customer().loyalty_tier, LoyaltyTier::Gold);
    }

    #[test]
    fn test_cart_created_on_override() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let cart = Cart::new(CartId(1), customer(), Vec::new()).created_on(date);
        assert_eq!(cart.creation_date(), date);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = CheckoutOutcome::succeeded(TransactionId::new("123"));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["paymentTransactionId"], "123");
        assert_eq!(json["message"], CHECKOUT_SUCCESS_MESSAGE);

        let failed = CheckoutOutcome::failed("Items out of stock.");
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["paymentTransactionId"].is_null());
    }
}
