//! # Collaborator Ports
//!
//! The narrow interfaces the checkout workflow uses to reach the outside
//! world. Each is an object-safe async trait held as `Arc<dyn …>`, so the
//! orchestrator can run against real services, the in-memory reference
//! implementations in [`crate::memory`], or generated mocks.
//!
//! ## Contracts
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CustomerLookup   customer_by_id            → Option<Customer>          │
//! │  CartLookup       cart_by_id_and_customer   → Option<Cart>              │
//! │  StockProvider    check_availability        → StockAvailability         │
//! │                   deduct                    → StockDeduction            │
//! │  PaymentProvider  authorize                 → PaymentAuthorization      │
//! │                   cancel                    → ()                        │
//! │                                                                         │
//! │  Every call may fail with ProviderError (timeout, outage, rejection).  │
//! │  "Not found" is Ok(None), not an error.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use storefront_core::money::Money;
use storefront_core::types::{Cart, CartId, Customer, CustomerId, ProductId, StockItem, TransactionId};

use crate::error::ProviderError;

/// Result type for collaborator calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

// =============================================================================
// Stock Results
// =============================================================================

/// Answer of a stock availability check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StockAvailability {
    /// True if every requested quantity can be served.
    pub available: bool,

    /// Products that cannot be served (empty when `available`).
    pub unavailable_ids: Vec<ProductId>,
}

impl StockAvailability {
    pub fn all_available() -> Self {
        StockAvailability {
            available: true,
            unavailable_ids: Vec::new(),
        }
    }

    pub fn missing(unavailable_ids: Vec<ProductId>) -> Self {
        StockAvailability {
            available: false,
            unavailable_ids,
        }
    }
}

/// Answer of a stock deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockDeduction {
    /// True if every line was deducted.
    pub success: bool,
}

impl StockDeduction {
    pub fn succeeded() -> Self {
        StockDeduction { success: true }
    }

    pub fn failed() -> Self {
        StockDeduction { success: false }
    }
}

// =============================================================================
// Payment Results
// =============================================================================

/// Answer of a payment authorization.
///
/// An authorized charge always carries its transaction id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentAuthorization {
    Authorized(TransactionId),
    Declined,
}

impl PaymentAuthorization {
    pub fn is_authorized(&self) -> bool {
        matches!(self, PaymentAuthorization::Authorized(_))
    }
}

// =============================================================================
// Traits
// =============================================================================

/// Resolves customers by id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerLookup: Send + Sync {
    async fn customer_by_id(&self, id: CustomerId) -> ProviderResult<Option<Customer>>;
}

/// Resolves a cart that belongs to a given customer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartLookup: Send + Sync {
    /// Returns `None` if the cart does not exist or belongs to someone else.
    async fn cart_by_id_and_customer(
        &self,
        cart_id: CartId,
        customer: &Customer,
    ) -> ProviderResult<Option<Cart>>;
}

/// Inventory service.
///
/// The provider is authoritative: a successful availability check does not
/// guarantee that a later `deduct` succeeds.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockProvider: Send + Sync {
    /// Checks whether every (product, quantity) pair can be served.
    async fn check_availability(&self, items: &[StockItem]) -> ProviderResult<StockAvailability>;

    /// Removes the quantities from stock.
    async fn deduct(&self, items: &[StockItem]) -> ProviderResult<StockDeduction>;
}

/// Payment processor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Places a hold for `amount` on the customer's payment method.
    async fn authorize(
        &self,
        customer_id: CustomerId,
        amount: Money,
    ) -> ProviderResult<PaymentAuthorization>;

    /// Releases a previously authorized hold.
    async fn cancel(
        &self,
        customer_id: CustomerId,
        transaction_id: &TransactionId,
    ) -> ProviderResult<()>;
}
