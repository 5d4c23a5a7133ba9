//! # In-Memory Collaborators
//!
//! Reference implementations of the collaborator ports, backed by maps behind
//! tokio locks. Used by the demo binary and the end-to-end tests.
//!
//! ## Components
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InMemoryDirectory        CustomerLookup + CartLookup                   │
//! │  ├── customers: RwLock<HashMap<CustomerId, Customer>>                  │
//! │  └── carts:     RwLock<HashMap<CartId, Cart>>                          │
//! │                                                                         │
//! │  InMemoryWarehouse        StockProvider                                 │
//! │  └── levels:    Mutex<HashMap<ProductId, u64>>                         │
//! │      deduct re-checks under the lock: all lines or none                │
//! │                                                                         │
//! │  InMemoryPaymentGateway   PaymentProvider                               │
//! │  ├── credit_limits: RwLock<HashMap<CustomerId, Money>>                 │
//! │  └── ledger:        Mutex<Vec<AuthorizationRecord>>                    │
//! │      outstanding holds count against the customer's limit              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use storefront_core::money::Money;
use storefront_core::types::{Cart, CartId, Customer, CustomerId, ProductId, StockItem, TransactionId};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::error::ProviderError;
use crate::ports::{
    CartLookup, CustomerLookup, PaymentAuthorization, PaymentProvider, ProviderResult,
    StockAvailability, StockDeduction, StockProvider,
};

const STOCK_SERVICE: &str = "stock";
const PAYMENT_SERVICE: &str = "payment";

// =============================================================================
// Directory (customers + carts)
// =============================================================================

/// Customers and carts keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    customers: RwLock<HashMap<CustomerId, Customer>>,
    carts: RwLock<HashMap<CartId, Cart>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a customer.
    pub async fn insert_customer(&self, customer: Customer) {
        self.customers.write().await.insert(customer.id, customer);
    }

    /// Adds or replaces a cart.
    pub async fn insert_cart(&self, cart: Cart) {
        self.carts.write().await.insert(cart.id(), cart);
    }
}

#[async_trait]
impl CustomerLookup for InMemoryDirectory {
    async fn customer_by_id(&self, id: CustomerId) -> ProviderResult<Option<Customer>> {
        Ok(self.customers.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl CartLookup for InMemoryDirectory {
    async fn cart_by_id_and_customer(
        &self,
        cart_id: CartId,
        customer: &Customer,
    ) -> ProviderResult<Option<Cart>> {
        let carts = self.carts.read().await;
        Ok(carts
            .get(&cart_id)
            .filter(|cart| cart.customer().id == customer.id)
            .cloned())
    }
}

// =============================================================================
// Warehouse (stock)
// =============================================================================

/// Stock levels per product.
#[derive(Debug, Default)]
pub struct InMemoryWarehouse {
    levels: Mutex<HashMap<ProductId, u64>>,
    refuse_deductions: AtomicBool,
}

impl InMemoryWarehouse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stock level of a product.
    pub async fn set_stock(&self, product_id: ProductId, quantity: u64) {
        self.levels.lock().await.insert(product_id, quantity);
    }

    /// Current stock level (0 for unknown products).
    pub async fn stock_of(&self, product_id: ProductId) -> u64 {
        self.levels
            .lock()
            .await
            .get(&product_id)
            .copied()
            .unwrap_or(0)
    }

    /// Makes every deduction fail while set, as if the stock moved between
    /// the check and the deduction.
    pub fn refuse_deductions(&self, refuse: bool) {
        self.refuse_deductions.store(refuse, Ordering::SeqCst);
    }

    /// Products whose level cannot serve the requested quantities, in first
    /// appearance order. Lines of the same product are added up.
    fn shortages(levels: &HashMap<ProductId, u64>, items: &[StockItem]) -> Vec<ProductId> {
        let mut demand: Vec<(ProductId, u64)> = Vec::new();
        for item in items {
            match demand.iter_mut().find(|(id, _)| *id == item.product_id) {
                Some((_, qty)) => *qty += u64::from(item.quantity),
                None => demand.push((item.product_id, u64::from(item.quantity))),
            }
        }

        demand
            .into_iter()
            .filter(|(id, qty)| levels.get(id).copied().unwrap_or(0) < *qty)
            .map(|(id, _)| id)
            .collect()
    }
}

#[async_trait]
impl StockProvider for InMemoryWarehouse {
    async fn check_availability(&self, items: &[StockItem]) -> ProviderResult<StockAvailability> {
        let levels = self.levels.lock().await;
        let missing = Self::shortages(&levels, items);

        if missing.is_empty() {
            Ok(StockAvailability::all_available())
        } else {
            debug!(service = STOCK_SERVICE, ?missing, "Insufficient stock");
            Ok(StockAvailability::missing(missing))
        }
    }

    async fn deduct(&self, items: &[StockItem]) -> ProviderResult<StockDeduction> {
        let mut levels = self.levels.lock().await;

        if self.refuse_deductions.load(Ordering::SeqCst) {
            debug!(service = STOCK_SERVICE, "Deduction refused");
            return Ok(StockDeduction::failed());
        }

        if !Self::shortages(&levels, items).is_empty() {
            return Ok(StockDeduction::failed());
        }

        for item in items {
            if let Some(level) = levels.get_mut(&item.product_id) {
                *level -= u64::from(item.quantity);
            }
        }

        Ok(StockDeduction::succeeded())
    }
}

// =============================================================================
// Payment Gateway
// =============================================================================

/// State of a recorded authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    Authorized,
    Cancelled,
}

/// One authorization issued by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRecord {
    pub transaction_id: TransactionId,
    pub customer_id: CustomerId,
    pub amount: Money,
    pub status: AuthorizationStatus,
}

/// Payment processor with per-customer credit limits.
///
/// A customer without a limit is declined. Outstanding (not cancelled)
/// authorizations reduce the available credit.
#[derive(Debug, Default)]
pub struct InMemoryPaymentGateway {
    credit_limits: RwLock<HashMap<CustomerId, Money>>,
    ledger: Mutex<Vec<AuthorizationRecord>>,
    fail_cancellations: AtomicBool,
}

impl InMemoryPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_credit_limit(&self, customer_id: CustomerId, limit: Money) {
        self.credit_limits.write().await.insert(customer_id, limit);
    }

    /// Makes every cancellation fail while set.
    pub fn fail_cancellations(&self, fail: bool) {
        self.fail_cancellations.store(fail, Ordering::SeqCst);
    }

    /// All authorizations in issue order.
    pub async fn authorizations(&self) -> Vec<AuthorizationRecord> {
        self.ledger.lock().await.clone()
    }

    pub async fn authorization(&self, transaction_id: &TransactionId) -> Option<AuthorizationRecord> {
        self.ledger
            .lock()
            .await
            .iter()
            .find(|record| &record.transaction_id == transaction_id)
            .cloned()
    }
}

#[async_trait]
impl PaymentProvider for InMemoryPaymentGateway {
    async fn authorize(
        &self,
        customer_id: CustomerId,
        amount: Money,
    ) -> ProviderResult<PaymentAuthorization> {
        let limit = match self.credit_limits.read().await.get(&customer_id) {
            Some(limit) => *limit,
            None => {
                debug!(service = PAYMENT_SERVICE, %customer_id, "No credit line");
                return Ok(PaymentAuthorization::Declined);
            }
        };

        let mut ledger = self.ledger.lock().await;
        let outstanding: Money = ledger
            .iter()
            .filter(|r| r.customer_id == customer_id && r.status == AuthorizationStatus::Authorized)
            .map(|r| r.amount)
            .sum();

        if outstanding + amount > limit {
            debug!(
                service = PAYMENT_SERVICE,
                %customer_id,
                %amount,
                available = %(limit - outstanding),
                "Credit limit exceeded"
            );
            return Ok(PaymentAuthorization::Declined);
        }

        let transaction_id = TransactionId::new(Uuid::new_v4().to_string());
        ledger.push(AuthorizationRecord {
            transaction_id: transaction_id.clone(),
            customer_id,
            amount,
            status: AuthorizationStatus::Authorized,
        });

        Ok(PaymentAuthorization::Authorized(transaction_id))
    }

    async fn cancel(
        &self,
        customer_id: CustomerId,
        transaction_id: &TransactionId,
    ) -> ProviderResult<()> {
        if self.fail_cancellations.load(Ordering::SeqCst) {
            return Err(ProviderError::unavailable(
                PAYMENT_SERVICE,
                "cancellation endpoint not responding",
            ));
        }

        let mut ledger = self.ledger.lock().await;
        let record = ledger
            .iter_mut()
            .find(|r| &r.transaction_id == transaction_id && r.customer_id == customer_id)
            .ok_or_else(|| {
                ProviderError::rejected(
                    PAYMENT_SERVICE,
                    format!("unknown transaction {}", transaction_id),
                )
            })?;

        record.status = AuthorizationStatus::Cancelled;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
