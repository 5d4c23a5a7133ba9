//! # Checkout Orchestrator
//!
//! Runs one checkout attempt: resolve, check stock, price, authorize, deduct,
//! and compensate when the deduction fails after the payment went through.
//!
//! ## Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    finalize_checkout(cart_id, customer_id)              │
//! │                                                                         │
//! │  1. customer_by_id ─────────── None ──► CustomerNotFound                │
//! │        │                                                                │
//! │  2. cart_by_id_and_customer ── None ──► CartNotFound                    │
//! │        │                                                                │
//! │  3. check_availability ─────── no ────► StockUnavailable   (stop)       │
//! │        │                                                                │
//! │  4. PricingCalculator::price (pure)                                     │
//! │        │                                                                │
//! │  5. authorize(total) ───────── no ────► PaymentDeclined    (stop)       │
//! │        │ transaction id                                                 │
//! │  6. deduct ─────────────────── no ────► cancel(transaction id)          │
//! │        │                                  │ ok    → StockDeductionFailed│
//! │        │                                  │ error → CompensationFailed  │
//! │  7. CheckoutOutcome::succeeded(transaction id)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! - Steps run strictly in order; each collaborator call happens at most once
//! - Nothing is retried
//! - A payment that was authorized is either kept (deduction succeeded),
//!   cancelled, or reported as `CompensationFailed`

use std::sync::Arc;

use storefront_core::money::Money;
use storefront_core::pricing::PricingCalculator;
use storefront_core::types::{CartId, CheckoutOutcome, CustomerId, StockItem, TransactionId};
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::error::{CheckoutError, CheckoutResult, ProviderError};
use crate::ports::{CartLookup, CustomerLookup, PaymentAuthorization, PaymentProvider, StockProvider};

/// Coordinates the collaborators of a checkout.
///
/// Holds no per-attempt state, so one orchestrator can serve concurrent
/// attempts. Overselling between attempts is the stock provider's concern.
pub struct CheckoutOrchestrator {
    customers: Arc<dyn CustomerLookup>,
    carts: Arc<dyn CartLookup>,
    stock: Arc<dyn StockProvider>,
    payments: Arc<dyn PaymentProvider>,
    calculator: PricingCalculator,
}

impl CheckoutOrchestrator {
    /// Creates an orchestrator over explicitly injected collaborators.
    pub fn new(
        customers: Arc<dyn CustomerLookup>,
        carts: Arc<dyn CartLookup>,
        stock: Arc<dyn StockProvider>,
        payments: Arc<dyn PaymentProvider>,
        calculator: PricingCalculator,
    ) -> Self {
        CheckoutOrchestrator {
            customers,
            carts,
            stock,
            payments,
            calculator,
        }
    }

    pub fn calculator(&self) -> &PricingCalculator {
        &self.calculator
    }

    /// Runs a checkout attempt and reports the failure kind on error.
    pub async fn finalize_checkout(
        &self,
        cart_id: CartId,
        customer_id: CustomerId,
    ) -> CheckoutResult<CheckoutOutcome> {
        let span = info_span!("checkout", %cart_id, %customer_id);
        self.run(cart_id, customer_id).instrument(span).await
    }

    /// Runs a checkout attempt and folds any failure into a non-success
    /// outcome.
    pub async fn checkout(&self, cart_id: CartId, customer_id: CustomerId) -> CheckoutOutcome {
        match self.finalize_checkout(cart_id, customer_id).await {
            Ok(outcome) => outcome,
            Err(err) => {
                if let CheckoutError::UnexpectedError(detail) = &err {
                    error!(%cart_id, %customer_id, detail = %detail, "Checkout failed unexpectedly");
                }
                CheckoutOutcome::failed(err.user_message())
            }
        }
    }

    async fn run(&self, cart_id: CartId, customer_id: CustomerId) -> CheckoutResult<CheckoutOutcome> {
        // Step 1: customer
        debug!("Resolving customer");
        let customer = self
            .customers
            .customer_by_id(customer_id)
            .await
            .map_err(|e| CheckoutError::UnexpectedError(format!("customer lookup failed: {}", e)))?
            .ok_or(CheckoutError::CustomerNotFound { customer_id })?;

        // Step 2: cart
        debug!("Resolving cart");
        let cart = self
            .carts
            .cart_by_id_and_customer(cart_id, &customer)
            .await
            .map_err(|e| CheckoutError::UnexpectedError(format!("cart lookup failed: {}", e)))?
            .ok_or(CheckoutError::CartNotFound {
                cart_id,
                customer_id,
            })?;

        let items = cart.stock_items();

        // Step 3: stock availability
        self.ensure_available(&items).await?;

        // Step 4: pricing
        let breakdown = self.calculator.price(&cart);
        let amount = breakdown.total.round_to_cents();
        debug!(
            subtotal = %breakdown.subtotal,
            discount = %breakdown.discount,
            weight = %breakdown.total_weight,
            shipping = %breakdown.shipping,
            total = %amount,
            "Cart priced"
        );

        // Step 5: payment
        let transaction_id = self.authorize(customer.id, amount).await?;

        // Step 6: stock deduction (compensated on failure)
        self.deduct_or_compensate(customer.id, &items, &transaction_id)
            .await?;

        info!(transaction_id = %transaction_id, total = %amount, "Checkout completed");
        Ok(CheckoutOutcome::succeeded(transaction_id))
    }

    async fn ensure_available(&self, items: &[StockItem]) -> CheckoutResult<()> {
        debug!(lines = items.len(), "Checking stock availability");

        let availability = self
            .stock
            .check_availability(items)
            .await
            .map_err(|cause| {
                warn!(error = %cause, "Stock check failed");
                CheckoutError::StockUnavailable {
                    product_ids: Vec::new(),
                    cause: Some(cause),
                }
            })?;

        if !availability.available {
            warn!(unavailable = ?availability.unavailable_ids, "Items out of stock");
            return Err(CheckoutError::StockUnavailable {
                product_ids: availability.unavailable_ids,
                cause: None,
            });
        }

        Ok(())
    }

    async fn authorize(&self, customer_id: CustomerId, amount: Money) -> CheckoutResult<TransactionId> {
        debug!(amount = %amount, "Authorizing payment");

        let authorization = self
            .payments
            .authorize(customer_id, amount)
            .await
            .map_err(|cause| {
                warn!(error = %cause, "Payment authorization failed");
                CheckoutError::PaymentDeclined { cause: Some(cause) }
            })?;

        match authorization {
            PaymentAuthorization::Authorized(transaction_id) => {
                debug!(transaction_id = %transaction_id, "Payment authorized");
                Ok(transaction_id)
            }
            PaymentAuthorization::Declined => {
                warn!(amount = %amount, "Payment declined");
                Err(CheckoutError::PaymentDeclined { cause: None })
            }
        }
    }

    async fn deduct_or_compensate(
        &self,
        customer_id: CustomerId,
        items: &[StockItem],
        transaction_id: &TransactionId,
    ) -> CheckoutResult<()> {
        debug!("Deducting stock");

        let cause = match self.stock.deduct(items).await {
            Ok(deduction) if deduction.success => return Ok(()),
            Ok(_) => None,
            Err(e) => Some(e),
        };

        warn!(
            transaction_id = %transaction_id,
            cause = %describe(cause.as_ref()),
            "Stock deduction failed, cancelling payment"
        );

        match self.payments.cancel(customer_id, transaction_id).await {
            Ok(()) => {
                info!(transaction_id = %transaction_id, "Payment cancelled");
                Err(CheckoutError::StockDeductionFailed {
                    transaction_id: transaction_id.clone(),
                    cause,
                })
            }
            Err(cancel_error) => {
                error!(
                    transaction_id = %transaction_id,
                    error = %cancel_error,
                    "Payment cancellation failed, charge needs manual reconciliation"
                );
                Err(CheckoutError::CompensationFailed {
                    transaction_id: transaction_id.clone(),
                    deduction_cause: cause,
                    cancel_error,
                })
            }
        }
    }
}

fn describe(cause: Option<&ProviderError>) -> String {
    cause.map_or_else(|| "deduction refused".to_string(), ToString::to_string)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GENERIC_FAILURE_MESSAGE;
    use crate::ports::{
        MockCartLookup, MockCustomerLookup, MockPaymentProvider, MockStockProvider,
        StockAvailability, StockDeduction,
    };
    use rust_decimal::Decimal;
    use storefront_core::money::Weight;
    use storefront_core::types::{
        Cart, CartLine, Customer, LoyaltyTier, Product, ProductCategory, ProductId,
        CHECKOUT_SUCCESS_MESSAGE,
    };

    const CUSTOMER: CustomerId = CustomerId(1);
    const CART: CartId = CartId(10);

    fn customer() -> Customer {
        Customer::new(CUSTOMER, "Ana", "Rua A, 10", LoyaltyTier::Silver)
    }

    /// 600 / 9 kg / Silver → 549.
    fn cart() -> Cart {
        let monitor = Product::new(
            ProductId(1),
            "Monitor",
            Money::from_major(600),
            Weight::from_kg(9),
            ProductCategory::Electronics,
        )
        .unwrap();
        Cart::new(
            CART,
            Arc::new(customer()),
            vec![CartLine::new(monitor, 1).unwrap()],
        )
    }

    struct Mocks {
        customers: MockCustomerLookup,
        carts: MockCartLookup,
        stock: MockStockProvider,
        payments: MockPaymentProvider,
    }

    impl Mocks {
        fn new() -> Self {
            Mocks {
                customers: MockCustomerLookup::new(),
                carts: MockCartLookup::new(),
                stock: MockStockProvider::new(),
                payments: MockPaymentProvider::new(),
            }
        }

        /// Customer and cart both resolve.
        fn resolving() -> Self {
            let mut mocks = Mocks::new();
            mocks
                .customers
                .expect_customer_by_id()
                .once()
                .withf(|id| *id == CUSTOMER)
                .return_once(|_| Ok(Some(customer())));
            mocks
                .carts
                .expect_cart_by_id_and_customer()
                .once()
                .withf(|cart_id, customer| *cart_id == CART && customer.id == CUSTOMER)
                .return_once(|_, _| Ok(Some(cart())));
            mocks
        }

        fn in_stock(mut self) -> Self {
            self.stock
                .expect_check_availability()
                .once()
                .withf(|items| items.len() == 1 && items[0].product_id == ProductId(1))
                .return_once(|_| Ok(StockAvailability::all_available()));
            self
        }

        fn authorized(mut self, transaction_id: &'static str) -> Self {
            self.payments
                .expect_authorize()
                .once()
                .withf(|customer_id, amount| {
                    *customer_id == CUSTOMER && *amount == Money::from_major(549)
                })
                .return_once(move |_, _| {
                    Ok(PaymentAuthorization::Authorized(TransactionId::new(
                        transaction_id,
                    )))
                });
            self
        }

        fn into_orchestrator(self) -> CheckoutOrchestrator {
            CheckoutOrchestrator::new(
                Arc::new(self.customers),
                Arc::new(self.carts),
                Arc::new(self.stock),
                Arc::new(self.payments),
                PricingCalculator::default(),
            )
        }
    }

    #[tokio::test]
    async fn test_successful_checkout() {
        let mut mocks = Mocks::resolving().in_stock().authorized("tx-1");
        mocks
            .stock
            .expect_deduct()
            .once()
            .withf(|items| items[0].quantity == 1)
            .return_once(|_| Ok(StockDeduction::succeeded()));
        mocks.payments.expect_cancel().never();

        let outcome = mocks
            .into_orchestrator()
            .finalize_checkout(CART, CUSTOMER)
            .await
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.payment_transaction_id(), Some(&TransactionId::new("tx-1")));
        assert_eq!(outcome.message(), CHECKOUT_SUCCESS_MESSAGE);
    }

    #[tokio::test]
    async fn test_unknown_customer_stops_immediately() {
        let mut mocks = Mocks::new();
        mocks
            .customers
            .expect_customer_by_id()
            .once()
            .return_once(|_| Ok(None));
        mocks.carts.expect_cart_by_id_and_customer().never();
        mocks.stock.expect_check_availability().never();
        mocks.payments.expect_authorize().never();

        let err = mocks
            .into_orchestrator()
            .finalize_checkout(CART, CUSTOMER)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::CustomerNotFound { customer_id } if customer_id == CUSTOMER));
    }

    #[tokio::test]
    async fn test_unknown_cart_stops_immediately() {
        let mut mocks = Mocks::new();
        mocks
            .customers
            .expect_customer_by_id()
            .once()
            .return_once(|_| Ok(Some(customer())));
        mocks
            .carts
            .expect_cart_by_id_and_customer()
            .once()
            .return_once(|_, _| Ok(None));
        mocks.stock.expect_check_availability().never();
        mocks.payments.expect_authorize().never();

        let err = mocks
            .into_orchestrator()
            .finalize_checkout(CART, CUSTOMER)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::CartNotFound { cart_id, .. } if cart_id == CART));
    }

    #[tokio::test]
    async fn test_stock_unavailable_never_touches_payment() {
        let mut mocks = Mocks::resolving();
        mocks
            .stock
            .expect_check_availability()
            .once()
            .return_once(|_| Ok(StockAvailability::missing(vec![ProductId(1)])));
        mocks.stock.expect_deduct().never();
        mocks.payments.expect_authorize().never();
        mocks.payments.expect_cancel().never();

        let err = mocks
            .into_orchestrator()
            .finalize_checkout(CART, CUSTOMER)
            .await
            .unwrap_err();

        match err {
            CheckoutError::StockUnavailable { product_ids, cause } => {
                assert_eq!(product_ids, vec![ProductId(1)]);
                assert!(cause.is_none());
            }
            other => panic!("expected StockUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stock_check_timeout_is_stock_unavailable() {
        let mut mocks = Mocks::resolving();
        mocks
            .stock
            .expect_check_availability()
            .once()
            .return_once(|_| Err(ProviderError::timeout("stock")));
        mocks.payments.expect_authorize().never();

        let err = mocks
            .into_orchestrator()
            .finalize_checkout(CART, CUSTOMER)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::StockUnavailable { cause: Some(ProviderError::Timeout { .. }), .. }
        ));
    }

    #[tokio::test]
    async fn test_declined_payment_never_deducts() {
        let mut mocks = Mocks::resolving().in_stock();
        mocks
            .payments
            .expect_authorize()
            .once()
            .return_once(|_, _| Ok(PaymentAuthorization::Declined));
        mocks.stock.expect_deduct().never();
        mocks.payments.expect_cancel().never();

        let err = mocks
            .into_orchestrator()
            .finalize_checkout(CART, CUSTOMER)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::PaymentDeclined { cause: None }));
        assert_eq!(err.code().http_status(), 400);
    }

    #[tokio::test]
    async fn test_payment_outage_is_payment_declined() {
        let mut mocks = Mocks::resolving().in_stock();
        mocks
            .payments
            .expect_authorize()
            .once()
            .return_once(|_, _| Err(ProviderError::unavailable("payment", "503")));
        mocks.stock.expect_deduct().never();
        mocks.payments.expect_cancel().never();

        let err = mocks
            .into_orchestrator()
            .finalize_checkout(CART, CUSTOMER)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::PaymentDeclined { cause: Some(_) }));
    }

    #[tokio::test]
    async fn test_failed_deduction_cancels_payment_once() {
        let mut mocks = Mocks::resolving().in_stock().authorized("tx-7");
        mocks
            .stock
            .expect_deduct()
            .once()
            .return_once(|_| Ok(StockDeduction::failed()));
        mocks
            .payments
            .expect_cancel()
            .times(1)
            .withf(|customer_id, transaction_id| {
                *customer_id == CUSTOMER && transaction_id.as_str() == "tx-7"
            })
            .return_once(|_, _| Ok(()));

        let err = mocks
            .into_orchestrator()
            .finalize_checkout(CART, CUSTOMER)
            .await
            .unwrap_err();

        match &err {
            CheckoutError::StockDeductionFailed {
                transaction_id,
                cause,
            } => {
                assert_eq!(transaction_id.as_str(), "tx-7");
                assert!(cause.is_none());
            }
            other => panic!("expected StockDeductionFailed, got {:?}", other),
        }
        assert!(!err.needs_reconciliation());
    }

    #[tokio::test]
    async fn test_deduction_error_also_compensates() {
        let mut mocks = Mocks::resolving().in_stock().authorized("tx-8");
        mocks
            .stock
            .expect_deduct()
            .once()
            .return_once(|_| Err(ProviderError::timeout("stock")));
        mocks
            .payments
            .expect_cancel()
            .times(1)
            .withf(|_, transaction_id| transaction_id.as_str() == "tx-8")
            .return_once(|_, _| Ok(()));

        let err = mocks
            .into_orchestrator()
            .finalize_checkout(CART, CUSTOMER)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::StockDeductionFailed { cause: Some(ProviderError::Timeout { .. }), .. }
        ));
    }

    #[tokio::test]
    async fn test_failed_cancellation_is_reported() {
        let mut mocks = Mocks::resolving().in_stock().authorized("tx-9");
        mocks
            .stock
            .expect_deduct()
            .once()
            .return_once(|_| Ok(StockDeduction::failed()));
        mocks
            .payments
            .expect_cancel()
            .times(1)
            .return_once(|_, _| Err(ProviderError::rejected("payment", "already captured")));

        let err = mocks
            .into_orchestrator()
            .finalize_checkout(CART, CUSTOMER)
            .await
            .unwrap_err();

        match &err {
            CheckoutError::CompensationFailed {
                transaction_id,
                deduction_cause,
                cancel_error,
            } => {
                assert_eq!(transaction_id.as_str(), "tx-9");
                assert!(deduction_cause.is_none());
                assert_eq!(
                    *cancel_error,
                    ProviderError::rejected("payment", "already captured")
                );
            }
            other => panic!("expected CompensationFailed, got {:?}", other),
        }
        assert!(err.needs_reconciliation());
    }

    #[tokio::test]
    async fn test_lookup_outage_is_unexpected() {
        let mut mocks = Mocks::new();
        mocks
            .customers
            .expect_customer_by_id()
            .once()
            .return_once(|_| Err(ProviderError::unavailable("customers", "pool exhausted")));
        mocks.carts.expect_cart_by_id_and_customer().never();

        let orchestrator = mocks.into_orchestrator();
        let outcome = orchestrator.checkout(CART, CUSTOMER).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.message(), GENERIC_FAILURE_MESSAGE);
        assert!(outcome.payment_transaction_id().is_none());
    }

    #[tokio::test]
    async fn test_cart_lookup_outage_is_unexpected() {
        let mut mocks = Mocks::new();
        mocks
            .customers
            .expect_customer_by_id()
            .once()
            .return_once(|_| Ok(Some(customer())));
        mocks
            .carts
            .expect_cart_by_id_and_customer()
            .once()
            .return_once(|_, _| Err(ProviderError::timeout("carts")));
        mocks.stock.expect_check_availability().never();
        mocks.stock.expect_deduct().never();
        mocks.payments.expect_authorize().never();

        let err = mocks
            .into_orchestrator()
            .finalize_checkout(CART, CUSTOMER)
            .await
            .unwrap_err();

        match &err {
            CheckoutError::UnexpectedError(detail) => {
                assert!(detail.starts_with("cart lookup failed"), "{}", detail);
            }
            other => panic!("expected UnexpectedError, got {:?}", other),
        }
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_checkout_folds_failure_into_outcome() {
        let mut mocks = Mocks::resolving();
        mocks
            .stock
            .expect_check_availability()
            .once()
            .return_once(|_| Ok(StockAvailability::missing(vec![ProductId(1)])));
        mocks.payments.expect_authorize().never();

        let outcome = mocks.into_orchestrator().checkout(CART, CUSTOMER).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.message(), "Items out of stock (products 1)");
        assert!(outcome.payment_transaction_id().is_none());
    }

    #[tokio::test]
    async fn test_authorized_amount_is_rounded_to_cents() {
        // 3 × 11.1115 = 33.3345, no discount, 1 kg ships free
        let product = Product::new(
            ProductId(2),
            "Cable",
            Money::from_decimal(Decimal::new(111115, 4)),
            Weight::from_grams(300),
            ProductCategory::Electronics,
        )
        .unwrap();
        let fine_cart = Cart::new(
            CART,
            Arc::new(customer()),
            vec![CartLine::new(product, 3).unwrap()],
        );

        let mut mocks = Mocks::new();
        mocks
            .customers
            .expect_customer_by_id()
            .return_once(|_| Ok(Some(customer())));
        mocks
            .carts
            .expect_cart_by_id_and_customer()
            .return_once(move |_, _| Ok(Some(fine_cart)));
        mocks
            .stock
            .expect_check_availability()
            .return_once(|_| Ok(StockAvailability::all_available()));
        mocks
            .payments
            .expect_authorize()
            .once()
            .withf(|_, amount| *amount == Money::from_cents(3333))
            .return_once(|_, _| Ok(PaymentAuthorization::Authorized(TransactionId::new("tx-r"))));
        mocks
            .stock
            .expect_deduct()
            .return_once(|_| Ok(StockDeduction::succeeded()));

        let outcome = mocks.into_orchestrator().checkout(CART, CUSTOMER).await;
        assert!(outcome.is_success());
    }
}
