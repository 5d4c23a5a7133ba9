//! # storefront-checkout: Checkout Orchestration
//!
//! Finalizes a purchase: checks stock, prices the cart, authorizes payment,
//! deducts stock, and cancels the payment if the deduction fails.
//!
//! ## Module Organization
//! ```text
//! storefront_checkout/
//! ├── lib.rs            ◄─── You are here (exports)
//! ├── orchestrator.rs   ◄─── CheckoutOrchestrator (the saga)
//! ├── ports.rs          ◄─── Collaborator traits + their result types
//! ├── memory.rs         ◄─── In-memory collaborators (demo, tests)
//! ├── config.rs         ◄─── CheckoutConfig (TOML + env)
//! ├── error.rs          ◄─── CheckoutError, ProviderError, ErrorCode
//! └── bin/
//!     └── checkout_demo.rs
//! ```
//!
//! ## Saga Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   check stock ──► price ──► authorize ──► deduct ──► success            │
//! │        │                        │            │                          │
//! │        ▼                        ▼            ▼                          │
//! │  StockUnavailable       PaymentDeclined   cancel(transaction)           │
//! │                                              │                          │
//! │                                   ┌──────────┴──────────┐               │
//! │                                   ▼                     ▼               │
//! │                        StockDeductionFailed    CompensationFailed       │
//! │                                               (manual reconciliation)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use storefront_checkout::memory::{InMemoryDirectory, InMemoryPaymentGateway, InMemoryWarehouse};
//! use storefront_checkout::CheckoutOrchestrator;
//! use storefront_core::pricing::PricingCalculator;
//! use storefront_core::types::{CartId, CustomerId};
//!
//! # async fn run() {
//! let directory = Arc::new(InMemoryDirectory::new());
//! let orchestrator = CheckoutOrchestrator::new(
//!     directory.clone(),
//!     directory,
//!     Arc::new(InMemoryWarehouse::new()),
//!     Arc::new(InMemoryPaymentGateway::new()),
//!     PricingCalculator::default(),
//! );
//!
//! let outcome = orchestrator.checkout(CartId(1), CustomerId(1)).await;
//! println!("{}", outcome.message());
//! # }
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod orchestrator;
pub mod ports;

pub use config::{CheckoutConfig, ConfigError, ConfigResult, LoggingSettings};
pub use error::{CheckoutError, CheckoutResult, ErrorCode, ProviderError};
pub use orchestrator::CheckoutOrchestrator;
pub use ports::{
    CartLookup, CustomerLookup, PaymentAuthorization, PaymentProvider, ProviderResult,
    StockAvailability, StockDeduction, StockProvider,
};

use tracing::Subscriber;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront_checkout=trace` - Trace checkout only
/// - unset - use `settings.filter`
pub fn init_tracing(settings: &LoggingSettings) {
    subscriber(log_filter(settings)).init();
}

/// `RUST_LOG` when set and valid, otherwise the configured filter.
fn log_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter))
}

fn subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt().with_env_filter(filter).finish()
}
