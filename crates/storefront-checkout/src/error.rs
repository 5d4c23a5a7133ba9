//! # Checkout Error Types
//!
//! Error types for the checkout workflow and its collaborators.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout Error Categories                          │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Resolution    │  │   Rejection     │  │     Saga                │ │
//! │  │  (steps 1-2)    │  │  (steps 3, 5)   │  │    (step 6)             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │ CustomerNotFound│  │ StockUnavailable│  │ StockDeductionFailed    │ │
//! │  │ CartNotFound    │  │ PaymentDeclined │  │ CompensationFailed      │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Nothing to undo          Nothing to undo     Payment cancelled, or    │
//! │                                                cancel failed and the   │
//! │                                                charge needs manual     │
//! │                                                reconciliation          │
//! │                                                                         │
//! │  UnexpectedError: anything unclassified (lookup outage, etc.)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `ProviderError` is what a collaborator reports. The orchestrator never
//! returns it directly; it is wrapped into the failure kind of the step it
//! happened in.

use serde::Serialize;
use storefront_core::types::{CartId, CustomerId, ProductId, TransactionId};
use thiserror::Error;

/// Message shown to callers when the cause must not leak.
pub const GENERIC_FAILURE_MESSAGE: &str = "Error processing purchase.";

/// Result type alias for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

// =============================================================================
// Provider Error
// =============================================================================

/// Failure reported by an external collaborator (lookup, stock or payment).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The collaborator did not answer in time.
    #[error("{service} timed out")]
    Timeout { service: String },

    /// The collaborator could not be reached or is not serving requests.
    #[error("{service} unavailable: {reason}")]
    Unavailable { service: String, reason: String },

    /// The collaborator answered and refused the request.
    #[error("{service} rejected the request: {reason}")]
    Rejected { service: String, reason: String },
}

impl ProviderError {
    pub fn timeout(service: impl Into<String>) -> Self {
        ProviderError::Timeout {
            service: service.into(),
        }
    }

    pub fn unavailable(service: impl Into<String>, reason: impl Into<String>) -> Self {
        ProviderError::Unavailable {
            service: service.into(),
            reason: reason.into(),
        }
    }

    pub fn rejected(service: impl Into<String>, reason: impl Into<String>) -> Self {
        ProviderError::Rejected {
            service: service.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Checkout Error
// =============================================================================

/// Every way a checkout attempt can fail.
///
/// ## Design Principles
/// - One variant per failure kind, never a bare string (except
///   `UnexpectedError`)
/// - Collaborator failures are kept as `#[source]` for diagnostics
/// - `CompensationFailed` is never folded into another variant: it means a
///   payment is authorized and was not cancelled
#[derive(Debug, Error)]
pub enum CheckoutError {
    // =========================================================================
    // Resolution Errors
    // =========================================================================
    /// No customer with this id.
    #[error("Customer not found: {customer_id}")]
    CustomerNotFound { customer_id: CustomerId },

    /// No cart with this id belongs to this customer.
    #[error("Cart {cart_id} not found for customer {customer_id}")]
    CartNotFound {
        cart_id: CartId,
        customer_id: CustomerId,
    },

    // =========================================================================
    // Rejections (nothing to undo)
    // =========================================================================
    /// The stock check failed or reported missing items.
    #[error("Items out of stock ({})", stock_detail(.product_ids, .cause.as_ref()))]
    StockUnavailable {
        product_ids: Vec<ProductId>,
        #[source]
        cause: Option<ProviderError>,
    },

    /// The payment processor did not authorize the charge.
    #[error("Payment not authorized{}", cause_suffix(.cause.as_ref()))]
    PaymentDeclined {
        #[source]
        cause: Option<ProviderError>,
    },

    // =========================================================================
    // Saga Errors (payment was authorized)
    // =========================================================================
    /// Stock deduction failed after authorization; the payment was cancelled.
    #[error("Failed to deduct stock{}; payment {transaction_id} was cancelled", cause_suffix(.cause.as_ref()))]
    StockDeductionFailed {
        transaction_id: TransactionId,
        #[source]
        cause: Option<ProviderError>,
    },

    /// Stock deduction failed and cancelling the payment failed too.
    ///
    /// The charge stays authorized and needs manual reconciliation.
    #[error(
        "Failed to deduct stock{} and could not cancel payment {transaction_id}: {cancel_error}",
        cause_suffix(.deduction_cause.as_ref())
    )]
    CompensationFailed {
        transaction_id: TransactionId,
        deduction_cause: Option<ProviderError>,
        #[source]
        cancel_error: ProviderError,
    },

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Anything not classified above.
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

fn stock_detail(product_ids: &[ProductId], cause: Option<&ProviderError>) -> String {
    if !product_ids.is_empty() {
        let ids: Vec<String> = product_ids.iter().map(ToString::to_string).collect();
        return format!("products {}", ids.join(", "));
    }
    match cause {
        Some(cause) => cause.to_string(),
        None => "no product ids reported".to_string(),
    }
}

fn cause_suffix(cause: Option<&ProviderError>) -> String {
    cause.map(|c| format!(": {}", c)).unwrap_or_default()
}

impl CheckoutError {
    /// Machine-readable classification of this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            CheckoutError::CustomerNotFound { .. } | CheckoutError::CartNotFound { .. } => {
                ErrorCode::NotFound
            }
            CheckoutError::StockUnavailable { .. } | CheckoutError::StockDeductionFailed { .. } => {
                ErrorCode::Conflict
            }
            CheckoutError::PaymentDeclined { .. } => ErrorCode::PaymentDeclined,
            CheckoutError::CompensationFailed { .. } => ErrorCode::Reconciliation,
            CheckoutError::UnexpectedError(_) => ErrorCode::Internal,
        }
    }

    /// Message carried by the failed [`CheckoutOutcome`].
    ///
    /// Unexpected errors are reported generically; their detail only goes to
    /// the logs.
    ///
    /// [`CheckoutOutcome`]: storefront_core::types::CheckoutOutcome
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::UnexpectedError(_) => GENERIC_FAILURE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    /// Transaction id of a charge that was authorized during the attempt.
    pub fn transaction_id(&self) -> Option<&TransactionId> {
        match self {
            CheckoutError::StockDeductionFailed { transaction_id, .. }
            | CheckoutError::CompensationFailed { transaction_id, .. } => Some(transaction_id),
            _ => None,
        }
    }

    /// True if an authorized charge may still be outstanding.
    pub fn needs_reconciliation(&self) -> bool {
        matches!(self, CheckoutError::CompensationFailed { .. })
    }
}

// =============================================================================
// Error Codes
// =============================================================================

/// Error codes for outer surfaces (HTTP handlers, CLI exit codes).
///
/// ## Status Mapping
/// ```text
/// ┌──────────────────┬────────┬──────────────────────────────────────────┐
/// │ Code             │ Status │ Raised by                                │
/// ├──────────────────┼────────┼──────────────────────────────────────────┤
/// │ NOT_FOUND        │  404   │ CustomerNotFound, CartNotFound           │
/// │ CONFLICT         │  409   │ StockUnavailable, StockDeductionFailed   │
/// │ PAYMENT_DECLINED │  400   │ PaymentDeclined                          │
/// │ RECONCILIATION   │  500   │ CompensationFailed                       │
/// │ INTERNAL         │  500   │ UnexpectedError                          │
/// └──────────────────┴────────┴──────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Customer or cart does not exist (404)
    NotFound,

    /// Stock conflict (409)
    Conflict,

    /// Payment not authorized (400)
    PaymentDeclined,

    /// Authorized charge left uncancelled (500)
    Reconciliation,

    /// Internal error (500)
    Internal,
}

impl ErrorCode {
    /// Suggested HTTP status for this code.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::NotFound => 404,
            ErrorCode::Conflict => 409,
            ErrorCode::PaymentDeclined => 400,
            ErrorCode::Reconciliation | ErrorCode::Internal => 500,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NotFound => write!(f, "NOT_FOUND"),
            ErrorCode::Conflict => write!(f, "CONFLICT"),
            ErrorCode::PaymentDeclined => write!(f, "PAYMENT_DECLINED"),
            ErrorCode::Reconciliation => write!(f, "RECONCILIATION"),
            ErrorCode::Internal => write!(f, "INTERNAL"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
