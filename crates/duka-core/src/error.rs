//! # Error Types
//!
//! Domain-specific error types for duka-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  duka-core errors (this file)                                          │
//! │  ├── CoreError        - Ledger rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  duka-cli errors (app)                                                 │
//! │  └── ApiError         - What the caller sees ({ code, message })       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → toast / alert          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is a recoverable, user-facing rejection. An operation that
//! returns one of these has not mutated its inputs.

use thiserror::Error;

use crate::money::Money;
use crate::types::PaymentMethod;

// =============================================================================
// Core Error
// =============================================================================

/// Ledger rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Requested quantity exceeds what is available.
    ///
    /// ## User Workflow
    /// ```text
    /// Set quantity (qty: 12)
    ///      │
    ///      ▼
    /// Check stock: available=10
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: "nails-3in", available: 10, requested: 12 }
    ///      │
    ///      ▼
    /// UI shows: "Only 10 in stock"
    /// ```
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// Product has no stock at all and cannot be added to a cart.
    #[error("{product_id} is out of stock")]
    OutOfStock { product_id: String },

    /// A return asks for more units than the sale line sold.
    #[error("Cannot return {requested} of {product_id}: only {sold} sold")]
    ExcessiveReturnQuantity {
        product_id: String,
        sold: i64,
        requested: i64,
    },

    /// Payment amount is zero, negative, or otherwise unusable.
    #[error("Invalid payment amount {amount}: {reason}")]
    InvalidPaymentAmount { amount: Money, reason: String },

    /// Customer details are required when the sale is not fully paid.
    #[error("Customer {field} is required when a balance is due")]
    MissingCustomerInfo { field: String },

    /// Phone number is not a 10-digit Kenyan mobile number.
    #[error("Invalid phone number '{phone}': expected 10 digits starting with 07 or 01")]
    InvalidPhoneFormat { phone: String },

    /// M-Pesa and bank payments need a transaction reference.
    #[error("{method} payment requires a reference")]
    MissingPaymentReference { method: PaymentMethod },

    /// The product has no line in the cart or sale.
    #[error("No line for product {product_id}")]
    LineNotFound { product_id: String },

    /// Checkout was attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart has reached its distinct-product limit.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds the per-line limit.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised for malformed input before any ledger rule runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (unparseable amount, malformed id).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The same product appears twice where lines must be unique.
    #[error("{field} '{value}' appears more than once")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
