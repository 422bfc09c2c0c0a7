//! # API Error Type
//!
//! What a caller of the `duka` binary sees when a command is rejected.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  JSON request ──► serde_json ──── bad shape ──────────┐                │
//! │                        │                              │                │
//! │                        ▼                              ▼                │
//! │                   duka-core ───── CoreError ──────► ApiError ──► stderr │
//! │                        │                              ▲        exit 1  │
//! │                        ▼                              │                │
//! │                   JSON response ─► stdout             │                │
//! │                                                       │                │
//! │  ledger.toml / DUKA_* ─────────── ConfigError ────────┘                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! ```json
//! {
//!   "code": "INSUFFICIENT_STOCK",
//!   "message": "Only 10 of nails-3in in stock, 12 requested"
//! }
//! ```

use serde::Serialize;

use duka_core::{CoreError, ValidationError};

use crate::config::ConfigError;

/// API error written by the binary when a command fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A line or product is not in the cart/sale
    NotFound,

    /// Field-level input failure
    ValidationError,

    /// Request JSON could not be parsed
    InvalidRequest,

    /// Cart limits
    CartError,

    /// Not enough stock for the requested quantity
    InsufficientStock,

    /// Product has no stock at all
    OutOfStock,

    /// Tender amount or reference is wrong
    PaymentError,

    /// Customer details missing or malformed
    CustomerError,

    /// Return exceeds what was sold
    ReturnError,

    /// ledger.toml or DUKA_* overrides are wrong
    ConfigError,

    /// I/O or serialization failure
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts ledger rejections to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Only {} of {} in stock, {} requested",
                    available, product_id, requested
                ),
            ),
            CoreError::OutOfStock { product_id } => ApiError::new(
                ErrorCode::OutOfStock,
                format!("{} is out of stock", product_id),
            ),
            CoreError::ExcessiveReturnQuantity {
                product_id,
                sold,
                requested,
            } => ApiError::new(
                ErrorCode::ReturnError,
                format!(
                    "Cannot return {} of {}: only {} sold",
                    requested, product_id, sold
                ),
            ),
            CoreError::LineNotFound { product_id } => ApiError::not_found("Line", &product_id),
            CoreError::CartTooLarge { max } => ApiError::new(
                ErrorCode::CartError,
                format!("Cart cannot have more than {} lines", max),
            ),
            CoreError::EmptyCart => ApiError::new(ErrorCode::CartError, "Cart is empty"),
            CoreError::QuantityTooLarge { requested, max } => ApiError::validation(format!(
                "Quantity {} exceeds maximum allowed ({})",
                requested, max
            )),
            err @ (CoreError::InvalidPaymentAmount { .. }
            | CoreError::MissingPaymentReference { .. }) => {
                ApiError::new(ErrorCode::PaymentError, err.to_string())
            }
            err @ (CoreError::MissingCustomerInfo { .. } | CoreError::InvalidPhoneFormat { .. }) => {
                ApiError::new(ErrorCode::CustomerError, err.to_string())
            }
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

/// Malformed request JSON.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::new(ErrorCode::InvalidRequest, format!("Invalid request: {}", err))
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        // Log the actual error but return a generic message
        tracing::error!("I/O failure: {}", err);
        ApiError::internal(format!("Failed to read request: {}", err.kind()))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for command functions.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================
