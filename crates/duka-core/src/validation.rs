//! # Validation Module
//!
//! Field-level input checks run before any ledger rule.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Back-office forms                                            │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Ledger calculator                                            │
//! │  ├── THIS MODULE: field checks                                         │
//! │  └── Stock, discount and payment rules (cart, checkout, edit, returns) │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: REST backend                                                 │
//! │  └── Persistence constraints, atomic stock updates                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use duka_core::validation::{validate_phone, validate_quantity};
//!
//! assert!(validate_phone("0712345678").is_ok());
//! assert!(validate_quantity(5).is_ok());
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product id the item API issues.
const MAX_PRODUCT_ID_LEN: usize = 64;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an opaque product id: non-empty after trimming, at most 64
/// characters.
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "product_id".to_string(),
        });
    }

    if id.len() > MAX_PRODUCT_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "product_id".to_string(),
            max: MAX_PRODUCT_ID_LEN,
        });
    }

    Ok(())
}

/// Returns the trimmed value when it is present and non-blank.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Validates a Kenyan mobile number.
///
/// ## Rules
/// - Exactly 10 ASCII digits after trimming
/// - Starts with `07` or `01`
///
/// ## Example
/// ```rust
/// use duka_core::validation::validate_phone;
///
/// assert!(validate_phone("0712345678").is_ok());
/// assert!(validate_phone("0112345678").is_ok());
/// assert!(validate_phone("+254712345678").is_err());
/// assert!(validate_phone("0812345678").is_err());
/// ```
pub fn validate_phone(phone: &str) -> CoreResult<()> {
    let digits = phone.trim();

    let well_formed = digits.len() == 10
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits.starts_with("07") || digits.starts_with("01"));

    if !well_formed {
        return Err(CoreError::InvalidPhoneFormat {
            phone: phone.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed `MAX_LINE_QUANTITY`
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    validate_quantity_within(qty, MAX_LINE_QUANTITY)
}

/// Same as [`validate_quantity`] against a caller-supplied ceiling.
pub fn validate_quantity_within(qty: i64, max: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > max {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max,
        });
    }

    Ok(())
}

/// Validates a cart-line quantity against the store's ceiling.
///
/// Over the ceiling is `QuantityTooLarge`; zero or negative is a
/// `MustBePositive` validation error.
pub fn validate_line_quantity(qty: i64, max: i64) -> CoreResult<()> {
    if qty > max {
        return Err(CoreError::QuantityTooLarge { requested: qty, max });
    }

    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into());
    }

    Ok(())
}

/// Validates a single payment event: strictly positive.
pub fn validate_payment_amount(amount: Money) -> CoreResult<()> {
    if !amount.is_positive() {
        return Err(CoreError::InvalidPaymentAmount {
            amount,
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(())
}

/// Validates an accumulated paid amount: zero is allowed, negative is not.
pub fn validate_paid_amount(amount: Money) -> CoreResult<()> {
    if amount.is_negative() {
        return Err(CoreError::InvalidPaymentAmount {
            amount,
            reason: "cannot be negative".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
