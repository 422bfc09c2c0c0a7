//! # Checkout
//!
//! Tender validation and conversion of a cart into a processed sale.
//!
//! ## Rule Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Cart has lines                       → EmptyCart                    │
//! │  2. Lines well-formed (see below)        → CartTooLarge / Validation    │
//! │                                            / QuantityTooLarge           │
//! │  3. Paid amount not negative             → InvalidPaymentAmount         │
//! │  4. M-Pesa has a reference               → MissingPaymentReference      │
//! │  5. Bank has a reference                 → MissingPaymentReference      │
//! │  6. Balance due? customer name present   → MissingCustomerInfo          │
//! │  7. Balance due? customer phone present  → MissingCustomerInfo          │
//! │  8. Balance due? phone is 07/01 + 8      → InvalidPhoneFormat           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first failing rule is returned. The tender modal re-validates after
//! each correction, so each rule stands on its own.
//!
//! A cart that arrives over the wire never went through
//! `add_or_update_line`, so rule 2 re-checks what the cart operations
//! guarantee: at most `max_lines` lines, one line per product, quantities in
//! `1..=max_quantity`, no negative prices, and each discount within
//! `0..=max_discount`. A bad line is rejected, not repaired.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::ledger::Sale;
use crate::money::Money;
use crate::stock::StockDeltas;
use crate::types::PaymentMethod;
use crate::validation::{
    non_blank, validate_line_quantity, validate_paid_amount, validate_phone, validate_product_id,
};

/// What the cashier entered in the tender modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutPayment {
    pub method: PaymentMethod,
    /// Amount handed over now; may be less than the total (credit sale).
    pub amount: Money,
    /// M-Pesa transaction code or bank slip reference.
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
}

impl CheckoutPayment {
    /// Cash tender with no customer details.
    pub fn cash(amount: Money) -> Self {
        CheckoutPayment {
            method: PaymentMethod::Cash,
            amount,
            reference: None,
            customer_name: None,
            customer_phone: None,
        }
    }
}

/// Checks a tender against the cart.
pub fn validate_checkout(cart: &Cart, payment: &CheckoutPayment) -> CoreResult<()> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    validate_lines(cart)?;
    validate_paid_amount(payment.amount)?;

    if payment.method.requires_reference() && non_blank(payment.reference.as_deref()).is_none() {
        return Err(CoreError::MissingPaymentReference {
            method: payment.method,
        });
    }

    let balance = cart.totals().total - payment.amount;
    if balance.is_positive() {
        if non_blank(payment.customer_name.as_deref()).is_none() {
            return Err(CoreError::MissingCustomerInfo {
                field: "name".to_string(),
            });
        }

        let phone = non_blank(payment.customer_phone.as_deref()).ok_or_else(|| {
            CoreError::MissingCustomerInfo {
                field: "phone".to_string(),
            }
        })?;
        validate_phone(phone)?;
    }

    Ok(())
}

/// Re-checks the cart invariants line by line.
fn validate_lines(cart: &Cart) -> CoreResult<()> {
    let limits = cart.limits();
    if cart.item_count() > limits.max_lines {
        return Err(CoreError::CartTooLarge {
            max: limits.max_lines,
        });
    }

    let mut seen = BTreeSet::new();
    for item in &cart.items {
        validate_product_id(&item.product_id)?;
        if !seen.insert(item.product_id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "product_id".to_string(),
                value: item.product_id.clone(),
            }
            .into());
        }

        validate_line_quantity(item.quantity, limits.max_quantity)?;

        if item.unit_price.is_negative() || item.buying_price.is_negative() {
            return Err(ValidationError::InvalidFormat {
                field: format!("price of {}", item.product_id),
                reason: "cannot be negative".to_string(),
            }
            .into());
        }

        let max_discount = item.max_discount();
        if item.discount.is_negative() || item.discount > max_discount {
            return Err(ValidationError::OutOfRange {
                field: format!("discount on {}", item.product_id),
                min: 0,
                max: max_discount.cents(),
            }
            .into());
        }
    }

    Ok(())
}

/// A validated checkout, ready for `POST /sales`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutOutcome {
    pub sale: Sale,
    /// One negative delta per line: the stock this sale consumes.
    pub stock_deltas: StockDeltas,
}

/// Validates the tender and turns the cart into a sale.
///
/// The cart is left untouched; clearing it after the backend accepts the
/// sale is the caller's job.
pub fn checkout(
    cart: &Cart,
    payment: &CheckoutPayment,
    sale_id: impl Into<String>,
) -> CoreResult<CheckoutOutcome> {
    validate_checkout(cart, payment)?;

    let mut stock_deltas = StockDeltas::new();
    for item in &cart.items {
        stock_deltas.add(&item.product_id, -item.quantity);
    }

    Ok(CheckoutOutcome {
        sale: Sale::new(sale_id, cart.items.clone(), payment.amount),
        stock_deltas,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
