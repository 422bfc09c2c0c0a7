//! # Cart Commands
//!
//! Building a cart before tender.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│  Tender  │────►│   Sale   │       │
//! │  │  Cart    │     │          │     │          │     │          │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add-line          checkout                            │
//! │                   discount          (sale.rs)                           │
//! │                   totals                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The caller owns the cart: each command takes the current cart and returns
//! the new one. A rejected command returns an error and no cart.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use duka_core::{Cart, CartTotals, LineItem, Money, ProductSnapshot};

use crate::config::LedgerConfig;
use crate::error::ApiResult;

/// Cart response including items and totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<LineItem>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items.clone(),
            totals: CartTotals::from(cart),
        }
    }
}

// =============================================================================
// add-line
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLineRequest {
    #[serde(default)]
    pub cart: Cart,
    /// Freshly read from the item API.
    pub product: ProductSnapshot,
    /// New absolute quantity for the line, not an increment.
    pub quantity: i64,
}

/// Adds a product to the cart or sets its quantity.
///
/// ## User Workflow
/// ```text
/// Cashier scans "nails-3in" (stock 10)
///      │
///      ├── not in cart ──► new line, qty 1, price frozen
///      │
///      └── in cart ──────► qty set, price and discount kept
///                               │
///                               └── qty > stock ──► INSUFFICIENT_STOCK
/// ```
pub fn add_line(request: AddLineRequest, config: &LedgerConfig) -> ApiResult<CartResponse> {
    debug!(
        product_id = %request.product.id,
        quantity = request.quantity,
        "add_line command"
    );

    let mut cart = request.cart;
    cart.set_limits(config.cart_limits());

    cart.add_or_update_line(&request.product, request.quantity)
        .inspect_err(|err| warn!(product_id = %request.product.id, %err, "Line rejected"))?;

    let response = CartResponse::from(&cart);
    info!(
        product_id = %request.product.id,
        lines = response.totals.item_count,
        total = %response.totals.total,
        "Cart line set"
    );

    Ok(response)
}

// =============================================================================
// discount
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountRequest {
    pub cart: Cart,
    pub product_id: String,
    #[serde(deserialize_with = "crate::amount::deserialize")]
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountResponse {
    /// The discount actually stored after clamping.
    pub applied: Money,
    #[serde(flatten)]
    pub cart: CartResponse,
}

/// Sets a line's discount, clamped to its margin.
pub fn discount(request: DiscountRequest, config: &LedgerConfig) -> ApiResult<DiscountResponse> {
    debug!(product_id = %request.product_id, amount = %request.amount, "discount command");

    let mut cart = request.cart;
    cart.set_limits(config.cart_limits());

    let applied = cart
        .apply_discount(&request.product_id, request.amount)
        .inspect_err(|err| warn!(product_id = %request.product_id, %err, "Discount rejected"))?;

    if applied != request.amount {
        info!(
            product_id = %request.product_id,
            requested = %request.amount,
            %applied,
            "Discount clamped to margin"
        );
    }

    Ok(DiscountResponse {
        applied,
        cart: CartResponse::from(&cart),
    })
}

// =============================================================================
// totals
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsRequest {
    #[serde(default)]
    pub cart: Cart,
}

pub fn totals(request: TotalsRequest) -> CartTotals {
    debug!(lines = request.cart.item_count(), "totals command");
    CartTotals::from(&request.cart)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    fn add(body: serde_json::Value, config: &LedgerConfig) -> ApiResult<CartResponse> {
        add_line(serde_json::from_value(body).unwrap(), config)
    }

    fn cement(stock: i64) -> serde_json::Value {
        json!({
            "id": "cement-50kg",
            "name": "Cement 50kg",
            "sellingPrice": 50000,
            "buyingPrice": 30000,
            "stockQuantity": stock
        })
    }

    #[test]
    fn test_add_line_from_json() {
        let response = add(
            json!({ "product": cement(40), "quantity": 3 }),
            &LedgerConfig::default(),
        )
        .unwrap();

        assert_eq!(response.items.len(), 1);
        assert_eq!(response.totals.total, Money::from_shillings(1500));
        assert_eq!(response.totals.profit, Money::from_shillings(600));
    }

    #[test]
    fn test_add_line_over_stock() {
        let err = add(
            json!({ "product": cement(2), "quantity": 3 }),
            &LedgerConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
    }

    #[test]
    fn test_store_quantity_ceiling_applies() {
        let mut config = LedgerConfig::default();
        config.cart.max_quantity = 5;

        let err = add(json!({ "product": cement(40), "quantity": 6 }), &config).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_discount_reports_clamp() {
        let cart = add(
            json!({ "product": cement(40), "quantity": 2 }),
            &LedgerConfig::default(),
        )
        .unwrap();

        let request: DiscountRequest = serde_json::from_value(json!({
            "cart": { "items": cart.items },
            "productId": "cement-50kg",
            "amount": "1,000.00"
        }))
        .unwrap();
        let response = discount(request, &LedgerConfig::default()).unwrap();

        // Margin is (500 - 300) x 2.
        assert_eq!(response.applied, Money::from_shillings(400));
        assert_eq!(response.cart.totals.total, Money::from_shillings(600));
        assert_eq!(response.cart.totals.profit, Money::zero());
    }

    #[test]
    fn test_discount_unknown_line() {
        let request: DiscountRequest = serde_json::from_value(json!({
            "cart": { "items": [] },
            "productId": "paint",
            "amount": 100
        }))
        .unwrap();
        let err = discount(request, &LedgerConfig::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_totals_of_empty_cart() {
        let totals = totals(serde_json::from_value(json!({})).unwrap());
        assert_eq!(totals.item_count, 0);
        assert_eq!(totals.total, Money::zero());
    }
}
