//! # Sale Commands
//!
//! Tender, payment status and follow-up payments.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cart + tender                                                          │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  validate_checkout ── rejected ──► PAYMENT_ERROR / CUSTOMER_ERROR      │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  Sale { id, items, paid } + stock adjustments (−qty per line)          │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  caller: POST /sales, PATCH each item's stock, clear the cart          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use duka_core::{
    apply_payment, checkout as checkout_cart, classify_payment, Cart, CheckoutPayment, Money,
    PaymentMethod, PaymentStatus, Sale, SaleSummary, StockAdjustment,
};

use crate::config::LedgerConfig;
use crate::error::ApiResult;

/// A sale with its derived figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub sale: Sale,
    pub summary: SaleSummary,
}

impl From<Sale> for SaleResponse {
    fn from(sale: Sale) -> Self {
        SaleResponse {
            summary: sale.summary(),
            sale,
        }
    }
}

// =============================================================================
// classify
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    #[serde(deserialize_with = "crate::amount::deserialize")]
    pub total: Money,
    #[serde(deserialize_with = "crate::amount::deserialize")]
    pub paid: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyResponse {
    pub status: PaymentStatus,
    pub balance: Money,
}

pub fn classify(request: ClassifyRequest) -> ClassifyResponse {
    debug!(total = %request.total, paid = %request.paid, "classify command");
    ClassifyResponse {
        status: classify_payment(request.total, request.paid),
        balance: request.total - request.paid,
    }
}

// =============================================================================
// checkout
// =============================================================================

/// Tender as typed into the modal; the amount may be cents or display text.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderInput {
    pub method: PaymentMethod,
    #[serde(deserialize_with = "crate::amount::deserialize")]
    pub amount: Money,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
}

impl From<TenderInput> for CheckoutPayment {
    fn from(input: TenderInput) -> Self {
        CheckoutPayment {
            method: input.method,
            amount: input.amount,
            reference: input.reference,
            customer_name: input.customer_name,
            customer_phone: input.customer_phone,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub cart: Cart,
    pub payment: TenderInput,
    /// Generated when absent or blank.
    #[serde(default)]
    pub sale_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub sale: Sale,
    pub summary: SaleSummary,
    pub stock_adjustments: Vec<StockAdjustment>,
    pub store_name: String,
    pub processed_at: DateTime<Utc>,
}

/// Turns a cart and tender into a sale.
///
/// ## Returns
/// The new sale and one `-qty` stock adjustment per line. Nothing is
/// persisted; the caller writes the sale and adjustments to the backend.
pub fn checkout(request: CheckoutRequest, config: &LedgerConfig) -> ApiResult<CheckoutResponse> {
    debug!(
        lines = request.cart.item_count(),
        method = %request.payment.method,
        amount = %request.payment.amount,
        "checkout command"
    );

    let sale_id = request
        .sale_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut cart = request.cart;
    cart.set_limits(config.cart_limits());
    let payment = CheckoutPayment::from(request.payment);

    let outcome = checkout_cart(&cart, &payment, sale_id)
        .inspect_err(|err| warn!(%err, "Checkout rejected"))?;

    let summary = outcome.sale.summary();
    info!(
        sale_id = %summary.sale_id,
        total = %summary.total,
        paid = %summary.paid,
        status = %summary.status,
        "Sale checked out"
    );

    Ok(CheckoutResponse {
        stock_adjustments: outcome.stock_deltas.to_adjustments(),
        sale: outcome.sale,
        summary,
        store_name: config.store.name.clone(),
        processed_at: Utc::now(),
    })
}

// =============================================================================
// pay
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayRequest {
    pub sale: Sale,
    #[serde(deserialize_with = "crate::amount::deserialize")]
    pub amount: Money,
}

/// Records a further payment against a sale (credit top-up, rental payment).
pub fn pay(request: PayRequest) -> ApiResult<SaleResponse> {
    debug!(sale_id = %request.sale.id, amount = %request.amount, "pay command");

    let sale = apply_payment(&request.sale, request.amount)
        .inspect_err(|err| warn!(sale_id = %request.sale.id, %err, "Payment rejected"))?;

    let response = SaleResponse::from(sale);
    info!(
        sale_id = %response.summary.sale_id,
        balance = %response.summary.balance,
        status = %response.summary.status,
        "Payment recorded"
    );

    Ok(response)
}

// =============================================================================
// Unit Tests
// =============================================================================
