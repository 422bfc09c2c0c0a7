//! # Ledger
//!
//! Totals, payment status and the persisted `Sale`.
//!
//! Every derived figure is recomputed from the line items on each call.
//! Nothing is accumulated incrementally, so a sale that has been edited,
//! returned against and paid into several times still adds up exactly.
//!
//! ## Payment Status Partition
//! ```text
//!   paid:   0        (0, total)        total        (total, ∞)
//!           │            │               │               │
//!        PENDING      PARTIAL          PAID          OVERPAID
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{LineItem, PaymentStatus};
use crate::validation::validate_payment_amount;

// =============================================================================
// Totals
// =============================================================================

/// Sum of line totals and line profits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Totals {
    pub total: Money,
    pub profit: Money,
}

/// Re-sums totals and profit over `items`.
///
/// ## Example
/// ```rust
/// use duka_core::{compute_totals, LineItem, Money};
///
/// let items = vec![LineItem {
///     product_id: "cement-50kg".into(),
///     name: "Cement 50kg".into(),
///     quantity: 3,
///     unit_price: Money::from_shillings(500),
///     buying_price: Money::from_shillings(300),
///     discount: Money::zero(),
/// }];
/// let totals = compute_totals(&items);
/// assert_eq!(totals.total, Money::from_shillings(1500));
/// assert_eq!(totals.profit, Money::from_shillings(600));
/// ```
pub fn compute_totals(items: &[LineItem]) -> Totals {
    Totals {
        total: items.iter().map(LineItem::line_total).sum(),
        profit: items.iter().map(LineItem::line_profit).sum(),
    }
}

/// Classifies a payment against a total.
///
/// `paid == 0` is checked first, so an empty zero-total sale is `Pending`.
pub fn classify_payment(total: Money, paid: Money) -> PaymentStatus {
    if paid.is_zero() {
        PaymentStatus::Pending
    } else if paid < total {
        PaymentStatus::Partial
    } else if paid == total {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Overpaid
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A processed sale.
///
/// Only the line items and the accumulated paid amount are stored; total,
/// profit, balance and status are methods so they cannot drift from the
/// lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub paid: Money,
}

impl Sale {
    pub fn new(id: impl Into<String>, items: Vec<LineItem>, paid: Money) -> Self {
        Sale {
            id: id.into(),
            items,
            paid,
        }
    }

    pub fn totals(&self) -> Totals {
        compute_totals(&self.items)
    }

    pub fn total(&self) -> Money {
        self.totals().total
    }

    pub fn profit(&self) -> Money {
        self.totals().profit
    }

    /// `total − paid`. Negative when the customer has overpaid.
    pub fn balance(&self) -> Money {
        self.total() - self.paid
    }

    pub fn status(&self) -> PaymentStatus {
        classify_payment(self.total(), self.paid)
    }

    /// Quantity of `product_id` across all lines.
    pub fn quantity_of(&self, product_id: &str) -> i64 {
        self.items
            .iter()
            .filter(|i| i.product_id == product_id)
            .map(|i| i.quantity)
            .sum()
    }

    pub fn summary(&self) -> SaleSummary {
        SaleSummary::from(self)
    }
}

/// Records a payment event against a sale.
///
/// The amount is added to what was already paid; repeated partial payments
/// accumulate.
///
/// ## User Workflow
/// ```text
/// total 1,000 paid 0      → PENDING
///   apply_payment(300)    → paid 300,   balance 700, PARTIAL
///   apply_payment(700)    → paid 1,000, balance 0,   PAID
/// ```
pub fn apply_payment(sale: &Sale, amount: Money) -> CoreResult<Sale> {
    validate_payment_amount(amount)?;

    let mut updated = sale.clone();
    updated.paid += amount;
    Ok(updated)
}

// =============================================================================
// Sale Summary
// =============================================================================

/// Derived figures for a sale, for API responses and receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleSummary {
    pub sale_id: String,
    pub item_count: usize,
    pub total_quantity: i64,
    pub total: Money,
    pub profit: Money,
    pub paid: Money,
    pub balance: Money,
    pub status: PaymentStatus,
}

impl From<&Sale> for SaleSummary {
    fn from(sale: &Sale) -> Self {
        let totals = sale.totals();
        SaleSummary {
            sale_id: sale.id.clone(),
            item_count: sale.items.len(),
            total_quantity: sale.items.iter().map(|i| i.quantity).sum(),
            total: totals.total,
            profit: totals.profit,
            paid: sale.paid,
            balance: totals.total - sale.paid,
            status: classify_payment(totals.total, sale.paid),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
