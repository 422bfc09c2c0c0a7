//! # Domain Types
//!
//! Core domain types shared by checkout, sale editing and returns.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ProductSnapshot │   │    LineItem     │   │ PaymentStatus   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  product_id     │   │  Pending        │       │
//! │  │  selling_price  │   │  unit_price     │   │  Partial        │       │
//! │  │  buying_price   │   │  buying_price   │   │  Paid           │       │
//! │  │  stock_quantity │   │  quantity       │   │  Overpaid       │       │
//! │  └─────────────────┘   │  discount       │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │ PaymentMethod   │   │ ReturnCondition │                              │
//! │  │  Cash           │   │  Good           │                              │
//! │  │  Mpesa          │   │  Damaged        │                              │
//! │  │  Bank           │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `LineItem` freezes the product's prices when it enters the cart. Later
//! price changes in the catalogue never reach an existing line or sale.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Snapshot
// =============================================================================

/// A product as freshly read from the item API.
///
/// `stock_quantity` is the persisted stock. Carts never decrement it; only a
/// persisted sale, edit or return moves it, through the stock deltas this
/// crate computes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductSnapshot {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Price per unit charged to the customer.
    pub selling_price: Money,
    /// Cost per unit.
    pub buying_price: Money,
    /// Persisted stock level.
    pub stock_quantity: i64,
}

impl ProductSnapshot {
    /// Stock a cart may draw on. Negative persisted stock counts as none.
    #[inline]
    pub fn available_stock(&self) -> i64 {
        self.stock_quantity.max(0)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product entry within a cart or sale.
///
/// `discount` is an absolute amount taken off the whole line, not a per-unit
/// amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    pub product_id: String,
    #[serde(default)]
    pub name: String,
    pub quantity: i64,
    /// Selling price per unit, frozen when the line was created.
    pub unit_price: Money,
    /// Cost per unit, frozen when the line was created.
    pub buying_price: Money,
    #[serde(default)]
    pub discount: Money,
}

impl LineItem {
    /// Creates a line for `quantity` units of `product` with no discount.
    pub fn from_product(product: &ProductSnapshot, quantity: i64) -> Self {
        LineItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            quantity,
            unit_price: product.selling_price,
            buying_price: product.buying_price,
            discount: Money::zero(),
        }
    }

    /// `unit_price × quantity`, before discount.
    #[inline]
    pub fn gross_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// `unit_price × quantity − discount`.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.gross_total() - self.discount
    }

    /// `(unit_price − buying_price) × quantity`.
    #[inline]
    pub fn gross_margin(&self) -> Money {
        (self.unit_price - self.buying_price).multiply_quantity(self.quantity)
    }

    /// `(unit_price − buying_price) × quantity − discount`.
    #[inline]
    pub fn line_profit(&self) -> Money {
        self.gross_margin() - self.discount
    }

    /// Largest discount that keeps the line at or above cost.
    ///
    /// Zero when the line is already priced at or below cost.
    #[inline]
    pub fn max_discount(&self) -> Money {
        self.gross_margin().max(Money::zero())
    }

    /// Clamps `requested` into `[0, max_discount]`.
    #[inline]
    pub fn clamp_discount(&self, requested: Money) -> Money {
        requested.clamp_between(Money::zero(), self.max_discount())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash at the till.
    Cash,
    /// M-Pesa mobile money; needs the transaction reference.
    Mpesa,
    /// Bank transfer or deposit; needs the bank reference.
    Bank,
}

impl PaymentMethod {
    /// Whether the method needs a transaction reference before checkout.
    pub fn requires_reference(&self) -> bool {
        matches!(self, PaymentMethod::Mpesa | PaymentMethod::Bank)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "Cash"),
            PaymentMethod::Mpesa => write!(f, "M-Pesa"),
            PaymentMethod::Bank => write!(f, "Bank"),
        }
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// How much of a sale has been paid.
///
/// Always derived from `(total, paid)`; never stored on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Nothing paid yet.
    Pending,
    /// Something paid, balance still due.
    Partial,
    /// Paid to the cent.
    Paid,
    /// Paid more than the total; a refund is owed.
    Overpaid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "PENDING"),
            PaymentStatus::Partial => write!(f, "PARTIAL"),
            PaymentStatus::Paid => write!(f, "PAID"),
            PaymentStatus::Overpaid => write!(f, "OVERPAID"),
        }
    }
}

// =============================================================================
// Return Condition
// =============================================================================

/// State of goods coming back from a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnCondition {
    /// Resellable; goes back on the shelf.
    Good,
    /// Written off rather than restocked.
    Damaged,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i64, unit: i64, buying: i64, discount: i64) -> LineItem {
        LineItem {
            product_id: "cement-50kg".to_string(),
            name: "Cement 50kg".to_string(),
            quantity,
            unit_price: Money::from_shillings(unit),
            buying_price: Money::from_shillings(buying),
            discount: Money::from_shillings(discount),
        }
    }

    #[test]
    fn test_line_derivations() {
        let item = line(3, 500, 300, 0);
        assert_eq!(item.line_total(), Money::from_shillings(1500));
        assert_eq!(item.line_profit(), Money::from_shillings(600));

        let discounted = line(3, 500, 300, 100);
        assert_eq!(discounted.line_total(), Money::from_shillings(1400));
        assert_eq!(discounted.line_profit(), Money::from_shillings(500));
    }

    #[test]
    fn test_max_discount_is_line_margin() {
        assert_eq!(line(2, 100, 90, 0).max_discount(), Money::from_shillings(20));
        // Priced below cost: nothing to give away.
        assert_eq!(line(2, 80, 90, 0).max_discount(), Money::zero());
    }

    #[test]
    fn test_from_product_freezes_prices() {
        let product = ProductSnapshot {
            id: "pvc-pipe".to_string(),
            name: "PVC Pipe 1in".to_string(),
            selling_price: Money::from_shillings(450),
            buying_price: Money::from_shillings(380),
            stock_quantity: 12,
        };
        let item = LineItem::from_product(&product, 4);
        assert_eq!(item.unit_price, product.selling_price);
        assert_eq!(item.buying_price, product.buying_price);
        assert_eq!(item.discount, Money::zero());
        assert_eq!(item.quantity, 4);
    }

    #[test]
    fn test_available_stock_never_negative() {
        let product = ProductSnapshot {
            id: "x".to_string(),
            name: String::new(),
            selling_price: Money::zero(),
            buying_price: Money::zero(),
            stock_quantity: -3,
        };
        assert_eq!(product.available_stock(), 0);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Overpaid).unwrap(),
            "\"OVERPAID\""
        );
        assert_eq!(
            serde_json::to_string(&ReturnCondition::Damaged).unwrap(),
            "\"DAMAGED\""
        );
        assert_eq!(serde_json::to_string(&PaymentMethod::Mpesa).unwrap(), "\"mpesa\"");

        let json = serde_json::to_value(line(1, 10, 5, 0)).unwrap();
        assert!(json.get("productId").is_some());
        assert!(json.get("unitPrice").is_some());
    }

    #[test]
    fn test_reference_requirements() {
        assert!(!PaymentMethod::Cash.requires_reference());
        assert!(PaymentMethod::Mpesa.requires_reference());
        assert!(PaymentMethod::Bank.requires_reference());
    }
}
