//! # Cart
//!
//! The checkout cart: adding products, changing quantities and discounting
//! lines.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cashier Action           Operation                 Cart Change         │
//! │  ──────────────           ─────────                 ───────────         │
//! │                                                                         │
//! │  Pick product ──────────► add_or_update_line() ───► push / set qty     │
//! │  Change quantity ───────► add_or_update_line() ───► set qty            │
//! │  Type a discount ───────► apply_discount() ───────► clamp to margin    │
//! │  Click remove ──────────► remove_line() ──────────► retain             │
//! │                                                                         │
//! │  Stock is NOT decremented here. The persisted stock only moves when    │
//! │  the sale is checked out (see checkout.rs).                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation validates first and mutates last; a rejected call leaves
//! the cart exactly as it was.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::ledger::{compute_totals, Totals};
use crate::money::Money;
use crate::types::{LineItem, ProductSnapshot};
use crate::validation::{validate_line_quantity, validate_product_id};
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Limits
// =============================================================================

/// Per-store cart ceilings, never above the crate-wide hard limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLimits {
    pub max_lines: usize,
    pub max_quantity: i64,
}

impl CartLimits {
    /// Builds limits, capping each value at the hard limit.
    pub fn new(max_lines: usize, max_quantity: i64) -> Self {
        CartLimits {
            max_lines: max_lines.min(MAX_CART_LINES),
            max_quantity: max_quantity.min(MAX_LINE_QUANTITY),
        }
    }
}

impl Default for CartLimits {
    fn default() -> Self {
        CartLimits {
            max_lines: MAX_CART_LINES,
            max_quantity: MAX_LINE_QUANTITY,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Line items awaiting checkout.
///
/// ## Invariants
/// - Lines are unique by `product_id`
/// - Every quantity is in `1..=limits.max_quantity`
/// - At most `limits.max_lines` lines
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<LineItem>,

    #[serde(skip)]
    limits: CartLimits,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Empty cart enforcing `limits`.
    pub fn with_limits(limits: CartLimits) -> Self {
        Cart {
            items: Vec::new(),
            limits,
        }
    }

    /// Replaces the limits, e.g. after deserializing a cart from a request.
    pub fn set_limits(&mut self, limits: CartLimits) {
        self.limits = limits;
    }

    pub fn limits(&self) -> CartLimits {
        self.limits
    }

    /// Sets the cart quantity of `product` to `requested_quantity`.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity replaced, its discount re-applied
    ///   verbatim, its frozen prices kept
    /// - Product not in cart: appended with no discount
    ///
    /// Available stock is the product's persisted stock; the cart itself
    /// holds nothing back.
    ///
    /// ## Errors
    /// - `OutOfStock` when a fresh product has no stock
    /// - `InsufficientStock` when `requested_quantity` exceeds stock
    /// - `CartTooLarge` / `QuantityTooLarge` past the cart limits
    /// - `Validation` for a blank id or non-positive quantity
    pub fn add_or_update_line(
        &mut self,
        product: &ProductSnapshot,
        requested_quantity: i64,
    ) -> CoreResult<&LineItem> {
        validate_product_id(&product.id)?;
        validate_line_quantity(requested_quantity, self.limits.max_quantity)?;

        let available = product.available_stock();
        let position = self.position(&product.id);

        if position.is_none() && available == 0 {
            return Err(CoreError::OutOfStock {
                product_id: product.id.clone(),
            });
        }

        if requested_quantity > available {
            return Err(CoreError::InsufficientStock {
                product_id: product.id.clone(),
                available,
                requested: requested_quantity,
            });
        }

        let index = match position {
            Some(index) => {
                self.items[index].quantity = requested_quantity;
                index
            }
            None => {
                if self.items.len() >= self.limits.max_lines {
                    return Err(CoreError::CartTooLarge {
                        max: self.limits.max_lines,
                    });
                }
                self.items
                    .push(LineItem::from_product(product, requested_quantity));
                self.items.len() - 1
            }
        };

        Ok(&self.items[index])
    }

    /// Discounts the line for `product_id`.
    ///
    /// The request is clamped into `[0, (unit_price − buying_price) × qty]`
    /// without error, so a line can never be sold below cost. Returns the
    /// discount actually applied.
    ///
    /// ## Example
    /// ```text
    /// qty 2 × 100, cost 90  → margin 20
    /// apply_discount(50)    → applied 20, line total 180
    /// ```
    pub fn apply_discount(&mut self, product_id: &str, requested: Money) -> CoreResult<Money> {
        let index = self
            .position(product_id)
            .ok_or_else(|| CoreError::LineNotFound {
                product_id: product_id.to_string(),
            })?;

        let line = &mut self.items[index];
        let applied = line.clamp_discount(requested);
        line.discount = applied;
        Ok(applied)
    }

    /// Removes the line for `product_id`.
    pub fn remove_line(&mut self, product_id: &str) -> CoreResult<LineItem> {
        let index = self
            .position(product_id)
            .ok_or_else(|| CoreError::LineNotFound {
                product_id: product_id.to_string(),
            })?;
        Ok(self.items.remove(index))
    }

    pub fn line(&self, product_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn totals(&self) -> Totals {
        compute_totals(&self.items)
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.items.iter().position(|i| i.product_id == product_id)
    }
}

/// Cart totals summary for API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub total: Money,
    pub profit: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        let totals = cart.totals();
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total: totals.total,
            profit: totals.profit,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn product(id: &str, selling: i64, buying: i64, stock: i64) -> ProductSnapshot {
        ProductSnapshot {
            id: id.to_string(),
            name: format!("Product {}", id),
            selling_price: Money::from_shillings(selling),
            buying_price: Money::from_shillings(buying),
            stock_quantity: stock,
        }
    }

    #[test]
    fn test_add_new_line() {
        let mut cart = Cart::new();
        let cement = product("cement", 500, 300, 10);

        cart.add_or_update_line(&cement, 3).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.totals().total, Money::from_shillings(1500));
        assert_eq!(cart.line("cement").unwrap().discount, Money::zero());
    }

    #[test]
    fn test_update_replaces_quantity_and_keeps_discount() {
        let mut cart = Cart::new();
        let cement = product("cement", 500, 300, 10);

        cart.add_or_update_line(&cement, 3).unwrap();
        cart.apply_discount("cement", Money::from_shillings(100)).unwrap();
        cart.add_or_update_line(&cement, 5).unwrap();

        let line = cart.line("cement").unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(line.quantity, 5);
        assert_eq!(line.discount, Money::from_shillings(100));
        assert_eq!(line.line_total(), Money::from_shillings(2400));
    }

    #[test]
    fn test_update_keeps_frozen_price() {
        let mut cart = Cart::new();
        cart.add_or_update_line(&product("paint", 1200, 950, 10), 1).unwrap();

        let repriced = product("paint", 1500, 950, 10);
        cart.add_or_update_line(&repriced, 2).unwrap();

        assert_eq!(cart.line("paint").unwrap().unit_price, Money::from_shillings(1200));
    }

    #[test]
    fn test_out_of_stock_for_fresh_product() {
        let mut cart = Cart::new();
        let err = cart
            .add_or_update_line(&product("hinge", 80, 50, 0), 1)
            .unwrap_err();

        assert_eq!(
            err,
            CoreError::OutOfStock {
                product_id: "hinge".to_string()
            }
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_insufficient_stock_leaves_cart_untouched() {
        let mut cart = Cart::new();
        let nails = product("nails", 20, 12, 10);
        cart.add_or_update_line(&nails, 4).unwrap();
        let before = cart.clone();

        let err = cart.add_or_update_line(&nails, 11).unwrap_err();

        assert_eq!(
            err,
            CoreError::InsufficientStock {
                product_id: "nails".to_string(),
                available: 10,
                requested: 11,
            }
        );
        assert_eq!(cart, before);
    }

    #[test]
    fn test_existing_line_with_zero_stock_is_insufficient_not_out() {
        let mut cart = Cart::new();
        cart.add_or_update_line(&product("nails", 20, 12, 10), 4).unwrap();

        let err = cart
            .add_or_update_line(&product("nails", 20, 12, 0), 2)
            .unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { available: 0, .. }));
    }

    #[test]
    fn test_quantity_bounds() {
        let mut cart = Cart::new();
        let nails = product("nails", 20, 12, 10);

        assert!(matches!(
            cart.add_or_update_line(&nails, 0),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));

        let mut small = Cart::with_limits(CartLimits::new(1, 5));
        assert_eq!(
            small.add_or_update_line(&nails, 6).unwrap_err(),
            CoreError::QuantityTooLarge { requested: 6, max: 5 }
        );
    }

    #[test]
    fn test_cart_line_limit() {
        let mut cart = Cart::with_limits(CartLimits::new(1, 100));
        cart.add_or_update_line(&product("a", 10, 5, 5), 1).unwrap();

        let err = cart.add_or_update_line(&product("b", 10, 5, 5), 1).unwrap_err();
        assert_eq!(err, CoreError::CartTooLarge { max: 1 });
        // Updating an existing line is still fine at the limit.
        cart.add_or_update_line(&product("a", 10, 5, 5), 2).unwrap();
    }

    #[test]
    fn test_limits_capped_at_hard_limits() {
        let limits = CartLimits::new(usize::MAX, i64::MAX);
        assert_eq!(limits, CartLimits::default());
    }

    #[test]
    fn test_discount_clamped_to_margin() {
        let mut cart = Cart::new();
        cart.add_or_update_line(&product("bolt", 100, 90, 10), 2).unwrap();

        let applied = cart.apply_discount("bolt", Money::from_shillings(50)).unwrap();

        assert_eq!(applied, Money::from_shillings(20));
        assert_eq!(cart.line("bolt").unwrap().line_total(), Money::from_shillings(180));
    }

    #[test]
    fn test_discount_cap_holds_for_any_request() {
        let mut cart = Cart::new();
        cart.add_or_update_line(&product("bolt", 100, 90, 10), 2).unwrap();

        for requested in [-500, 0, 1, 19, 20, 21, 5_000] {
            cart.apply_discount("bolt", Money::from_shillings(requested)).unwrap();
            let line = cart.line("bolt").unwrap();
            assert!(line.discount >= Money::zero());
            assert!(line.discount <= line.max_discount());
            assert!(line.line_profit() >= Money::zero());
        }
    }

    #[test]
    fn test_discount_on_missing_line() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.apply_discount("ghost", Money::from_shillings(1)).unwrap_err(),
            CoreError::LineNotFound {
                product_id: "ghost".to_string()
            }
        );
    }

    #[test]
    fn test_remove_line() {
        let mut cart = Cart::new();
        cart.add_or_update_line(&product("a", 10, 5, 5), 1).unwrap();

        let removed = cart.remove_line("a").unwrap();
        assert_eq!(removed.product_id, "a");
        assert!(cart.is_empty());
        assert!(cart.remove_line("a").is_err());
    }

    #[test]
    fn test_cart_totals_projection() {
        let mut cart = Cart::new();
        cart.add_or_update_line(&product("cement", 500, 300, 10), 3).unwrap();
        cart.add_or_update_line(&product("nails", 20, 12, 100), 10).unwrap();

        let totals = CartTotals::from(&cart);
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 13);
        assert_eq!(totals.total, Money::from_shillings(1700));
        assert_eq!(totals.profit, Money::from_shillings(680));
    }
}
