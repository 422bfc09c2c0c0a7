//! # Sale Editing
//!
//! Re-pricing a persisted sale and working out what its edit does to stock.
//!
//! ## Deltas Are Relative To The Persisted Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  persisted sale: nails × 10                                             │
//! │                                                                         │
//! │  edit 1 in modal: nails × 6     (not saved)                             │
//! │  edit 2 in modal: nails × 8     ← submitted                             │
//! │                                                                         │
//! │  delta = 10 − 8 = +2            ✅ relative to persisted                │
//! │  delta =  6 − 8 = −2            ❌ relative to modal state              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Availability While Editing
//! The units this sale already holds count as available to it:
//! `available(p) = persisted_stock(p) + original_qty(p)`. Equivalently, net
//! consumption `original_qty − edited_qty` may not dig deeper than the
//! persisted stock.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::ledger::Sale;
use crate::money::Money;
use crate::stock::{StockDeltas, StockSnapshot};
use crate::types::LineItem;
use crate::validation::{validate_paid_amount, validate_product_id, validate_quantity};

/// An edited sale and the stock writes it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EditOutcome {
    pub sale: Sale,
    pub stock_deltas: StockDeltas,
}

/// Applies an edit to `original`.
///
/// ## Arguments
/// * `original` - the sale as persisted, not as last shown in the modal
/// * `edited_items` - the full replacement line list; omit a line to remove it
/// * `new_paid` - the paid amount after the edit (non-negative)
/// * `stock` - persisted stock, freshly read
///
/// ## Stock Deltas
/// - kept line: `original_qty − edited_qty`
/// - removed line: `+original_qty`
/// - new line: `−edited_qty`
///
/// Edited discounts are clamped to each line's margin, the same rule the
/// cart applies.
pub fn apply_edit(
    original: &Sale,
    edited_items: &[LineItem],
    new_paid: Money,
    stock: &StockSnapshot,
) -> CoreResult<EditOutcome> {
    validate_paid_amount(new_paid)?;
    for item in edited_items {
        validate_product_id(&item.product_id)?;
        validate_quantity(item.quantity)?;
    }

    let original_qty = quantities_by_product(&original.items);
    let edited_qty = quantities_by_product(edited_items);

    let mut stock_deltas = StockDeltas::new();
    for (product_id, before) in &original_qty {
        let after = edited_qty.get(product_id).copied().unwrap_or(0);
        stock_deltas.add(product_id, before - after);
    }
    for (product_id, after) in &edited_qty {
        if !original_qty.contains_key(product_id) {
            stock_deltas.add(product_id, -after);
        }
    }

    for (product_id, delta) in stock_deltas.iter() {
        let persisted = stock.available(product_id);
        if -delta > persisted {
            let held = original_qty.get(product_id).copied().unwrap_or(0);
            return Err(CoreError::InsufficientStock {
                product_id: product_id.to_string(),
                available: persisted + held,
                requested: edited_qty.get(product_id).copied().unwrap_or(0),
            });
        }
    }

    let items = edited_items
        .iter()
        .map(|item| {
            let mut item = item.clone();
            item.discount = item.clamp_discount(item.discount);
            item
        })
        .collect();

    Ok(EditOutcome {
        sale: Sale::new(original.id.clone(), items, new_paid),
        stock_deltas,
    })
}

fn quantities_by_product(items: &[LineItem]) -> BTreeMap<&str, i64> {
    let mut quantities = BTreeMap::new();
    for item in items {
        *quantities.entry(item.product_id.as_str()).or_insert(0) += item.quantity;
    }
    quantities
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::PaymentStatus;

    fn kes(shillings: i64) -> Money {
        Money::from_shillings(shillings)
    }

    fn line(id: &str, quantity: i64, unit: i64, buying: i64) -> LineItem {
        LineItem {
            product_id: id.to_string(),
            name: id.to_string(),
            quantity,
            unit_price: kes(unit),
            buying_price: kes(buying),
            discount: Money::zero(),
        }
    }

    fn persisted_sale() -> Sale {
        Sale::new(
            "S-7",
            vec![line("nails", 10, 20, 12), line("cement", 4, 500, 300)],
            kes(2200),
        )
    }

    fn stock(entries: &[(&str, i64)]) -> StockSnapshot {
        entries.iter().map(|(id, qty)| (*id, *qty)).collect()
    }

    #[test]
    fn test_quantity_only_edit_conserves_deltas() {
        let original = persisted_sale();
        let edited = vec![line("nails", 8, 20, 12), line("cement", 6, 500, 300)];

        let outcome = apply_edit(&original, &edited, kes(2200), &stock(&[("cement", 5)])).unwrap();

        assert_eq!(outcome.stock_deltas.get("nails"), 2);
        assert_eq!(outcome.stock_deltas.get("cement"), -2);
        let expected: i64 = (10 - 8) + (4 - 6);
        assert_eq!(outcome.stock_deltas.net(), expected);
    }

    #[test]
    fn test_removed_line_returns_everything() {
        let original = persisted_sale();
        let edited = vec![line("cement", 4, 500, 300)];

        let outcome = apply_edit(&original, &edited, kes(2000), &StockSnapshot::new()).unwrap();

        assert_eq!(outcome.stock_deltas.get("nails"), 10);
        assert_eq!(outcome.stock_deltas.get("cement"), 0);
        assert_eq!(outcome.sale.total(), kes(2000));
        assert_eq!(outcome.sale.status(), PaymentStatus::Paid);
    }

    #[test]
    fn test_added_line_consumes_stock() {
        let original = persisted_sale();
        let mut edited = original.items.clone();
        edited.push(line("paint", 2, 1200, 950));

        let outcome = apply_edit(&original, &edited, kes(2200), &stock(&[("paint", 2)])).unwrap();

        assert_eq!(outcome.stock_deltas.get("paint"), -2);
        assert_eq!(outcome.stock_deltas.len(), 1);
        assert_eq!(outcome.sale.total(), kes(2200 + 2400));
        assert_eq!(outcome.sale.status(), PaymentStatus::Partial);
    }

    #[test]
    fn test_added_line_beyond_stock_rejected() {
        let original = persisted_sale();
        let mut edited = original.items.clone();
        edited.push(line("paint", 3, 1200, 950));

        let err = apply_edit(&original, &edited, kes(2200), &stock(&[("paint", 2)])).unwrap_err();

        assert_eq!(
            err,
            CoreError::InsufficientStock {
                product_id: "paint".to_string(),
                available: 2,
                requested: 3,
            }
        );
    }

    #[test]
    fn test_raise_counts_units_already_held() {
        let original = persisted_sale();
        // Sale holds 4 cement, 3 more on the shelf: up to 7 is fine.
        let ok = vec![line("nails", 10, 20, 12), line("cement", 7, 500, 300)];
        assert!(apply_edit(&original, &ok, kes(2200), &stock(&[("cement", 3)])).is_ok());

        let too_many = vec![line("nails", 10, 20, 12), line("cement", 8, 500, 300)];
        let err = apply_edit(&original, &too_many, kes(2200), &stock(&[("cement", 3)])).unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientStock {
                product_id: "cement".to_string(),
                available: 7,
                requested: 8,
            }
        );
    }

    #[test]
    fn test_unknown_product_treated_as_no_stock() {
        let original = persisted_sale();
        let mut edited = original.items.clone();
        edited.push(line("ghost", 1, 10, 5));

        assert!(matches!(
            apply_edit(&original, &edited, kes(2200), &StockSnapshot::new()),
            Err(CoreError::InsufficientStock { available: 0, .. })
        ));
    }

    #[test]
    fn test_repeated_edits_use_persisted_baseline() {
        let original = persisted_sale();
        let first = vec![line("nails", 6, 20, 12), line("cement", 4, 500, 300)];
        let second = vec![line("nails", 8, 20, 12), line("cement", 4, 500, 300)];

        // The modal's first draft is discarded; only the persisted sale counts.
        let _ = apply_edit(&original, &first, kes(2200), &StockSnapshot::new()).unwrap();
        let outcome = apply_edit(&original, &second, kes(2200), &StockSnapshot::new()).unwrap();

        assert_eq!(outcome.stock_deltas.get("nails"), 2);
    }

    #[test]
    fn test_edit_rederives_everything() {
        let original = persisted_sale();
        let mut edited = vec![line("nails", 10, 20, 12)];
        edited[0].discount = kes(500); // margin is only 80

        let outcome = apply_edit(&original, &edited, kes(150), &StockSnapshot::new()).unwrap();
        let summary = outcome.sale.summary();

        assert_eq!(outcome.sale.items[0].discount, kes(80));
        assert_eq!(summary.total, kes(120));
        assert_eq!(summary.profit, Money::zero());
        assert_eq!(summary.balance, kes(-30));
        assert_eq!(summary.status, PaymentStatus::Overpaid);
        assert_eq!(outcome.sale.id, original.id);
    }

    #[test]
    fn test_invalid_edit_inputs() {
        let original = persisted_sale();

        let err = apply_edit(&original, &original.items, kes(-1), &StockSnapshot::new()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidPaymentAmount { .. }));

        let zero_qty = vec![line("nails", 0, 20, 12)];
        let err = apply_edit(&original, &zero_qty, kes(0), &StockSnapshot::new()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::MustBePositive { .. })
        ));
    }
}
