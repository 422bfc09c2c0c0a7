//! # Returns
//!
//! Taking goods back against a persisted sale.
//!
//! ## Return Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sale: bulbs × 5 @ 100                                                  │
//! │                                                                         │
//! │  return bulbs × 2, GOOD     → line 3 × 100, stock +2                    │
//! │  return bulbs × 2, DAMAGED  → line 3 × 100, stock  0, written off 2     │
//! │                                                                         │
//! │  paid is untouched either way; if it now exceeds the total the sale    │
//! │  is OVERPAID and `refund_due` says by how much.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::ledger::Sale;
use crate::money::Money;
use crate::stock::StockDeltas;
use crate::types::ReturnCondition;
use crate::validation::validate_product_id;

/// One line of a return slip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReturnRequest {
    pub product_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub reason: String,
    pub condition: ReturnCondition,
}

/// Store policy for returned goods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReturnPolicy {
    /// Put damaged goods back into sellable stock instead of writing them off.
    #[serde(default)]
    pub restock_damaged: bool,
}

/// What happened to one return request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReturnRecord {
    pub product_id: String,
    pub quantity: i64,
    pub condition: ReturnCondition,
    pub reason: String,
    /// Whether the units went back into sellable stock.
    pub restocked: bool,
}

/// A sale after a return, with the inventory consequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReturnOutcome {
    pub sale: Sale,
    /// Sellable stock coming back.
    pub stock_deltas: StockDeltas,
    /// Units taken out of the sale but not restocked.
    pub written_off: StockDeltas,
    pub records: Vec<ReturnRecord>,
    /// Amount owed back to the customer; zero unless the sale is now
    /// overpaid.
    pub refund_due: Money,
}

/// Applies `requests` to `original`.
///
/// ## Rules
/// - every request quantity is positive and names a product in the sale
/// - the quantities returned for a product, summed over all requests, never
///   exceed what the sale sold (`ExcessiveReturnQuantity`)
/// - a reduced line keeps a pro-rata share of its discount
///   (`discount × remaining / sold`, truncated), so it stays within margin
/// - a line returned in full is dropped
/// - `paid` is unchanged
pub fn apply_return(
    original: &Sale,
    requests: &[ReturnRequest],
    policy: ReturnPolicy,
) -> CoreResult<ReturnOutcome> {
    if requests.is_empty() {
        return Err(ValidationError::Required {
            field: "return requests".to_string(),
        }
        .into());
    }

    let mut returned: BTreeMap<&str, i64> = BTreeMap::new();
    for request in requests {
        validate_product_id(&request.product_id)?;
        if request.quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "return quantity".to_string(),
            }
            .into());
        }

        let sold = original.quantity_of(&request.product_id);
        if sold == 0 {
            return Err(CoreError::LineNotFound {
                product_id: request.product_id.clone(),
            });
        }

        let total = returned.entry(request.product_id.as_str()).or_insert(0);
        *total += request.quantity;
        if *total > sold {
            return Err(CoreError::ExcessiveReturnQuantity {
                product_id: request.product_id.clone(),
                sold,
                requested: *total,
            });
        }
    }

    let mut items = Vec::with_capacity(original.items.len());
    for item in &original.items {
        let outstanding = returned.get_mut(item.product_id.as_str());
        let taken = match outstanding {
            Some(left) => {
                let taken = (*left).min(item.quantity);
                *left -= taken;
                taken
            }
            None => 0,
        };

        let remaining = item.quantity - taken;
        if remaining == 0 {
            continue;
        }

        let mut item = item.clone();
        item.discount = item.discount.prorate(remaining, item.quantity);
        item.quantity = remaining;
        items.push(item);
    }

    let mut stock_deltas = StockDeltas::new();
    let mut written_off = StockDeltas::new();
    let mut records = Vec::with_capacity(requests.len());
    for request in requests {
        let restocked = match request.condition {
            ReturnCondition::Good => true,
            ReturnCondition::Damaged => policy.restock_damaged,
        };
        if restocked {
            stock_deltas.add(&request.product_id, request.quantity);
        } else {
            written_off.add(&request.product_id, request.quantity);
        }
        records.push(ReturnRecord {
            product_id: request.product_id.clone(),
            quantity: request.quantity,
            condition: request.condition,
            reason: request.reason.trim().to_string(),
            restocked,
        });
    }

    let sale = Sale::new(original.id.clone(), items, original.paid);
    let refund_due = (-sale.balance()).max(Money::zero());

    Ok(ReturnOutcome {
        sale,
        stock_deltas,
        written_off,
        records,
        refund_due,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LineItem, PaymentStatus};

    fn kes(shillings: i64) -> Money {
        Money::from_shillings(shillings)
    }

    fn line(id: &str, quantity: i64, unit: i64, buying: i64, discount: i64) -> LineItem {
        LineItem {
            product_id: id.to_string(),
            name: id.to_string(),
            quantity,
            unit_price: kes(unit),
            buying_price: kes(buying),
            discount: kes(discount),
        }
    }

    fn request(id: &str, quantity: i64, condition: ReturnCondition) -> ReturnRequest {
        ReturnRequest {
            product_id: id.to_string(),
            quantity,
            reason: "customer changed mind".to_string(),
            condition,
        }
    }

    fn bulbs_sale(paid: i64) -> Sale {
        Sale::new("S-9", vec![line("bulb", 5, 100, 60, 0)], kes(paid))
    }

    #[test]
    fn test_damaged_return_writes_off() {
        let sale = bulbs_sale(500);
        let outcome = apply_return(
            &sale,
            &[request("bulb", 2, ReturnCondition::Damaged)],
            ReturnPolicy::default(),
        )
        .unwrap();

        assert_eq!(outcome.sale.total(), sale.total() - kes(200));
        assert_eq!(outcome.sale.profit(), kes(120));
        assert_eq!(outcome.stock_deltas.get("bulb"), 0);
        assert_eq!(outcome.written_off.get("bulb"), 2);
        assert!(!outcome.records[0].restocked);
    }

    #[test]
    fn test_good_return_restocks() {
        let outcome = apply_return(
            &bulbs_sale(500),
            &[request("bulb", 2, ReturnCondition::Good)],
            ReturnPolicy::default(),
        )
        .unwrap();

        assert_eq!(outcome.stock_deltas.get("bulb"), 2);
        assert!(outcome.written_off.is_empty());
        assert_eq!(outcome.sale.items[0].quantity, 3);
    }

    #[test]
    fn test_policy_can_restock_damaged() {
        let policy = ReturnPolicy {
            restock_damaged: true,
        };
        let outcome = apply_return(
            &bulbs_sale(500),
            &[request("bulb", 2, ReturnCondition::Damaged)],
            policy,
        )
        .unwrap();

        assert_eq!(outcome.stock_deltas.get("bulb"), 2);
        assert!(outcome.written_off.is_empty());
    }

    #[test]
    fn test_return_keeps_paid_and_reports_refund() {
        let outcome = apply_return(
            &bulbs_sale(500),
            &[request("bulb", 2, ReturnCondition::Good)],
            ReturnPolicy::default(),
        )
        .unwrap();

        assert_eq!(outcome.sale.paid, kes(500));
        assert_eq!(outcome.sale.balance(), kes(-200));
        assert_eq!(outcome.sale.status(), PaymentStatus::Overpaid);
        assert_eq!(outcome.refund_due, kes(200));
    }

    #[test]
    fn test_return_on_unpaid_sale_owes_nothing_back() {
        let outcome = apply_return(
            &bulbs_sale(100),
            &[request("bulb", 1, ReturnCondition::Good)],
            ReturnPolicy::default(),
        )
        .unwrap();

        assert_eq!(outcome.sale.balance(), kes(300));
        assert_eq!(outcome.sale.status(), PaymentStatus::Partial);
        assert_eq!(outcome.refund_due, Money::zero());
    }

    #[test]
    fn test_excessive_return_rejected() {
        let err = apply_return(
            &bulbs_sale(500),
            &[request("bulb", 6, ReturnCondition::Good)],
            ReturnPolicy::default(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            CoreError::ExcessiveReturnQuantity {
                product_id: "bulb".to_string(),
                sold: 5,
                requested: 6,
            }
        );
    }

    #[test]
    fn test_split_requests_accumulate_against_sold() {
        let err = apply_return(
            &bulbs_sale(500),
            &[
                request("bulb", 3, ReturnCondition::Good),
                request("bulb", 3, ReturnCondition::Damaged),
            ],
            ReturnPolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::ExcessiveReturnQuantity { requested: 6, .. }
        ));

        let outcome = apply_return(
            &bulbs_sale(500),
            &[
                request("bulb", 3, ReturnCondition::Good),
                request("bulb", 2, ReturnCondition::Damaged),
            ],
            ReturnPolicy::default(),
        )
        .unwrap();
        assert!(outcome.sale.items.is_empty());
        assert_eq!(outcome.stock_deltas.get("bulb"), 3);
        assert_eq!(outcome.written_off.get("bulb"), 2);
        assert_eq!(outcome.refund_due, kes(500));
    }

    #[test]
    fn test_discount_shrinks_with_the_line() {
        let sale = Sale::new("S-10", vec![line("drill", 4, 5000, 4000, 1000)], kes(19000));
        let outcome = apply_return(
            &sale,
            &[request("drill", 1, ReturnCondition::Good)],
            ReturnPolicy::default(),
        )
        .unwrap();

        let item = &outcome.sale.items[0];
        assert_eq!(item.quantity, 3);
        assert_eq!(item.discount, kes(750));
        assert_eq!(outcome.sale.total(), kes(14250));
        assert!(item.discount <= item.max_discount());
    }

    #[test]
    fn test_return_spans_lines_of_same_product() {
        // Same pipe sold on two lines at different prices.
        let sale = Sale::new(
            "S-12",
            vec![line("pipe", 3, 400, 300, 100), line("pipe", 2, 450, 300, 100)],
            kes(1900),
        );

        // One pipe comes out of the first line only; its discount is truncated.
        let outcome = apply_return(
            &sale,
            &[request("pipe", 1, ReturnCondition::Good)],
            ReturnPolicy::default(),
        )
        .unwrap();
        assert_eq!(outcome.sale.items[0].quantity, 2);
        assert_eq!(outcome.sale.items[0].discount, Money::from_cents(6_666));
        assert_eq!(outcome.sale.items[1], line("pipe", 2, 450, 300, 100));

        // Four pipes empty the first line and take one from the second.
        let outcome = apply_return(
            &sale,
            &[request("pipe", 4, ReturnCondition::Good)],
            ReturnPolicy::default(),
        )
        .unwrap();
        assert_eq!(outcome.sale.items.len(), 1);
        let item = &outcome.sale.items[0];
        assert_eq!(item.quantity, 1);
        assert_eq!(item.unit_price, kes(450));
        assert_eq!(item.discount, kes(50));
        assert_eq!(outcome.sale.total(), kes(400));
        assert_eq!(outcome.stock_deltas.get("pipe"), 4);
        assert_eq!(outcome.refund_due, kes(1500));

        // Five is everything sold across both lines; six is too many.
        let err = apply_return(
            &sale,
            &[request("pipe", 6, ReturnCondition::Good)],
            ReturnPolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::ExcessiveReturnQuantity { sold: 5, .. }));
    }

    #[test]
    fn test_other_lines_untouched() {
        let sale = Sale::new(
            "S-11",
            vec![line("bulb", 5, 100, 60, 0), line("socket", 2, 150, 90, 20)],
            kes(800),
        );
        let outcome = apply_return(
            &sale,
            &[request("bulb", 5, ReturnCondition::Good)],
            ReturnPolicy::default(),
        )
        .unwrap();

        assert_eq!(outcome.sale.items, vec![line("socket", 2, 150, 90, 20)]);
    }

    #[test]
    fn test_invalid_requests() {
        let sale = bulbs_sale(500);

        assert!(matches!(
            apply_return(&sale, &[], ReturnPolicy::default()),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
        assert!(matches!(
            apply_return(&sale, &[request("bulb", 0, ReturnCondition::Good)], ReturnPolicy::default()),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
        assert_eq!(
            apply_return(&sale, &[request("hammer", 1, ReturnCondition::Good)], ReturnPolicy::default())
                .unwrap_err(),
            CoreError::LineNotFound {
                product_id: "hammer".to_string()
            }
        );
    }
}
