//! # Sale Adjustment Commands
//!
//! Editing and returning against a sale that has already been persisted.
//! Both take the sale as stored, never as last shown on screen, and both
//! answer with the stock adjustments the caller must write.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use duka_core::{
    apply_edit, apply_return, LineItem, Money, ReturnRecord, ReturnRequest, Sale, SaleSummary,
    StockAdjustment, StockSnapshot,
};

use crate::config::LedgerConfig;
use crate::error::ApiResult;

// =============================================================================
// edit
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    /// The persisted sale.
    pub sale: Sale,
    /// Full replacement line list.
    pub items: Vec<LineItem>,
    #[serde(deserialize_with = "crate::amount::deserialize")]
    pub paid: Money,
    /// Persisted stock per product, freshly read.
    #[serde(default)]
    pub stock: StockSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResponse {
    pub sale: Sale,
    pub summary: SaleSummary,
    pub stock_adjustments: Vec<StockAdjustment>,
}

pub fn edit(request: EditRequest) -> ApiResult<EditResponse> {
    debug!(
        sale_id = %request.sale.id,
        lines = request.items.len(),
        paid = %request.paid,
        "edit command"
    );

    let outcome = apply_edit(&request.sale, &request.items, request.paid, &request.stock)
        .inspect_err(|err| warn!(sale_id = %request.sale.id, %err, "Edit rejected"))?;

    let summary = outcome.sale.summary();
    info!(
        sale_id = %summary.sale_id,
        total = %summary.total,
        status = %summary.status,
        adjustments = outcome.stock_deltas.len(),
        "Sale edited"
    );

    Ok(EditResponse {
        stock_adjustments: outcome.stock_deltas.to_adjustments(),
        sale: outcome.sale,
        summary,
    })
}

// =============================================================================
// return
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnBody {
    pub sale: Sale,
    pub requests: Vec<ReturnRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnResponse {
    pub sale: Sale,
    pub summary: SaleSummary,
    /// Restocked units only.
    pub stock_adjustments: Vec<StockAdjustment>,
    /// Units taken back but not restocked.
    pub written_off: Vec<StockAdjustment>,
    pub records: Vec<ReturnRecord>,
    pub refund_due: Money,
}

/// Applies returns using the store's damaged-goods policy.
pub fn return_items(request: ReturnBody, config: &LedgerConfig) -> ApiResult<ReturnResponse> {
    debug!(
        sale_id = %request.sale.id,
        requests = request.requests.len(),
        "return command"
    );

    let outcome = apply_return(&request.sale, &request.requests, config.return_policy())
        .inspect_err(|err| warn!(sale_id = %request.sale.id, %err, "Return rejected"))?;

    let summary = outcome.sale.summary();
    info!(
        sale_id = %summary.sale_id,
        total = %summary.total,
        status = %summary.status,
        refund_due = %outcome.refund_due,
        written_off = outcome.written_off.net(),
        "Return applied"
    );

    Ok(ReturnResponse {
        stock_adjustments: outcome.stock_deltas.to_adjustments(),
        written_off: outcome.written_off.to_adjustments(),
        sale: outcome.sale,
        summary,
        records: outcome.records,
        refund_due: outcome.refund_due,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
