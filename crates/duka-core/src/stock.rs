//! # Stock Reconciliation Types
//!
//! Signed stock changes produced by checkout, edits and returns, and the
//! stock snapshot edits are validated against.
//!
//! ## Sign Convention
//! ```text
//!   delta < 0   sale consumes stock      (checkout, raising a quantity)
//!   delta > 0   stock comes back         (lowering a quantity, removing a
//!                                          line, returning GOOD items)
//! ```
//!
//! The calculator never writes stock. The caller applies these deltas to the
//! persisted records atomically, serialized per product, after a fresh read.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

// =============================================================================
// Stock Deltas
// =============================================================================

/// Net signed change per product.
///
/// Entries that net to zero are dropped, so an empty map means "no stock
/// writes needed". Ordered by product id for stable output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockDeltas(#[ts(type = "Record<string, number>")] BTreeMap<String, i64>);

impl StockDeltas {
    pub fn new() -> Self {
        StockDeltas::default()
    }

    /// Adds `delta` to the running change for `product_id`.
    pub fn add(&mut self, product_id: &str, delta: i64) {
        if delta == 0 {
            return;
        }
        let entry = self.0.entry(product_id.to_string()).or_insert(0);
        *entry += delta;
        if *entry == 0 {
            self.0.remove(product_id);
        }
    }

    /// Net change for `product_id`; zero when nothing moved.
    pub fn get(&self, product_id: &str) -> i64 {
        self.0.get(product_id).copied().unwrap_or(0)
    }

    /// Sum of every delta.
    pub fn net(&self) -> i64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(id, delta)| (id.as_str(), *delta))
    }

    /// List form for `PATCH /items/{id}/stock` calls.
    pub fn to_adjustments(&self) -> Vec<StockAdjustment> {
        self.iter()
            .map(|(product_id, delta)| StockAdjustment {
                product_id: product_id.to_string(),
                delta,
            })
            .collect()
    }
}

/// One stock write for the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockAdjustment {
    pub product_id: String,
    pub delta: i64,
}

// =============================================================================
// Stock Snapshot
// =============================================================================

/// Persisted stock per product, freshly read before an edit.
///
/// Products absent from the snapshot have no stock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockSnapshot(#[ts(type = "Record<string, number>")] BTreeMap<String, i64>);

impl StockSnapshot {
    pub fn new() -> Self {
        StockSnapshot::default()
    }

    pub fn insert(&mut self, product_id: impl Into<String>, stock: i64) {
        self.0.insert(product_id.into(), stock);
    }

    /// Persisted stock for `product_id`, never below zero.
    pub fn available(&self, product_id: &str) -> i64 {
        self.0.get(product_id).copied().unwrap_or(0).max(0)
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for StockSnapshot {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        StockSnapshot(iter.into_iter().map(|(id, qty)| (id.into(), qty)).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
