//! # duka-core: Sale Ledger Calculator
//!
//! The one place the hardware store's sale arithmetic lives. Checkout, the
//! sale-edit modal, the return modal and rental payments all call these
//! functions, so every screen enforces the same rules.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Duka Back Office                                 │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        POS checkout · Sale edit · Returns · Rentals             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ product & stock snapshots              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ duka-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐ ┌─────────┐  │   │
//! │  │   │  money  │ │  cart   │ │ checkout │ │  edit  │ │ returns │  │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └────────┘ └─────────┘  │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐                          │   │
//! │  │   │ ledger  │ │  stock  │ │validation│                          │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘                          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOGGING • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ sale + stock deltas                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │     REST backend: POST /sales, PATCH /items/{id}/stock, ...     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - KES in integer cents
//! - [`types`] - Products, line items, payment and return enums
//! - [`cart`] - Adding lines, quantities, discounts
//! - [`ledger`] - Totals, payment status, `Sale`, payments
//! - [`checkout`] - Tender validation, cart → sale
//! - [`edit`] - Editing a persisted sale
//! - [`returns`] - Returns and write-offs
//! - [`stock`] - Stock deltas and snapshots
//! - [`validation`] - Field-level checks
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output; inputs are never mutated on error
//! 2. **No I/O**: no REST calls, no logging, no toasts
//! 3. **Integer Money**: every amount is KES cents in an `i64`
//! 4. **Derived, Not Stored**: totals, profit, balance and status are always recomputed
//!
//! ## Example Usage
//!
//! ```rust
//! use duka_core::{apply_payment, Cart, Money, PaymentStatus, ProductSnapshot, Sale};
//!
//! let cement = ProductSnapshot {
//!     id: "cement-50kg".into(),
//!     name: "Cement 50kg".into(),
//!     selling_price: Money::from_shillings(500),
//!     buying_price: Money::from_shillings(300),
//!     stock_quantity: 40,
//! };
//!
//! let mut cart = Cart::new();
//! cart.add_or_update_line(&cement, 3).unwrap();
//!
//! let sale = Sale::new("S-1", cart.items.clone(), Money::zero());
//! assert_eq!(sale.status(), PaymentStatus::Pending);
//!
//! let sale = apply_payment(&sale, Money::from_shillings(1500)).unwrap();
//! assert_eq!(sale.status(), PaymentStatus::Paid);
//! assert_eq!(sale.profit(), Money::from_shillings(600));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod edit;
pub mod error;
pub mod ledger;
pub mod money;
pub mod returns;
pub mod stock;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLimits, CartTotals};
pub use checkout::{checkout, validate_checkout, CheckoutOutcome, CheckoutPayment};
pub use edit::{apply_edit, EditOutcome};
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{apply_payment, classify_payment, compute_totals, Sale, SaleSummary, Totals};
pub use money::Money;
pub use returns::{apply_return, ReturnOutcome, ReturnPolicy, ReturnRecord, ReturnRequest};
pub use stock::{StockAdjustment, StockDeltas, StockSnapshot};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct products in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity on a single line.
///
/// Hardware goods sold by the piece (nails, screws, washers) run into the
/// thousands, so the ceiling is well above a grocery till's.
pub const MAX_LINE_QUANTITY: i64 = 99_999;
