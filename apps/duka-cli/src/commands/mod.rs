//! # Commands Module
//!
//! One function per `duka` subcommand.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (dispatch)
//! ├── cart.rs     ◄─── add-line, discount, totals
//! ├── sale.rs     ◄─── classify, checkout, pay
//! ├── adjust.rs   ◄─── edit, return
//! └── config.rs   ◄─── config
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  $ duka checkout --input tender.json                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  dispatch(Command::Checkout, input, &config)                            │
//! │         │  serde_json::from_str::<CheckoutRequest>                      │
//! │         ▼                                                               │
//! │  sale::checkout(request, &config) -> Result<CheckoutResponse, ApiError> │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  serde_json::Value ──► stdout                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod adjust;
pub mod cart;
pub mod config;
pub mod sale;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::cli::Command;
use crate::config::LedgerConfig;
use crate::error::{ApiError, ApiResult};

/// Runs `command` against the JSON request in `input`.
pub fn dispatch(command: Command, input: &str, settings: &LedgerConfig) -> ApiResult<Value> {
    match command {
        Command::AddLine => respond(cart::add_line(parse(input)?, settings)?),
        Command::Discount => respond(cart::discount(parse(input)?, settings)?),
        Command::Totals => respond(cart::totals(parse(input)?)),
        Command::Classify => respond(sale::classify(parse(input)?)),
        Command::Checkout => respond(sale::checkout(parse(input)?, settings)?),
        Command::Pay => respond(sale::pay(parse(input)?)?),
        Command::Edit => respond(adjust::edit(parse(input)?)?),
        Command::Return => respond(adjust::return_items(parse(input)?, settings)?),
        Command::Config => respond(config::show_config(settings)),
    }
}

fn parse<T: DeserializeOwned>(input: &str) -> ApiResult<T> {
    Ok(serde_json::from_str(input)?)
}

fn respond<T: Serialize>(response: T) -> ApiResult<Value> {
    serde_json::to_value(response)
        .map_err(|err| ApiError::internal(format!("Failed to encode response: {}", err)))
}
