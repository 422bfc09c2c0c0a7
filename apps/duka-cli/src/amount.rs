//! Amount fields typed by a cashier or a script.
//!
//! Request amounts may be given as integer cents (`150000`) or as display
//! text (`"1,500.00"`, `"KES 1500"`). Both become [`Money`] before anything
//! reaches the ledger.

use serde::{Deserialize, Deserializer};

use duka_core::Money;

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountInput {
    Cents(i64),
    Text(String),
}

/// `#[serde(deserialize_with = "crate::amount::deserialize")]`
pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
where
    D: Deserializer<'de>,
{
    match AmountInput::deserialize(deserializer)? {
        AmountInput::Cents(cents) => Ok(Money::from_cents(cents)),
        AmountInput::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}
