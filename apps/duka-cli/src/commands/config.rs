//! # Configuration Commands
//!
//! Shows the effective configuration after file and environment overrides.

use serde::Serialize;
use tracing::debug;

use duka_core::{MAX_CART_LINES, MAX_LINE_QUANTITY};

use crate::config::LedgerConfig;

/// Ceilings compiled into the ledger; store settings may only tighten them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HardLimits {
    pub max_lines: usize,
    pub max_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigResponse {
    #[serde(flatten)]
    pub config: LedgerConfig,
    pub hard_limits: HardLimits,
}

pub fn show_config(config: &LedgerConfig) -> ConfigResponse {
    debug!("show_config command");
    ConfigResponse {
        config: config.clone(),
        hard_limits: HardLimits {
            max_lines: MAX_CART_LINES,
            max_quantity: MAX_LINE_QUANTITY,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_config_layout() {
        let json = serde_json::to_value(show_config(&LedgerConfig::default())).unwrap();

        assert_eq!(json["store"]["currency_code"], "KES");
        assert_eq!(json["returns"]["restock_damaged"], false);
        assert_eq!(json["hard_limits"]["max_lines"], MAX_CART_LINES);
    }
}
