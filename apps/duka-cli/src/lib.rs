//! # duka-cli
//!
//! The `duka` binary: JSON in, JSON out, ledger rules from `duka-core`.
//!
//! ## Module Structure
//! ```text
//! duka-cli/src/
//! ├── main.rs         ◄─── Entry point, output
//! ├── lib.rs          ◄─── You are here (run, tracing)
//! ├── cli.rs          ◄─── clap arguments
//! ├── config.rs       ◄─── LedgerConfig (toml + DUKA_* env)
//! ├── error.rs        ◄─── ApiError { code, message }
//! ├── amount.rs       ◄─── Money from cents or "1,500.00"
//! └── commands/       ◄─── One function per subcommand
//! ```
//!
//! ## Streams
//! stdout carries exactly one JSON document. Logs and error documents go
//! to stderr.

pub mod amount;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

use std::io::Read;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::LedgerConfig;
use crate::error::{ApiError, ApiResult, ErrorCode};

/// Initializes the tracing subscriber on stderr.
///
/// ## Log Levels
/// - `RUST_LOG` wins when set
/// - otherwise `info,duka_cli=debug`, raised by `-v`/`-vv`
pub fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info,duka_cli=debug",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads configuration, reads the request and runs the subcommand.
pub fn run(cli: &Cli) -> ApiResult<Value> {
    let settings = LedgerConfig::load(cli.config.as_deref())?;
    info!(store = %settings.store.name, command = ?cli.command, "duka starting");

    let input = if cli.command.reads_input() {
        read_input(cli.input.as_deref())?
    } else {
        String::new()
    };

    commands::dispatch(cli.command, &input, &settings)
}

/// Reads the request body from `path`, or stdin when absent.
pub fn read_input(path: Option<&Path>) -> ApiResult<String> {
    let input = match path {
        Some(path) => {
            debug!(?path, "Reading request from file");
            std::fs::read_to_string(path)?
        }
        None => {
            debug!("Reading request from stdin");
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    if input.trim().is_empty() {
        return Err(ApiError::new(ErrorCode::InvalidRequest, "Request is empty"));
    }

    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_file() {
        let err = read_input(Some(Path::new("/definitely/not/here/request.json"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::Internal);
    }

    #[test]
    fn test_missing_config_file_is_config_error() {
        let cli = <Cli as clap::Parser>::try_parse_from([
            "duka",
            "config",
            "--config",
            "/definitely/not/here/ledger.toml",
        ])
        .unwrap();

        assert_eq!(run(&cli).unwrap_err().code, ErrorCode::ConfigError);
    }
}
