//! # duka
//!
//! ```text
//! $ duka add-line --input line.json
//! $ echo '{"total": "1,000", "paid": 0}' | duka classify
//! $ duka return --input return.json --pretty
//! ```
//!
//! Exit status is 0 with a response on stdout, or 1 with an `ApiError` on
//! stderr.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::warn;

use duka_cli::cli::Cli;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    duka_cli::init_tracing(cli.verbose);

    match duka_cli::run(&cli) {
        Ok(response) => {
            write_json(std::io::stdout().lock(), &response, cli.pretty)
                .context("Failed to write response")?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            warn!(code = ?err.code, "Command failed: {}", err.message);
            write_json(std::io::stderr().lock(), &err, cli.pretty)
                .context("Failed to write error")?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn write_json<W: Write, T: Serialize>(mut writer: W, value: &T, pretty: bool) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
