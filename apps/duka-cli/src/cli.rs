//! Command-line arguments.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "duka",
    version,
    about = "Sale ledger calculator for the hardware store back office"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Read the JSON request from this file instead of stdin.
    #[arg(long, short, global = true)]
    pub input: Option<PathBuf>,

    /// Ledger config file (default: <config dir>/duka/ledger.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Pretty-print the JSON response.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// More log output on stderr (-v debug, -vv trace).
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Add a product to a cart or set its line quantity
    AddLine,
    /// Set a line discount (clamped to the line margin)
    Discount,
    /// Cart totals and profit
    Totals,
    /// Payment status for a total and paid amount
    Classify,
    /// Validate tender and turn a cart into a sale
    Checkout,
    /// Edit a persisted sale
    Edit,
    /// Return items against a persisted sale
    Return,
    /// Record a further payment against a sale
    Pay,
    /// Show the effective configuration
    Config,
}

impl Command {
    /// Whether the command reads a JSON request.
    pub fn reads_input(self) -> bool {
        !matches!(self, Command::Config)
    }
}
