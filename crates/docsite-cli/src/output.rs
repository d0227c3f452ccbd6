//! Output format selection and JSON printing.

use anyhow::Result;
use serde::Serialize;

/// Output format options supported by the CLI
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored terminal output
    Text,
    /// Pretty-printed JSON for scripts
    Json,
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Format a fuzzy score (lower is better) for display.
pub fn format_score(score: f64) -> String {
    format!("{score:.3}")
}
