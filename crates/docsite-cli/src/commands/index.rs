//! Index command implementation

use anyhow::Result;
use colored::Colorize;
use docsite_core::{BuildReport, BuildSource};
use serde::Serialize;
use std::time::Instant;

use crate::output::{OutputFormat, print_json};
use crate::utils::context::AppContext;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexPayload {
    #[serde(flatten)]
    report: BuildReport,
    cache_dir: String,
    elapsed_ms: u128,
}

/// Build the search index so later searches can load it from the cache.
pub async fn build_index(ctx: &AppContext, force: bool, format: OutputFormat) -> Result<()> {
    let index = ctx.search_index()?;
    if force {
        index.clear_cache()?;
    }

    let start = Instant::now();
    let report = index.build_index().await;
    let elapsed_ms = start.elapsed().as_millis();

    match format {
        OutputFormat::Json => print_json(&IndexPayload {
            report,
            cache_dir: ctx.config.paths.cache_dir.display().to_string(),
            elapsed_ms,
        }),
        OutputFormat::Text => {
            let origin = match report.source {
                BuildSource::Memory => "memory",
                BuildSource::Cache => "cache",
                BuildSource::Fresh => "documents",
            };
            println!(
                "{} Indexed {} documents from {} in {}ms",
                "✓".green(),
                report.documents.to_string().bold(),
                origin,
                elapsed_ms
            );
            if report.skipped > 0 {
                println!(
                    "{} {} documents could not be loaded (run with --verbose for details)",
                    "!".yellow(),
                    report.skipped
                );
            }
            Ok(())
        },
    }
}
