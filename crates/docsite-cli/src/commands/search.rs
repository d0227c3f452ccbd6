//! Search command implementation

use anyhow::Result;
use colored::Colorize;
use docsite_core::{SearchSession, SearchView};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::output::{OutputFormat, format_score, print_json};
use crate::utils::context::AppContext;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchPayload<'a> {
    query: &'a str,
    total_matches: usize,
    limit: usize,
    execution_time_ms: u128,
    results: Vec<ResultRow<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultRow<'a> {
    path: &'a str,
    title: &'a str,
    section: &'a str,
    score: f64,
    matched_fields: Vec<&'static str>,
    snippet: &'a str,
}

/// Build (or load) the index, then run one query through a search session.
pub async fn search(
    ctx: &AppContext,
    query: &str,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let start = Instant::now();
    let index = Arc::new(ctx.search_index()?);
    index.build_index().await;

    let limit = limit.unwrap_or(ctx.config.search.max_results).max(1);
    let session = SearchSession::new(index, limit);
    let Some(view) = session.query(query).await else {
        return Ok(());
    };
    let elapsed = start.elapsed();

    match format {
        OutputFormat::Json => {
            let payload = SearchPayload {
                query,
                total_matches: view.total_matches,
                limit,
                execution_time_ms: elapsed.as_millis(),
                results: view
                    .results
                    .iter()
                    .map(|r| ResultRow {
                        path: &r.document.path,
                        title: &r.document.title,
                        section: &r.document.section,
                        score: r.score,
                        matched_fields: r.matched_fields.iter().map(|f| f.as_str()).collect(),
                        snippet: &r.snippet,
                    })
                    .collect(),
            };
            print_json(&payload)
        },
        OutputFormat::Text => {
            print_text(&view, elapsed.as_millis());
            Ok(())
        },
    }
}

fn print_text(view: &SearchView, elapsed_ms: u128) {
    if view.results.is_empty() {
        println!("No results for '{}'", view.query);
        return;
    }

    for group in &view.groups {
        println!("{}", group.section.bold().underline());
        for result in &group.results {
            println!(
                "  {} {} {}",
                result.document.title.green(),
                result.document.path.dimmed(),
                format!("[{}]", format_score(result.score)).bright_black()
            );
            if !result.snippet.is_empty() {
                println!("    {}", result.snippet);
            }
        }
        println!();
    }

    println!(
        "{}",
        format!(
            "Showing {} of {} results in {}ms",
            view.results.len(),
            view.total_matches,
            elapsed_ms
        )
        .dimmed()
    );
}
