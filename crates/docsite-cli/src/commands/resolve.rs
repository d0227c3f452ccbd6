//! Resolve command implementation

use anyhow::{Context, Result, bail};
use colored::Colorize;
use docsite_core::{
    Adjacent, Breadcrumb, CategoryIndex, DocumentPage, NodeKind, RouteDecision, RouteResolver,
    breadcrumbs,
};
use serde::Serialize;
use std::sync::Arc;

use crate::output::{OutputFormat, print_json};
use crate::utils::context::AppContext;

#[derive(Serialize)]
struct ResolvePayload<'a> {
    path: &'a str,
    decision: &'a RouteDecision,
    breadcrumbs: Vec<Breadcrumb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    adjacent: Option<Adjacent>,
}

/// Classify `path` against the manifest and show the outcome.
///
/// In text mode an unresolvable path is an error; JSON output reports it as
/// a `not_found` decision instead.
pub async fn resolve(ctx: &AppContext, path: &str, format: OutputFormat) -> Result<()> {
    let source = ctx.source()?;
    let manifest = source
        .fetch_manifest()
        .await
        .context("Failed to load the sidebar manifest")?;

    let resolver = RouteResolver::new(Arc::new(manifest), &ctx.config.site.docs_root, source);
    let decision = resolver.resolve(path).await;

    let adjacent = match &decision {
        RouteDecision::Document(page) => Some(resolver.find_adjacent(&page.path)),
        _ => None,
    };

    match format {
        OutputFormat::Json => print_json(&ResolvePayload {
            path,
            decision: &decision,
            breadcrumbs: breadcrumbs(path),
            adjacent,
        }),
        OutputFormat::Text => match &decision {
            RouteDecision::CategoryIndex(index) => {
                print_crumbs(path);
                print_index(index);
                Ok(())
            },
            RouteDecision::Document(page) => {
                print_crumbs(path);
                print_document(page, &adjacent.unwrap_or_default());
                Ok(())
            },
            RouteDecision::NotFound { path } => bail!("No document or folder at '{path}'"),
        },
    }
}

fn print_crumbs(path: &str) {
    let trail: Vec<String> = breadcrumbs(path)
        .into_iter()
        .map(|crumb| {
            if crumb.is_last {
                crumb.label.bold().to_string()
            } else {
                crumb.label.dimmed().to_string()
            }
        })
        .collect();
    println!("{}\n", trail.join(" / "));
}

fn print_index(index: &CategoryIndex) {
    println!("{}", index.title.bold());
    println!("{}\n", index.description);

    for item in &index.items {
        let marker = match item.kind {
            NodeKind::Folder => "▸",
            NodeKind::File => "•",
        };
        println!("  {marker} {} {}", item.title.green(), item.path.dimmed());
        if item.description != item.title {
            println!("    {}", item.description);
        }
    }
}

fn print_document(page: &DocumentPage, adjacent: &Adjacent) {
    let title = page.frontmatter.title.as_deref().unwrap_or(&page.path);
    println!("{}", title.bold());
    if let Some(description) = &page.frontmatter.description {
        println!("{description}");
    }

    if !page.headings.is_empty() {
        println!("\n{}", "On this page".underline());
        for heading in &page.headings {
            let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
            println!("{indent}{} {}", heading.text, format!("#{}", heading.id).dimmed());
        }
    }

    if adjacent.previous.is_some() || adjacent.next.is_some() {
        println!();
    }
    if let Some(previous) = &adjacent.previous {
        println!("← {} {}", previous.title, previous.path.dimmed());
    }
    if let Some(next) = &adjacent.next {
        println!("→ {} {}", next.title, next.path.dimmed());
    }
}
