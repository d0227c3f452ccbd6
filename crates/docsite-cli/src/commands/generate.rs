//! Generate command implementations

use anyhow::{Context, Result};
use colored::Colorize;
use docsite_core::generate::{SidebarGenerator, SitemapGenerator};
use std::path::PathBuf;

use crate::utils::context::AppContext;

/// Scan the docs directory and write the sidebar manifest.
pub fn generate_sidebar(
    ctx: &AppContext,
    docs_dir: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let site = &ctx.config.site;
    let docs_dir = docs_dir.unwrap_or_else(|| ctx.config.docs_dir());
    let output = output.unwrap_or_else(|| docs_dir.join(&site.manifest_file));

    let manifest = SidebarGenerator::new(&docs_dir, &site.docs_root)
        .write(&output)
        .with_context(|| format!("Failed to generate sidebar from {}", docs_dir.display()))?;

    println!(
        "{} Sidebar written to {} ({} top-level entries, {} documents)",
        "✓".green(),
        output.display(),
        manifest.nodes().len(),
        manifest.file_count()
    );
    Ok(())
}

/// Walk the docs directory and write `sitemap.xml`.
pub fn generate_sitemap(
    ctx: &AppContext,
    docs_dir: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let site = &ctx.config.site;
    let docs_dir = docs_dir.unwrap_or_else(|| ctx.config.docs_dir());
    let output = output.unwrap_or_else(|| ctx.config.paths.content_root.join("sitemap.xml"));

    let pages = SitemapGenerator::new(&docs_dir, &site.base_url, &site.docs_root)
        .write(&output)
        .with_context(|| format!("Failed to generate sitemap from {}", docs_dir.display()))?;

    println!(
        "{} Sitemap written to {} ({} documents)",
        "✓".green(),
        output.display(),
        pages
    );
    Ok(())
}
