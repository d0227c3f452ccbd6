//! # CLI Structure and Argument Parsing
//!
//! Command-line interface for `docsite`, built with `clap` derive macros.
//!
//! ```bash
//! # Search the documentation under ./public/docs
//! docsite search theme colors
//! docsite search install --limit 3 --format json
//!
//! # Inspect what a path resolves to
//! docsite resolve /docs/guides
//!
//! # Warm or clear the search cache
//! docsite index
//! docsite cache clear
//!
//! # Regenerate the sidebar manifest and sitemap
//! docsite generate sidebar
//! docsite generate sitemap --base-url https://docs.example.com
//! ```
//!
//! Documents are read from `{content_root}{docs_root}` on disk unless
//! `--base-url` is given, in which case they are fetched over HTTP.

use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure for the `docsite` command
#[derive(Parser, Clone, Debug)]
#[command(name = "docsite")]
#[command(version)]
#[command(about = "docsite - search and browse a static documentation site", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Path to configuration file (overrides autodiscovery)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Site directory holding the docs tree
    #[arg(long = "content-root", global = true, value_name = "DIR")]
    pub content_root: Option<PathBuf>,

    /// Directory for the search index cache
    #[arg(
        long = "cache-dir",
        global = true,
        value_name = "DIR",
        env = "DOCSITE_CACHE_DIR"
    )]
    pub cache_dir: Option<PathBuf>,

    /// Fetch documents from a deployed site instead of the content root
    #[arg(long = "base-url", global = true, value_name = "URL")]
    pub base_url: Option<String>,
}

/// Available subcommands for the `docsite` CLI
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Fuzzy-search every document in the manifest
    Search {
        /// Search query (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1.., value_name = "QUERY")]
        query: Vec<String>,

        /// Maximum number of results (defaults to `search.max_results`)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show what a path resolves to: a category index, a document, or nothing
    Resolve {
        /// Route path, e.g. `/docs/guides/theming`
        path: String,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Build the search index and store it in the cache
    Index {
        /// Discard any cached snapshot first
        #[arg(long)]
        force: bool,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Manage the search index cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },

    /// Generate site files from the docs directory
    Generate {
        #[command(subcommand)]
        command: GenerateCommands,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum CacheCommands {
    /// Remove the cached search index
    Clear,
}

#[derive(Subcommand, Clone, Debug)]
pub enum GenerateCommands {
    /// Write the sidebar manifest
    Sidebar {
        /// Docs directory to scan (defaults to `{content_root}{docs_root}`)
        #[arg(long, value_name = "DIR")]
        docs_dir: Option<PathBuf>,

        /// Output file (defaults to the manifest file inside the docs directory)
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Write `sitemap.xml`
    Sitemap {
        /// Docs directory to scan (defaults to `{content_root}{docs_root}`)
        #[arg(long, value_name = "DIR")]
        docs_dir: Option<PathBuf>,

        /// Output file (defaults to `{content_root}/sitemap.xml`)
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Output format of the selected command, if it has one.
    pub const fn format(&self) -> Option<OutputFormat> {
        match &self.command {
            Commands::Search { format, .. }
            | Commands::Resolve { format, .. }
            | Commands::Index { format, .. } => Some(*format),
            Commands::Cache { .. } | Commands::Generate { .. } => None,
        }
    }
}
