//! docsite CLI - search, routing and site generators for a static
//! documentation tree.

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod output;
mod utils;

use cli::{CacheCommands, Cli, Commands, GenerateCommands};
use utils::context::AppContext;
use utils::logging::initialize_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    let ctx = AppContext::from_cli(&cli)?;
    execute_command(cli.command, &ctx).await
}

async fn execute_command(command: Commands, ctx: &AppContext) -> Result<()> {
    match command {
        Commands::Search {
            query,
            limit,
            format,
        } => commands::search(ctx, &query.join(" "), limit, format).await,

        Commands::Resolve { path, format } => commands::resolve(ctx, &path, format).await,

        Commands::Index { force, format } => commands::build_index(ctx, force, format).await,

        Commands::Cache {
            command: CacheCommands::Clear,
        } => commands::clear_cache(ctx),

        Commands::Generate { command } => match command {
            GenerateCommands::Sidebar { docs_dir, output } => {
                commands::generate_sidebar(ctx, docs_dir, output)
            },
            GenerateCommands::Sitemap { docs_dir, output } => {
                commands::generate_sitemap(ctx, docs_dir, output)
            },
        },
    }
}
