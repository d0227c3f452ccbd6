//! Cache command implementation

use anyhow::Result;
use colored::Colorize;

use crate::utils::context::AppContext;

/// Remove the cached index snapshot.
pub fn clear_cache(ctx: &AppContext) -> Result<()> {
    ctx.search_index()?.clear_cache()?;
    println!(
        "{} Cleared search cache in {}",
        "✓".green(),
        ctx.config.paths.cache_dir.display()
    );
    Ok(())
}
