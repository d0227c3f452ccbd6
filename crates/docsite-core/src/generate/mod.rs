//! Offline generators run ahead of time over a docs directory.
//!
//! Neither generator is used at runtime; they produce the files the runtime
//! reads (`sidebar.json`) or publishes (`sitemap.xml`).
//!
//! ## Example
//!
//! ```rust,no_run
//! use docsite_core::generate::{SidebarGenerator, SitemapGenerator};
//! use std::path::Path;
//!
//! let docs = Path::new("public/docs");
//!
//! let manifest = SidebarGenerator::new(docs, "/docs").write(&docs.join("sidebar.json"))?;
//! println!("{} documents", manifest.file_count());
//!
//! let pages = SitemapGenerator::new(docs, "https://docs.example.com", "/docs")
//!     .write(Path::new("public/sitemap.xml"))?;
//! println!("{pages} pages in sitemap");
//! # Ok::<(), docsite_core::Error>(())
//! ```

mod sidebar;
mod sitemap;

pub use sidebar::{DEFAULT_ORDER, ORDER_FILE, SidebarGenerator};
pub use sitemap::{SitemapEntry, SitemapGenerator};

use std::fs;
use std::path::{Path, PathBuf};

/// Directory entries sorted by file name so output is stable across
/// platforms.
fn sorted_entries(dir: &Path) -> crate::Result<Vec<(PathBuf, fs::FileType)>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| {
            let entry = entry?;
            Ok((entry.path(), entry.file_type()?))
        })
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));
    Ok(entries)
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}
