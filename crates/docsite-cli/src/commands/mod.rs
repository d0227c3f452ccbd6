//! Command implementations for the docsite CLI.

mod cache;
mod generate;
mod index;
mod resolve;
mod search;

pub use cache::clear_cache;
pub use generate::{generate_sidebar, generate_sitemap};
pub use index::build_index;
pub use resolve::resolve;
pub use search::search;
