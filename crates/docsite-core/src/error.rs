//! Error types and handling for docsite-core operations.
//!
//! This module provides the error type shared by every component of the
//! documentation core. Errors are categorized for easier handling and carry
//! a recoverability hint for retry logic.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: reading documents, manifests and cache files from disk
//! - **Network Errors**: HTTP fetches of manifests and documents
//! - **Parse Errors**: frontmatter, manifest JSON, markdown parser setup
//! - **Cache Errors**: cache store reads and writes
//! - **Configuration Errors**: invalid settings or config files
//!
//! Most of these never reach a UI caller: the search index and the router
//! recover locally and log instead. They surface through the document store
//! adapters, configuration loading and the offline generators.
//!
//! ```rust
//! use docsite_core::{Error, Result};
//!
//! fn handle(result: Result<String>) {
//!     match result {
//!         Err(e) if e.is_recoverable() => println!("temporary failure: {e}"),
//!         Err(e) => println!("[{}] {e}", e.category()),
//!         Ok(text) => println!("{} bytes", text.len()),
//!     }
//! }
//! # handle(Ok(String::new()));
//! ```

use thiserror::Error;

/// The main error type for docsite-core operations.
///
/// `Display` gives a user-facing message; `Debug` keeps the full source chain.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers reading documents from a content root, writing generated
    /// manifests and sitemaps, and file-backed cache entries.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    ///
    /// Covers HTTP fetches of the sidebar manifest and markdown documents.
    /// Connection and timeout errors are recoverable, everything else is not.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Parsing operation failed.
    ///
    /// ## Common Causes
    ///
    /// - Manifest JSON that does not match the node shape
    /// - Markdown grammar could not be loaded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Cache store operation failed.
    ///
    /// The cache is an optimization: callers inside the core log these and
    /// continue without caching.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource was not found.
    ///
    /// Returned by document stores for missing documents; the router turns it
    /// into a not-found route.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A requested document path is malformed or escapes the content root.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Serialization or deserialization failed.
    ///
    /// ## Common Causes
    ///
    /// - Corrupted cache payloads
    /// - TOML/JSON/YAML syntax errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error for uncategorized failures, such as sitemap XML writes.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable through retry logic.
    ///
    /// ```rust
    /// use docsite_core::Error;
    /// use std::io;
    ///
    /// assert!(Error::Io(io::Error::new(io::ErrorKind::TimedOut, "slow")).is_recoverable());
    /// assert!(!Error::NotFound("/docs/missing".into()).is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Useful as a structured logging field:
    ///
    /// ```rust
    /// use docsite_core::Error;
    ///
    /// let err = Error::Cache("quota exceeded".into());
    /// tracing::warn!(category = err.category(), "{err}");
    /// assert_eq!(err.category(), "cache");
    /// ```
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::Cache(_) => "cache",
            Self::Config(_) => "config",
            Self::NotFound(_) => "not_found",
            Self::InvalidPath(_) => "invalid_path",
            Self::Serialization(_) => "serialization",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
