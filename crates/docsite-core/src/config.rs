//! Configuration management for docsite.
//!
//! Configuration is stored in TOML format. Every field has a default, so an
//! absent file (or an absent section) is a valid configuration.
//!
//! ## File Location
//!
//! 1. `$DOCSITE_CONFIG_DIR/config.toml` when the variable is set
//! 2. The platform config directory otherwise:
//!    - Linux: `~/.config/docsite/config.toml`
//!    - macOS: `~/Library/Application Support/dev.docsite.docsite/config.toml`
//!    - Windows: `%APPDATA%\docsite\docsite\config\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [site]
//! name = "Acme Docs"
//! base_url = "https://docs.acme.dev"
//! docs_root = "/docs"
//! manifest_file = "sidebar.json"
//!
//! [search]
//! cache_ttl_hours = 24
//! content_limit = 500
//! threshold = 0.3
//! min_query_chars = 2
//! max_results = 10
//! fetch_concurrency = 8
//!
//! [paths]
//! content_root = "public"
//! ```
//!
//! ```rust
//! use docsite_core::Config;
//!
//! let config: Config = toml::from_str("[search]\nthreshold = 0.2\n")?;
//! assert_eq!(config.search.max_results, 10);
//! config.validate()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "DOCSITE_CONFIG_DIR";

/// Top-level docsite configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub search: SearchConfig,
    pub paths: PathsConfig,
}

/// Where the documentation lives and how it is addressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Display name of the documentation site.
    pub name: String,

    /// Public origin of the site, used for HTTP fetches and sitemap URLs.
    pub base_url: String,

    /// Route prefix of the documentation tree (e.g. `/docs`).
    ///
    /// Manifest paths live under this prefix and it is also the path that
    /// resolves to the root category index.
    pub docs_root: String,

    /// File name of the sidebar manifest inside the docs root.
    pub manifest_file: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Docs".to_string(),
            base_url: "http://localhost:5173".to_string(),
            docs_root: "/docs".to_string(),
            manifest_file: "sidebar.json".to_string(),
        }
    }
}

impl SiteConfig {
    /// Site-relative location of the manifest, e.g. `/docs/sidebar.json`.
    pub fn manifest_path(&self) -> String {
        format!(
            "{}/{}",
            self.docs_root.trim_end_matches('/'),
            self.manifest_file
        )
    }
}

/// Search index and query tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// How long a cached index snapshot stays valid.
    pub cache_ttl_hours: u32,

    /// Maximum characters of plain-text body kept per document.
    pub content_limit: usize,

    /// Fuzzy tolerance on a 0..=1 scale; 0 requires an exact match.
    pub threshold: f64,

    /// Trimmed queries shorter than this return nothing.
    pub min_query_chars: usize,

    /// Results shown to a user per query.
    pub max_results: usize,

    /// Documents fetched concurrently during an index build.
    pub fetch_concurrency: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cache_ttl_hours: 24,
            content_limit: 500,
            threshold: 0.3,
            min_query_chars: 2,
            max_results: 10,
            fetch_concurrency: 8,
        }
    }
}

/// Local filesystem locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory served as the site root; documents live under
    /// `{content_root}{docs_root}`.
    pub content_root: PathBuf,

    /// Directory for the file-backed search cache.
    pub cache_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("public"),
            cache_dir: default_cache_dir(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    directories::ProjectDirs::from("dev", "docsite", "docsite").map_or_else(
        || PathBuf::from(".docsite/cache"),
        |dirs| dirs.data_dir().join("cache"),
    )
}

impl Config {
    /// Load configuration from the default location, or defaults when no
    /// file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined or an
    /// existing file cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails [`Config::validate`].
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file cannot
    /// be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config directory: {e}")))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config: {e}")))?;

        Ok(())
    }

    /// Reject values the search and routing code cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let search = &self.search;

        if !(0.0..=1.0).contains(&search.threshold) {
            return Err(Error::Config(format!(
                "search.threshold must be between 0 and 1, got {}",
                search.threshold
            )));
        }
        if search.fetch_concurrency == 0 {
            return Err(Error::Config(
                "search.fetch_concurrency must be at least 1".into(),
            ));
        }
        if search.content_limit == 0 {
            return Err(Error::Config("search.content_limit must be at least 1".into()));
        }
        if search.max_results == 0 {
            return Err(Error::Config("search.max_results must be at least 1".into()));
        }
        let base = url::Url::parse(&self.site.base_url).map_err(|e| {
            Error::Config(format!("site.base_url '{}' is invalid: {e}", self.site.base_url))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "site.base_url must use http or https, got '{}'",
                base.scheme()
            )));
        }
        if !self.site.docs_root.starts_with('/') {
            return Err(Error::Config(format!(
                "site.docs_root must start with '/', got '{}'",
                self.site.docs_root
            )));
        }
        if self.site.manifest_file.trim().is_empty() {
            return Err(Error::Config("site.manifest_file must not be empty".into()));
        }

        Ok(())
    }

    /// Path of the configuration file honoring [`CONFIG_DIR_ENV`].
    ///
    /// # Errors
    ///
    /// Returns an error if the platform config directory cannot be
    /// determined.
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed).join(CONFIG_FILE_NAME));
            }
        }

        let project_dirs = directories::ProjectDirs::from("dev", "docsite", "docsite")
            .ok_or_else(|| Error::Config("Failed to determine project directories".into()))?;

        Ok(project_dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Directory holding the markdown documents on disk.
    pub fn docs_dir(&self) -> PathBuf {
        self.paths
            .content_root
            .join(self.site.docs_root.trim_start_matches('/'))
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions::from(&self.search)
    }
}

/// Runtime knobs handed to the search index.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub cache_ttl: Duration,
    pub content_limit: usize,
    pub threshold: f64,
    pub min_query_chars: usize,
    pub fetch_concurrency: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            cache_ttl: Duration::from_secs(u64::from(config.cache_ttl_hours) * 3600),
            content_limit: config.content_limit,
            threshold: config.threshold,
            min_query_chars: config.min_query_chars,
            fetch_concurrency: config.fetch_concurrency.max(1),
        }
    }
}
