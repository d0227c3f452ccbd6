//! Resolved configuration plus the adapters built from it.

use anyhow::{Context, Result};
use docsite_core::{
    CacheStore, Config, DocumentSource, FileCacheStore, FsDocumentStore, HttpDocumentStore,
    SearchIndex,
};
use std::sync::Arc;
use tracing::debug;

use crate::cli::Cli;

/// Configuration with command-line overrides applied.
pub struct AppContext {
    pub config: Config,
    /// Documents come over HTTP from `config.site.base_url`.
    pub remote: bool,
}

impl AppContext {
    /// Load configuration (`--config` or autodiscovery) and apply the global
    /// flags on top.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => Config::load()?,
        };

        if let Some(root) = &cli.content_root {
            config.paths.content_root.clone_from(root);
        }
        if let Some(dir) = &cli.cache_dir {
            config.paths.cache_dir.clone_from(dir);
        }
        if let Some(url) = &cli.base_url {
            config.site.base_url.clone_from(url);
        }
        config.validate()?;

        debug!(
            "Using content root {} and cache dir {}",
            config.paths.content_root.display(),
            config.paths.cache_dir.display()
        );

        Ok(Self {
            config,
            remote: cli.base_url.is_some(),
        })
    }

    pub fn source(&self) -> Result<Arc<dyn DocumentSource>> {
        if self.remote {
            Ok(Arc::new(HttpDocumentStore::new(&self.config.site)?))
        } else {
            Ok(Arc::new(FsDocumentStore::new(
                &self.config.paths.content_root,
                &self.config.site,
            )))
        }
    }

    pub fn cache(&self) -> Result<Arc<dyn CacheStore>> {
        let store = FileCacheStore::new(&self.config.paths.cache_dir).with_context(|| {
            format!(
                "Failed to open cache directory {}",
                self.config.paths.cache_dir.display()
            )
        })?;
        Ok(Arc::new(store))
    }

    pub fn search_index(&self) -> Result<SearchIndex> {
        Ok(SearchIndex::new(
            self.source()?,
            self.cache()?,
            self.config.search_options(),
        ))
    }
}
