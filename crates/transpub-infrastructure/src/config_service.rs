//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml`
//! (`~/.config/transpub/config.toml` unless a path is given).

use crate::paths::{ServiceType, TranspubPaths};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use transpub_core::config::RootConfig;
use transpub_core::{Result, TranspubError};

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the default config file.
    pub fn new_default() -> Result<Self> {
        let path = TranspubPaths::new(None)
            .get_path(ServiceType::Config)
            .map_err(|e| TranspubError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a service reading `path`.
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the root configuration, loading from file if not cached.
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is an error.
    pub fn get_config(&self) -> Result<RootConfig> {
        if let Ok(read_lock) = self.config.read()
            && let Some(cached) = read_lock.as_ref()
        {
            return Ok(cached.clone());
        }

        let loaded = self.load_config()?;

        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut write_lock) = self.config.write() {
            *write_lock = None;
        }
    }

    fn load_config(&self) -> Result<RootConfig> {
        if !self.path.exists() {
            tracing::debug!(
                "[ConfigService] No config at {}, using defaults",
                self.path.display()
            );
            return Ok(RootConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config: RootConfig = toml::from_str(&content).map_err(|e| {
            TranspubError::config(format!(
                "Failed to parse configuration file at {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!("[ConfigService] Loaded config from {}", self.path.display());
        Ok(config)
    }
}
