//! Configuration service.
//!
//! Loads `config.toml` from the application root, creating it with defaults
//! on first use, and caches the result.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use pptee_core::config::PpteeConfig;
use pptee_core::error::Result;

use crate::storage::AtomicFile;

/// Loads and caches [`PpteeConfig`].
#[derive(Debug, Clone)]
pub struct ConfigService {
    file: Arc<AtomicFile<PpteeConfig>>,
    config: Arc<RwLock<Option<PpteeConfig>>>,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicFile::toml(path)),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the configuration, reading the file on first access.
    ///
    /// A missing file is created with defaults. An invalid file is an error.
    pub fn get_config(&self) -> Result<PpteeConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(cached) = read_lock.as_ref() {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_or_create()?;
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    /// Validates and writes `config`, replacing the cached value.
    pub fn save(&self, config: &PpteeConfig) -> Result<()> {
        config.validate()?;
        self.file.save(config)?;
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(config.clone());
        Ok(())
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    fn load_or_create(&self) -> Result<PpteeConfig> {
        match self.file.load()? {
            Some(config) => {
                config.validate()?;
                Ok(config)
            }
            None => {
                let config = PpteeConfig::default();
                self.file.save(&config)?;
                tracing::info!(
                    "[Config] Created default configuration at {}",
                    self.file.path().display()
                );
                Ok(config)
            }
        }
    }
}
