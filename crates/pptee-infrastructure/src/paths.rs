//! Path management for PP-TEE data files.
//!
//! Everything the platform persists lives under one root directory:
//!
//! ```text
//! <root>/                      # --home, $PPTEE_HOME, or <config dir>/pptee
//! ├── config.toml              # Application configuration
//! ├── local_storage.json       # Key-value store (session, capabilities, settings, messages)
//! └── logs/                    # Application logs
//!     └── pptee.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

use pptee_core::error::{PpteeError, Result};

/// Environment variable that overrides the root directory.
pub const HOME_ENV: &str = "PPTEE_HOME";

const APP_DIR: &str = "pptee";

/// Resolved locations of every file the platform uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PpteePaths {
    root: PathBuf,
}

impl PpteePaths {
    /// Uses `root` as-is.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves the root: explicit override, then `$PPTEE_HOME`, then the
    /// platform config directory.
    pub fn resolve(override_root: Option<PathBuf>) -> Result<Self> {
        let env_root = std::env::var_os(HOME_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self::resolve_with(override_root, env_root)
    }

    fn resolve_with(override_root: Option<PathBuf>, env_root: Option<PathBuf>) -> Result<Self> {
        if let Some(root) = override_root.or(env_root) {
            return Ok(Self::new(root));
        }
        dirs::config_dir()
            .map(|dir| Self::new(dir.join(APP_DIR)))
            .ok_or_else(|| PpteeError::config("cannot determine the user config directory"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn storage_file(&self) -> PathBuf {
        self.root.join("local_storage.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Creates the root and log directories if needed.
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins_over_env() {
        let paths = PpteePaths::resolve_with(
            Some(PathBuf::from("/tmp/explicit")),
            Some(PathBuf::from("/tmp/from-env")),
        )
        .unwrap();
        assert_eq!(paths.root(), Path::new("/tmp/explicit"));

        let paths = PpteePaths::resolve_with(None, Some(PathBuf::from("/tmp/from-env"))).unwrap();
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/from-env/config.toml"));
    }

    #[test]
    fn test_ensure_dirs() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let paths = PpteePaths::new(temp_dir.path().join("nested"));
        paths.ensure_dirs().unwrap();
        assert!(paths.logs_dir().is_dir());
        assert_eq!(
            paths.storage_file(),
            temp_dir.path().join("nested").join("local_storage.json")
        );
    }
}
