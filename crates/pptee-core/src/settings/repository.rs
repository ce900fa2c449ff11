//! Settings repository trait.

use async_trait::async_trait;

use super::model::PlatformSettings;
use crate::error::Result;

/// Loads and stores [`PlatformSettings`].
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Stored settings, with defaults for anything missing or unreadable.
    async fn load(&self) -> Result<PlatformSettings>;

    /// Persists `settings`. Callers validate first.
    async fn save(&self, settings: &PlatformSettings) -> Result<()>;
}
