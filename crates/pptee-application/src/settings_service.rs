//! Settings service.

use std::sync::Arc;

use pptee_core::error::Result;
use pptee_core::session::SessionRepository;
use pptee_core::settings::{PlatformSettings, SettingsRepository};

/// Reads and edits platform settings. Every operation needs a login.
#[derive(Clone)]
pub struct SettingsService {
    session_repository: Arc<dyn SessionRepository>,
    repository: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        repository: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            session_repository,
            repository,
        }
    }

    async fn require_login(&self) -> Result<()> {
        self.session_repository.load().await?.require_authenticated()
    }

    pub async fn show(&self) -> Result<PlatformSettings> {
        self.require_login().await?;
        self.repository.load().await
    }

    /// Validates and persists `settings`. Nothing is written if invalid.
    pub async fn save(&self, settings: &PlatformSettings) -> Result<()> {
        self.require_login().await?;
        settings.validate()?;
        self.repository.save(settings).await?;
        tracing::info!("[Settings] Saved");
        Ok(())
    }

    /// Changes one field by dotted key and saves.
    pub async fn set(&self, key: &str, value: &str) -> Result<PlatformSettings> {
        let mut settings = self.show().await?;
        settings.set(key, value)?;
        self.save(&settings).await?;
        Ok(settings)
    }

    /// Restores and persists the defaults.
    pub async fn reset(&self) -> Result<PlatformSettings> {
        self.require_login().await?;
        let settings = PlatformSettings::default();
        self.repository.save(&settings).await?;
        tracing::info!("[Settings] Reset to defaults");
        Ok(settings)
    }
}
