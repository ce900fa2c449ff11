//! Platform settings stored in the key-value store.
//!
//! Six fields keep their historical individual string keys. The remaining
//! sections are stored together as one JSON value.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use pptee_core::error::Result;
use pptee_core::kv::{KeyValueStore, keys};
use pptee_core::settings::{
    NotificationSettings, PlatformSettings, RagSettings, SecuritySettings, SettingsRepository,
    UserProfile,
};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ExtraSettings {
    streaming: Option<bool>,
    security: SecuritySettings,
    rag: RagSettings,
    notifications: NotificationSettings,
    profile: UserProfile,
}

#[derive(Clone)]
pub struct KvSettingsRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvSettingsRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Parses `key` into `target`, keeping the current value when the stored
    /// string is missing or malformed.
    async fn read_into<T: FromStr>(&self, key: &str, target: &mut T) -> Result<()> {
        if let Some(raw) = self.store.get(key).await? {
            match raw.trim().parse::<T>() {
                Ok(value) => *target = value,
                Err(_) => tracing::warn!("[Storage] Ignoring malformed {} = '{}'", key, raw),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for KvSettingsRepository {
    async fn load(&self) -> Result<PlatformSettings> {
        let mut settings = PlatformSettings::default();

        if let Some(ip) = self.store.get(keys::SERVER_IP).await? {
            settings.server.ip = ip;
        }
        self.read_into(keys::SERVER_PORT, &mut settings.server.port)
            .await?;
        if let Some(endpoint) = self.store.get(keys::API_ENDPOINT).await? {
            settings.server.api_endpoint = endpoint;
        }
        self.read_into(keys::DEFAULT_TEMPERATURE, &mut settings.inference.temperature)
            .await?;
        self.read_into(keys::DEFAULT_MAX_TOKENS, &mut settings.inference.max_tokens)
            .await?;
        self.read_into(keys::DEFAULT_TOP_P, &mut settings.inference.top_p)
            .await?;

        if let Some(raw) = self.store.get(keys::SETTINGS_EXTRA).await? {
            match serde_json::from_str::<ExtraSettings>(&raw) {
                Ok(extra) => {
                    if let Some(streaming) = extra.streaming {
                        settings.inference.streaming = streaming;
                    }
                    settings.security = extra.security;
                    settings.rag = extra.rag;
                    settings.notifications = extra.notifications;
                    settings.profile = extra.profile;
                }
                Err(e) => tracing::warn!("[Storage] Ignoring unreadable extra settings: {}", e),
            }
        }

        Ok(settings)
    }

    async fn save(&self, settings: &PlatformSettings) -> Result<()> {
        let fields = [
            (keys::SERVER_IP, settings.server.ip.clone()),
            (keys::SERVER_PORT, settings.server.port.to_string()),
            (keys::API_ENDPOINT, settings.server.api_endpoint.clone()),
            (
                keys::DEFAULT_TEMPERATURE,
                settings.inference.temperature.to_string(),
            ),
            (
                keys::DEFAULT_MAX_TOKENS,
                settings.inference.max_tokens.to_string(),
            ),
            (keys::DEFAULT_TOP_P, settings.inference.top_p.to_string()),
        ];
        for (key, value) in fields {
            self.store.set(key, value).await?;
        }

        let extra = ExtraSettings {
            streaming: Some(settings.inference.streaming),
            security: settings.security.clone(),
            rag: settings.rag.clone(),
            notifications: settings.notifications.clone(),
            profile: settings.profile.clone(),
        };
        self.store
            .set(keys::SETTINGS_EXTRA, serde_json::to_string(&extra)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;

    #[tokio::test]
    async fn test_empty_store_yields_defaults() {
        let repo = KvSettingsRepository::new(Arc::new(MemoryKeyValueStore::new()));
        assert_eq!(repo.load().await.unwrap(), PlatformSettings::default());
    }

    #[tokio::test]
    async fn test_save_uses_string_keys() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let repo = KvSettingsRepository::new(store.clone());

        let mut settings = PlatformSettings::default();
        settings.set("server.port", "9443").unwrap();
        settings.set("inference.top_p", "0.5").unwrap();
        settings.set("rag.enabled", "true").unwrap();
        settings.set("inference.streaming", "false").unwrap();
        repo.save(&settings).await.unwrap();

        assert_eq!(
            store.get(keys::SERVER_PORT).await.unwrap().as_deref(),
            Some("9443")
        );
        assert_eq!(
            store.get(keys::DEFAULT_TOP_P).await.unwrap().as_deref(),
            Some("0.5")
        );
        assert_eq!(repo.load().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_malformed_values_fall_back() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store
            .set(keys::DEFAULT_MAX_TOKENS, "lots".to_string())
            .await
            .unwrap();
        store
            .set(keys::SERVER_IP, "10.1.2.3".to_string())
            .await
            .unwrap();
        store
            .set(keys::SETTINGS_EXTRA, "not json".to_string())
            .await
            .unwrap();

        let settings = KvSettingsRepository::new(store).load().await.unwrap();
        assert_eq!(settings.inference.max_tokens, 2048);
        assert_eq!(settings.server.ip, "10.1.2.3");
        assert_eq!(settings.rag, RagSettings::default());
    }
}
