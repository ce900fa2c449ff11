//! Local key-value storage.
//!
//! All persisted client state lives under a handful of fixed keys. Values are
//! plain strings; structured values are JSON.

use async_trait::async_trait;

use crate::error::Result;

/// Storage keys.
pub mod keys {
    pub const AUTH: &str = "pp-tee-auth";
    pub const ENVIRONMENT: &str = "pp-tee-status";
    pub const DEVICE_CAPABILITY: &str = "pp-tee-device-capability";
    pub const CLOUD_CAPABILITY: &str = "pp-tee-cloud-capability";
    pub const SERVER_IP: &str = "pp-tee-server-ip";
    pub const SERVER_PORT: &str = "pp-tee-server-port";
    pub const API_ENDPOINT: &str = "pp-tee-api-endpoint";
    pub const DEFAULT_TEMPERATURE: &str = "pp-tee-default-temperature";
    pub const DEFAULT_MAX_TOKENS: &str = "pp-tee-default-max-tokens";
    pub const DEFAULT_TOP_P: &str = "pp-tee-default-top-p";
    pub const SETTINGS_EXTRA: &str = "pp-tee-settings";
    pub const MESSAGES: &str = "pp-tee-messages";
    /// Raw copy of an unreadable [`MESSAGES`] value, kept before it is overwritten.
    pub const MESSAGES_BACKUP: &str = "pp-tee-messages-unreadable";

    /// Stored value of [`AUTH`] when logged in.
    pub const AUTH_TRUE: &str = "true";
    /// Stored value of [`ENVIRONMENT`] when provisioned.
    pub const ENVIRONMENT_READY: &str = "ready";
}

/// A string-to-string store shared by every repository.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// All keys, sorted.
    async fn keys(&self) -> Result<Vec<String>>;
}
