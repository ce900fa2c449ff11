//! Platform settings model.
//!
//! Settings are editable preferences. Nothing in the platform consumes them:
//! the server address is stored, never dialed, and the inference defaults do
//! not change the simulated response.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::error::{PpteeError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerSettings {
    pub ip: String,
    pub port: u16,
    pub api_endpoint: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            ip: "192.168.1.100".to_string(),
            port: 8443,
            api_endpoint: "https://api.example.com".to_string(),
        }
    }
}

impl ServerSettings {
    /// `ip:port`, or `None` when no address is stored.
    pub fn target(&self) -> Option<String> {
        let ip = self.ip.trim();
        (!ip.is_empty()).then(|| format!("{}:{}", ip, self.port))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InferenceDefaults {
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
    pub streaming: bool,
}

impl Default for InferenceDefaults {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2048,
            top_p: 0.9,
            streaming: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecuritySettings {
    pub encryption_algorithm: String,
    pub key_rotation_days: u32,
    pub hash_algorithm: String,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            encryption_algorithm: "AES-256-GCM".to_string(),
            key_rotation_days: 30,
            hash_algorithm: "SHA-384".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RagSettings {
    pub enabled: bool,
    pub embedding_model: String,
    pub chunk_size: u32,
    pub top_k: u32,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            embedding_model: "text-embedding-ada-002".to_string(),
            chunk_size: 512,
            top_k: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationSettings {
    pub inference_complete: bool,
    pub security_alerts: bool,
    pub system_updates: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            inference_complete: true,
            security_alerts: true,
            system_updates: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "User".to_string(),
            email: "user@example.com".to_string(),
        }
    }
}

/// Every user-editable setting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlatformSettings {
    pub server: ServerSettings,
    pub inference: InferenceDefaults,
    pub security: SecuritySettings,
    pub rag: RagSettings,
    pub notifications: NotificationSettings,
    pub profile: UserProfile,
}

fn parse_field<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| PpteeError::validation(format!("{}: cannot parse '{}': {}", key, value, e)))
}

fn check_range<T>(key: &str, value: T, min: T, max: T) -> Result<()>
where
    T: PartialOrd + Display + Copy,
{
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(PpteeError::validation(format!(
            "{} must be between {} and {}, got {}",
            key, min, max, value
        )))
    }
}

impl PlatformSettings {
    /// Dotted names accepted by [`PlatformSettings::set`].
    pub const KEYS: [&'static str; 19] = [
        "server.ip",
        "server.port",
        "server.api_endpoint",
        "inference.temperature",
        "inference.max_tokens",
        "inference.top_p",
        "inference.streaming",
        "security.encryption_algorithm",
        "security.key_rotation_days",
        "security.hash_algorithm",
        "rag.enabled",
        "rag.embedding_model",
        "rag.chunk_size",
        "rag.top_k",
        "notifications.inference_complete",
        "notifications.security_alerts",
        "notifications.system_updates",
        "profile.name",
        "profile.email",
    ];

    pub fn validate(&self) -> Result<()> {
        if self.server.ip.trim().is_empty() {
            return Err(PpteeError::validation("server.ip must not be empty"));
        }
        if self.server.port == 0 {
            return Err(PpteeError::validation("server.port must be between 1 and 65535"));
        }
        if self.server.api_endpoint.trim().is_empty() {
            return Err(PpteeError::validation("server.api_endpoint must not be empty"));
        }
        check_range(
            "inference.temperature",
            self.inference.temperature,
            0.0,
            2.0,
        )?;
        check_range("inference.max_tokens", self.inference.max_tokens, 1, 32000)?;
        check_range("inference.top_p", self.inference.top_p, 0.0, 1.0)?;
        check_range(
            "security.key_rotation_days",
            self.security.key_rotation_days,
            1,
            365,
        )?;
        check_range("rag.chunk_size", self.rag.chunk_size, 128, 2048)?;
        check_range("rag.top_k", self.rag.top_k, 1, 20)?;
        Ok(())
    }

    /// Sets one field by dotted name. Parses but does not validate ranges.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server.ip" => self.server.ip = value.trim().to_string(),
            "server.port" => self.server.port = parse_field(key, value)?,
            "server.api_endpoint" => self.server.api_endpoint = value.trim().to_string(),
            "inference.temperature" => self.inference.temperature = parse_field(key, value)?,
            "inference.max_tokens" => self.inference.max_tokens = parse_field(key, value)?,
            "inference.top_p" => self.inference.top_p = parse_field(key, value)?,
            "inference.streaming" => self.inference.streaming = parse_field(key, value)?,
            "security.encryption_algorithm" => {
                self.security.encryption_algorithm = value.trim().to_string()
            }
            "security.key_rotation_days" => {
                self.security.key_rotation_days = parse_field(key, value)?
            }
            "security.hash_algorithm" => self.security.hash_algorithm = value.trim().to_string(),
            "rag.enabled" => self.rag.enabled = parse_field(key, value)?,
            "rag.embedding_model" => self.rag.embedding_model = value.trim().to_string(),
            "rag.chunk_size" => self.rag.chunk_size = parse_field(key, value)?,
            "rag.top_k" => self.rag.top_k = parse_field(key, value)?,
            "notifications.inference_complete" => {
                self.notifications.inference_complete = parse_field(key, value)?
            }
            "notifications.security_alerts" => {
                self.notifications.security_alerts = parse_field(key, value)?
            }
            "notifications.system_updates" => {
                self.notifications.system_updates = parse_field(key, value)?
            }
            "profile.name" => self.profile.name = value.to_string(),
            "profile.email" => self.profile.email = value.trim().to_string(),
            other => return Err(PpteeError::not_found("setting", other)),
        }
        Ok(())
    }

    /// Flattened `(dotted key, value)` pairs in [`Self::KEYS`] order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let values = [
            self.server.ip.clone(),
            self.server.port.to_string(),
            self.server.api_endpoint.clone(),
            self.inference.temperature.to_string(),
            self.inference.max_tokens.to_string(),
            self.inference.top_p.to_string(),
            self.inference.streaming.to_string(),
            self.security.encryption_algorithm.clone(),
            self.security.key_rotation_days.to_string(),
            self.security.hash_algorithm.clone(),
            self.rag.enabled.to_string(),
            self.rag.embedding_model.clone(),
            self.rag.chunk_size.to_string(),
            self.rag.top_k.to_string(),
            self.notifications.inference_complete.to_string(),
            self.notifications.security_alerts.to_string(),
            self.notifications.system_updates.to_string(),
            self.profile.name.clone(),
            self.profile.email.clone(),
        ];
        Self::KEYS.into_iter().zip(values).collect()
    }
}
