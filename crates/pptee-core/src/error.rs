//! Error types for the PP-TEE platform.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire PP-TEE backend.
///
/// Simulated workflow failures are not represented here: a failed run is a
/// regular value (see [`crate::workflow::WorkflowState::Failed`]). These variants
/// cover misuse, gate violations and storage problems.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PpteeError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound { entity_type: String, id: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input rejected before anything ran
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation needs a logged-in session
    #[error("Not authenticated: log in first")]
    Unauthenticated,

    /// The operation needs a provisioned TEE environment
    #[error("TEE environment is not ready: run setup first")]
    EnvironmentNotReady,

    /// A workflow transition that the state machine does not allow
    #[error("Invalid workflow transition: {transition} while {from}")]
    InvalidTransition { from: String, transition: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PpteeError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn invalid_transition(from: impl Into<String>, transition: impl Into<String>) -> Self {
        Self::InvalidTransition {
            from: from.into(),
            transition: transition.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from a navigation/session gate.
    pub fn is_gate(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::EnvironmentNotReady)
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PpteeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PpteeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PpteeError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PpteeError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for PpteeError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, PpteeError>`.
pub type Result<T> = std::result::Result<T, PpteeError>;
