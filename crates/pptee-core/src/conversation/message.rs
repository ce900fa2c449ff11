//! Conversation message types.

use serde::{Deserialize, Serialize};

use crate::workflow::WorkflowStep;

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the assistant.
    Assistant,
}

/// A single message in a per-model conversation.
///
/// Never mutated after creation. Assistant messages produced by a completed
/// inference carry the steps of that run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub content: String,
    /// Creation time (RFC 3339).
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<WorkflowStep>>,
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

impl ConversationMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: now_rfc3339(),
            steps: None,
        }
    }

    pub fn assistant(content: impl Into<String>, steps: Vec<WorkflowStep>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: now_rfc3339(),
            steps: Some(steps),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}
