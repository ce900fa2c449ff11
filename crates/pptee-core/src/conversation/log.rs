//! Append-only per-model conversation log.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::message::ConversationMessage;

/// Ordered messages per model id.
///
/// Serialises transparently as the stored JSON map of model id to message
/// array. There is no removal API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationLog {
    histories: BTreeMap<String, Vec<ConversationMessage>>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, model_id: &str, message: ConversationMessage) {
        self.histories
            .entry(model_id.to_string())
            .or_default()
            .push(message);
    }

    /// Messages for `model_id`, oldest first. Empty for unknown models.
    pub fn messages(&self, model_id: &str) -> &[ConversationMessage] {
        self.histories
            .get(model_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn model_ids(&self) -> impl Iterator<Item = &str> {
        self.histories.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ConversationMessage])> {
        self.histories
            .iter()
            .map(|(model_id, messages)| (model_id.as_str(), messages.as_slice()))
    }

    /// Number of user messages across all models.
    pub fn total_inferences(&self) -> usize {
        self.histories
            .values()
            .flatten()
            .filter(|message| message.is_user())
            .count()
    }

    /// Number of user messages for one model.
    pub fn inferences_for(&self, model_id: &str) -> usize {
        self.messages(model_id)
            .iter()
            .filter(|message| message.is_user())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::MessageRole;

    #[test]
    fn test_append_keeps_order_per_model() {
        let mut log = ConversationLog::new();
        log.append("gpt-4", ConversationMessage::user("first"));
        log.append("claude-3", ConversationMessage::user("other"));
        log.append("gpt-4", ConversationMessage::assistant("reply", Vec::new()));

        let gpt = log.messages("gpt-4");
        assert_eq!(gpt.len(), 2);
        assert_eq!(gpt[0].content, "first");
        assert_eq!(gpt[1].role, MessageRole::Assistant);
        assert!(log.messages("llama-3").is_empty());
    }

    #[test]
    fn test_total_inferences_counts_user_messages() {
        let mut log = ConversationLog::new();
        assert_eq!(log.total_inferences(), 0);
        for model in ["gpt-4", "gpt-4", "llama-3"] {
            log.append(model, ConversationMessage::user("q"));
            log.append(model, ConversationMessage::assistant("a", Vec::new()));
        }
        assert_eq!(log.total_inferences(), 3);
        assert_eq!(log.inferences_for("gpt-4"), 2);
    }

    #[test]
    fn test_replay_from_json_reproduces_log() {
        let mut log = ConversationLog::new();
        log.append("gpt-4", ConversationMessage::user("hello"));
        log.append("gpt-4", ConversationMessage::assistant("hi", Vec::new()));

        let stored = serde_json::to_string(&log).unwrap();
        assert!(stored.starts_with("{\"gpt-4\":["));

        let replayed: ConversationLog = serde_json::from_str(&stored).unwrap();
        assert_eq!(replayed, log);
    }
}
