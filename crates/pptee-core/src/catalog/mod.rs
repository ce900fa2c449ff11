//! Model catalog.
//!
//! The set of models a user can run is fixed. Models stay locked until the TEE
//! environment is provisioned.

use serde::{Deserialize, Serialize};

use crate::error::{PpteeError, Result};
use crate::session::Session;

/// A selectable LLM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Model {
    pub id: &'static str,
    pub name: &'static str,
    pub provider: &'static str,
    pub description: &'static str,
}

pub const MODELS: [Model; 3] = [
    Model {
        id: "gpt-4",
        name: "GPT-4",
        provider: "OpenAI",
        description: "Advanced language model tuned for complex reasoning and creative work",
    },
    Model {
        id: "claude-3",
        name: "Claude-3",
        provider: "Anthropic",
        description: "Safe and accurate model that handles long contexts",
    },
    Model {
        id: "llama-3",
        name: "Llama-3",
        provider: "Meta",
        description: "Open-source model suited to a wide range of tasks",
    },
];

/// Looks up a model by id.
pub fn find_model(id: &str) -> Option<&'static Model> {
    MODELS.iter().find(|model| model.id == id)
}

/// Like [`find_model`], but unknown ids are an error.
pub fn require_model(id: &str) -> Result<&'static Model> {
    find_model(id).ok_or_else(|| PpteeError::not_found("model", id))
}

/// A catalog entry as seen by a given session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelAvailability {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub description: String,
    pub locked: bool,
}

/// Every model, locked unless the environment is ready.
pub fn availability(session: &Session) -> Vec<ModelAvailability> {
    let locked = !session.environment_ready;
    MODELS
        .iter()
        .map(|model| ModelAvailability {
            id: model.id.to_string(),
            name: model.name.to_string(),
            provider: model.provider.to_string(),
            description: model.description.to_string(),
            locked,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_model() {
        assert_eq!(find_model("claude-3").map(|m| m.name), Some("Claude-3"));
        assert!(find_model("gpt-5").is_none());
        assert!(require_model("gpt-5").unwrap_err().is_not_found());
    }

    #[test]
    fn test_models_locked_until_ready() {
        let mut session = Session::new();
        session.login();
        assert!(availability(&session).iter().all(|m| m.locked));

        session.mark_environment_ready().unwrap();
        let models = availability(&session);
        assert_eq!(models.len(), 3);
        assert!(models.iter().all(|m| !m.locked));
    }
}
