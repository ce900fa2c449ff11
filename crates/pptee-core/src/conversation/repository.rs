//! Conversation repository trait.

use async_trait::async_trait;

use super::log::ConversationLog;
use super::message::ConversationMessage;
use crate::error::Result;

/// Persists the conversation log.
///
/// Implementations read the stored log once and write the whole log back on
/// every append. There is no batching and no transactional guarantee.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn load_all(&self) -> Result<ConversationLog>;

    async fn messages(&self, model_id: &str) -> Result<Vec<ConversationMessage>>;

    /// Appends `messages` to the end of `model_id`'s history, in order.
    async fn append(&self, model_id: &str, messages: Vec<ConversationMessage>) -> Result<()>;
}
