//! Conversation log stored in the key-value store.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use pptee_core::conversation::{ConversationLog, ConversationMessage, ConversationRepository};
use pptee_core::error::Result;
use pptee_core::kv::{KeyValueStore, keys};

/// Keeps the whole log under `pp-tee-messages`.
///
/// The stored map is read on first use and cached; each append writes the
/// full map back.
#[derive(Clone)]
pub struct KvConversationRepository {
    store: Arc<dyn KeyValueStore>,
    cache: Arc<Mutex<Option<ConversationLog>>>,
}

impl KvConversationRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            cache: Arc::new(Mutex::new(None)),
        }
    }

    async fn read_stored(&self) -> Result<ConversationLog> {
        let Some(raw) = self.store.get(keys::MESSAGES).await? else {
            return Ok(ConversationLog::new());
        };
        match serde_json::from_str(&raw) {
            Ok(log) => Ok(log),
            Err(e) => {
                tracing::warn!("[Storage] Stored messages are unreadable, starting empty: {}", e);
                match self.store.set(keys::MESSAGES_BACKUP, raw.clone()).await {
                    Ok(()) => tracing::error!(
                        "[Storage] Unreadable messages copied to '{}'",
                        keys::MESSAGES_BACKUP
                    ),
                    Err(backup_err) => tracing::error!(
                        "[Storage] Could not back up unreadable messages ({}): {}",
                        backup_err,
                        raw
                    ),
                }
                Ok(ConversationLog::new())
            }
        }
    }
}

#[async_trait]
impl ConversationRepository for KvConversationRepository {
    async fn load_all(&self) -> Result<ConversationLog> {
        let mut cache = self.cache.lock().await;
        if let Some(log) = cache.as_ref() {
            return Ok(log.clone());
        }
        let log = self.read_stored().await?;
        *cache = Some(log.clone());
        Ok(log)
    }

    async fn messages(&self, model_id: &str) -> Result<Vec<ConversationMessage>> {
        Ok(self.load_all().await?.messages(model_id).to_vec())
    }

    async fn append(&self, model_id: &str, messages: Vec<ConversationMessage>) -> Result<()> {
        let mut cache = self.cache.lock().await;
        let mut log = match cache.as_ref() {
            Some(log) => log.clone(),
            None => self.read_stored().await?,
        };
        for message in messages {
            log.append(model_id, message);
        }

        self.store
            .set(keys::MESSAGES, serde_json::to_string(&log)?)
            .await?;
        *cache = Some(log);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileKeyValueStore, MemoryKeyValueStore};
    use pptee_core::PpteeError;
    use pptee_core::conversation::MessageRole;
    use tempfile::TempDir;

    /// Reads from an inner store; every write fails.
    struct ReadOnlyStore(MemoryKeyValueStore);

    #[async_trait]
    impl KeyValueStore for ReadOnlyStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key).await
        }

        async fn set(&self, _key: &str, _value: String) -> Result<()> {
            Err(PpteeError::io("disk full"))
        }

        async fn remove(&self, _key: &str) -> Result<()> {
            Err(PpteeError::io("disk full"))
        }

        async fn keys(&self) -> Result<Vec<String>> {
            self.0.keys().await
        }
    }

    #[tokio::test]
    async fn test_failed_write_leaves_log_unchanged() {
        let inner = MemoryKeyValueStore::new();
        let seeded = KvConversationRepository::new(Arc::new(inner.clone()));
        seeded
            .append("gpt-4", vec![ConversationMessage::user("kept")])
            .await
            .unwrap();

        let repo = KvConversationRepository::new(Arc::new(ReadOnlyStore(inner)));
        assert_eq!(repo.messages("gpt-4").await.unwrap().len(), 1);

        let err = repo
            .append("gpt-4", vec![ConversationMessage::user("lost")])
            .await
            .unwrap_err();
        assert!(matches!(err, PpteeError::Io { .. }));

        let messages = repo.messages("gpt-4").await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "kept");
        assert_eq!(repo.load_all().await.unwrap().total_inferences(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_log_is_backed_up_before_overwrite() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store
            .set(keys::MESSAGES, "not json".to_string())
            .await
            .unwrap();
        let repo = KvConversationRepository::new(store.clone());

        assert!(repo.load_all().await.unwrap().is_empty());
        repo.append("gpt-4", vec![ConversationMessage::user("fresh")])
            .await
            .unwrap();

        assert_eq!(
            store.get(keys::MESSAGES_BACKUP).await.unwrap().as_deref(),
            Some("not json")
        );
        assert_eq!(repo.messages("gpt-4").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_append_writes_whole_map() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let repo = KvConversationRepository::new(store.clone());

        repo.append(
            "gpt-4",
            vec![
                ConversationMessage::user("What is a TEE?"),
                ConversationMessage::assistant("An enclave.", Vec::new()),
            ],
        )
        .await
        .unwrap();
        repo.append("llama-3", vec![ConversationMessage::user("Hi")])
            .await
            .unwrap();

        let raw = store.get(keys::MESSAGES).await.unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["gpt-4"].as_array().unwrap().len(), 2);
        assert_eq!(json["gpt-4"][0]["role"], "user");
        assert_eq!(json["llama-3"][0]["content"], "Hi");
    }

    #[tokio::test]
    async fn test_log_replays_after_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("local_storage.json");

        {
            let store = Arc::new(FileKeyValueStore::open(path.clone()).await.unwrap());
            let repo = KvConversationRepository::new(store);
            repo.append(
                "claude-3",
                vec![
                    ConversationMessage::user("first"),
                    ConversationMessage::assistant("second", Vec::new()),
                ],
            )
            .await
            .unwrap();
        }

        let store = Arc::new(FileKeyValueStore::open(path).await.unwrap());
        let repo = KvConversationRepository::new(store);
        let messages = repo.messages("claude-3").await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "first");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert!(repo.messages("gpt-4").await.unwrap().is_empty());
    }
}
