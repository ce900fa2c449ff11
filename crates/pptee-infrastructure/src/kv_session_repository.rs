//! Session flags stored in the key-value store.

use async_trait::async_trait;
use std::sync::Arc;

use pptee_core::error::Result;
use pptee_core::kv::{KeyValueStore, keys};
use pptee_core::session::{Session, SessionRepository};

/// Persists the two session flags under `pp-tee-auth` and `pp-tee-status`.
///
/// A cleared flag is removed rather than stored as `false`.
#[derive(Clone)]
pub struct KvSessionRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvSessionRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn write_flag(&self, key: &str, on: bool, value: &str) -> Result<()> {
        if on {
            self.store.set(key, value.to_string()).await
        } else {
            self.store.remove(key).await
        }
    }
}

#[async_trait]
impl SessionRepository for KvSessionRepository {
    async fn load(&self) -> Result<Session> {
        let authenticated =
            self.store.get(keys::AUTH).await?.as_deref() == Some(keys::AUTH_TRUE);
        let environment_ready =
            self.store.get(keys::ENVIRONMENT).await?.as_deref() == Some(keys::ENVIRONMENT_READY);

        if environment_ready && !authenticated {
            tracing::warn!(
                "[Session] Stored environment flag without a login; treating environment as not ready"
            );
        }

        Ok(Session::from_flags(authenticated, environment_ready))
    }

    async fn save(&self, session: Session) -> Result<()> {
        self.write_flag(keys::AUTH, session.authenticated, keys::AUTH_TRUE)
            .await?;
        self.write_flag(
            keys::ENVIRONMENT,
            session.environment_ready,
            keys::ENVIRONMENT_READY,
        )
        .await
    }

    async fn clear(&self) -> Result<()> {
        self.store.remove(keys::AUTH).await?;
        self.store.remove(keys::ENVIRONMENT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;
    use pptee_core::session::SessionPhase;

    #[tokio::test]
    async fn test_save_and_load_flags() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let repo = KvSessionRepository::new(store.clone());
        assert_eq!(repo.load().await.unwrap().phase(), SessionPhase::Idle);

        let mut session = Session::new();
        session.login();
        session.mark_environment_ready().unwrap();
        repo.save(session).await.unwrap();

        assert_eq!(store.get(keys::AUTH).await.unwrap().as_deref(), Some("true"));
        assert_eq!(
            store.get(keys::ENVIRONMENT).await.unwrap().as_deref(),
            Some("ready")
        );
        assert_eq!(repo.load().await.unwrap().phase(), SessionPhase::EnvReady);

        repo.clear().await.unwrap();
        assert!(store.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_orphan_environment_flag_is_ignored() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store
            .set(keys::ENVIRONMENT, keys::ENVIRONMENT_READY.to_string())
            .await
            .unwrap();
        let repo = KvSessionRepository::new(store);
        let session = repo.load().await.unwrap();
        assert!(!session.authenticated);
        assert!(!session.environment_ready);
    }

    #[tokio::test]
    async fn test_unexpected_values_read_as_unset() {
        let store = Arc::new(MemoryKeyValueStore::new());
        store.set(keys::AUTH, "yes".to_string()).await.unwrap();
        let repo = KvSessionRepository::new(store);
        assert!(!repo.load().await.unwrap().authenticated);
    }
}
