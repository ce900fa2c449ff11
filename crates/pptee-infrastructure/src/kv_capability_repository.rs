//! Capability results stored in the key-value store.

use async_trait::async_trait;
use std::sync::Arc;

use pptee_core::capability::{CapabilityRepository, CapabilityResult, CapabilityTarget};
use pptee_core::error::Result;
use pptee_core::kv::{KeyValueStore, keys};

fn key_for(target: CapabilityTarget) -> &'static str {
    match target {
        CapabilityTarget::Device => keys::DEVICE_CAPABILITY,
        CapabilityTarget::Cloud => keys::CLOUD_CAPABILITY,
    }
}

/// Stores each target's last successful check as JSON `{sgx,sev,tdx,notes}`.
#[derive(Clone)]
pub struct KvCapabilityRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KvCapabilityRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CapabilityRepository for KvCapabilityRepository {
    async fn save(&self, target: CapabilityTarget, result: &CapabilityResult) -> Result<()> {
        let json = serde_json::to_string(result)?;
        self.store.set(key_for(target), json).await
    }

    /// Unreadable stored values are treated as absent.
    async fn get(&self, target: CapabilityTarget) -> Result<Option<CapabilityResult>> {
        let Some(raw) = self.store.get(key_for(target)).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(result) => Ok(Some(result)),
            Err(e) => {
                tracing::warn!(
                    "[Storage] Ignoring unreadable {} capability: {}",
                    target.as_str(),
                    e
                );
                Ok(None)
            }
        }
    }

    async fn clear_all(&self) -> Result<()> {
        self.store.remove(keys::DEVICE_CAPABILITY).await?;
        self.store.remove(keys::CLOUD_CAPABILITY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;

    #[tokio::test]
    async fn test_save_overwrites_previous_result() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let repo = KvCapabilityRepository::new(store.clone());
        let device = CapabilityTarget::Device;

        let stale = CapabilityResult {
            sgx: false,
            sev: false,
            tdx: false,
            notes: "stale".to_string(),
        };
        repo.save(device, &stale).await.unwrap();
        repo.save(device, &device.simulated_result()).await.unwrap();

        assert_eq!(
            repo.get(device).await.unwrap(),
            Some(device.simulated_result())
        );
        assert!(repo.get(CapabilityTarget::Cloud).await.unwrap().is_none());

        let raw = store.get(keys::DEVICE_CAPABILITY).await.unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["tdx"], true);
        assert_eq!(json["notes"], "Intel SGX supported");
    }

    #[tokio::test]
    async fn test_clear_all_and_corrupt_values() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let repo = KvCapabilityRepository::new(store.clone());
        store
            .set(keys::CLOUD_CAPABILITY, "not json".to_string())
            .await
            .unwrap();
        assert!(repo.get(CapabilityTarget::Cloud).await.unwrap().is_none());

        repo.save(CapabilityTarget::Device, &CapabilityTarget::Device.simulated_result())
            .await
            .unwrap();
        repo.clear_all().await.unwrap();
        assert!(store.keys().await.unwrap().is_empty());
    }
}
