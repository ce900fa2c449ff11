//! Capability repository trait.

use async_trait::async_trait;

use super::model::{CapabilityResult, CapabilityTarget};
use crate::error::Result;

/// Stores the last capability result per target.
#[async_trait]
pub trait CapabilityRepository: Send + Sync {
    /// Stores `result` for `target`, replacing any previous value.
    async fn save(&self, target: CapabilityTarget, result: &CapabilityResult) -> Result<()>;

    async fn get(&self, target: CapabilityTarget) -> Result<Option<CapabilityResult>>;

    /// Discards the results of both targets.
    async fn clear_all(&self) -> Result<()>;
}
