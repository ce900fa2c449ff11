//! Session repository trait.

use async_trait::async_trait;

use super::model::Session;
use crate::error::Result;

/// Persists the session flags.
///
/// Implementations read the stored flags once when constructed and write
/// through on every change.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Returns the current session.
    async fn load(&self) -> Result<Session>;

    /// Stores both flags. A `false` flag is removed from storage.
    async fn save(&self, session: Session) -> Result<()>;

    /// Removes both flags.
    async fn clear(&self) -> Result<()>;
}
