//! History service.

use std::sync::Arc;

use pptee_core::conversation::ConversationRepository;
use pptee_core::error::Result;
use pptee_core::history::{
    HistoryFilter, HistorySummary, InferenceRecord, filter_history, records_from_log,
    seed_history,
};
use pptee_core::session::SessionRepository;

#[derive(Clone)]
pub struct HistoryService {
    session_repository: Arc<dyn SessionRepository>,
    conversation_repository: Arc<dyn ConversationRepository>,
}

impl HistoryService {
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        conversation_repository: Arc<dyn ConversationRepository>,
    ) -> Self {
        Self {
            session_repository,
            conversation_repository,
        }
    }

    /// Recorded inferences (newest first) followed by the sample records.
    pub async fn all(&self) -> Result<Vec<InferenceRecord>> {
        self.session_repository.load().await?.require_authenticated()?;
        let log = self.conversation_repository.load_all().await?;
        let mut records = records_from_log(&log);
        records.extend(seed_history());
        Ok(records)
    }

    pub async fn list(&self, filter: &HistoryFilter) -> Result<Vec<InferenceRecord>> {
        Ok(filter_history(&self.all().await?, filter))
    }

    pub async fn summary(&self, filter: &HistoryFilter) -> Result<HistorySummary> {
        Ok(HistorySummary::from_records(&self.list(filter).await?))
    }
}
