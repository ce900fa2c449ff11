//! Dashboard summary.

use serde::Serialize;
use std::sync::Arc;

use pptee_core::catalog::MODELS;
use pptee_core::conversation::ConversationRepository;
use pptee_core::error::Result;
use pptee_core::history::{InferenceRecord, records_from_log, seed_history};
use pptee_core::session::{SessionPhase, SessionRepository};

const RECENT_LIMIT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelUsage {
    pub model_id: String,
    pub model_name: String,
    pub inferences: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub phase: SessionPhase,
    pub environment_ready: bool,
    pub total_inferences: usize,
    pub model_usage: Vec<ModelUsage>,
    pub recent: Vec<InferenceRecord>,
}

#[derive(Clone)]
pub struct DashboardService {
    session_repository: Arc<dyn SessionRepository>,
    conversation_repository: Arc<dyn ConversationRepository>,
}

impl DashboardService {
    pub fn new(
        session_repository: Arc<dyn SessionRepository>,
        conversation_repository: Arc<dyn ConversationRepository>,
    ) -> Self {
        Self {
            session_repository,
            conversation_repository,
        }
    }

    pub async fn summary(&self) -> Result<DashboardSummary> {
        let session = self.session_repository.load().await?;
        session.require_authenticated()?;
        let log = self.conversation_repository.load_all().await?;

        let model_usage = MODELS
            .iter()
            .map(|model| ModelUsage {
                model_id: model.id.to_string(),
                model_name: model.name.to_string(),
                inferences: log.inferences_for(model.id),
            })
            .collect();

        let recent = records_from_log(&log)
            .into_iter()
            .chain(seed_history())
            .take(RECENT_LIMIT)
            .collect();

        Ok(DashboardSummary {
            phase: session.phase(),
            environment_ready: session.environment_ready,
            total_inferences: log.total_inferences(),
            model_usage,
            recent,
        })
    }
}
