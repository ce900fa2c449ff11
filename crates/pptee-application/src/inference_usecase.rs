//! Inference use case.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use pptee_core::catalog::require_model;
use pptee_core::conversation::{ConversationMessage, ConversationRepository, simulated_response};
use pptee_core::error::{PpteeError, Result};
use pptee_core::workflow::{Workflow, inference_plan};
use pptee_execution::WorkflowExecutor;

use crate::session_usecase::SessionUseCase;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceOutcome {
    pub model_id: String,
    pub workflow: Workflow,
    /// The assistant reply; `None` when the run failed.
    pub response: Option<String>,
}

/// Runs a simulated private inference and records the exchange.
#[derive(Clone)]
pub struct InferenceUseCase {
    session: SessionUseCase,
    conversation_repository: Arc<dyn ConversationRepository>,
    executor: Arc<WorkflowExecutor>,
    response_delay: Duration,
}

impl InferenceUseCase {
    pub fn new(
        session: SessionUseCase,
        conversation_repository: Arc<dyn ConversationRepository>,
        executor: Arc<WorkflowExecutor>,
        response_delay: Duration,
    ) -> Self {
        Self {
            session,
            conversation_repository,
            executor,
            response_delay,
        }
    }

    /// Sends `query` to `model_id`.
    ///
    /// On completion the user message and the assistant message (carrying the
    /// completed steps) are appended to the model's history. A failed run
    /// appends nothing.
    pub async fn infer(&self, model_id: &str, query: &str) -> Result<InferenceOutcome> {
        let model = require_model(model_id)?;
        if query.trim().is_empty() {
            return Err(PpteeError::validation("query must not be empty"));
        }
        self.session.require_environment_ready().await?;

        let question = ConversationMessage::user(query);
        let response = simulated_response(query, model.name);

        tracing::info!("[Inference] Running {} inference", model.name);
        let workflow = self
            .executor
            .run(&inference_plan(query, &response))
            .await?;

        if !workflow.is_completed() {
            tracing::warn!(
                "[Inference] {} inference failed: {}",
                model.name,
                workflow.failure_message().unwrap_or("unknown")
            );
            return Ok(InferenceOutcome {
                model_id: model.id.to_string(),
                workflow,
                response: None,
            });
        }

        tokio::time::sleep(self.response_delay).await;

        let answer = ConversationMessage::assistant(response.clone(), workflow.steps.clone());
        self.conversation_repository
            .append(model.id, vec![question, answer])
            .await?;
        tracing::info!("[Inference] {} response recorded", model.name);

        Ok(InferenceOutcome {
            model_id: model.id.to_string(),
            workflow,
            response: Some(response),
        })
    }

    /// The stored conversation with `model_id`, oldest first.
    pub async fn messages(&self, model_id: &str) -> Result<Vec<ConversationMessage>> {
        let model = require_model(model_id)?;
        self.conversation_repository.messages(model.id).await
    }
}
