//! Standalone capability check.

use serde::Serialize;
use std::sync::Arc;

use pptee_core::capability::{CapabilityRepository, CapabilityResult, CapabilityTarget};
use pptee_core::error::Result;
use pptee_core::workflow::{Workflow, capability_check_plan};
use pptee_execution::WorkflowExecutor;

use crate::session_usecase::SessionUseCase;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityCheckReport {
    pub target: CapabilityTarget,
    pub workflow: Workflow,
    /// Stored result; `None` when the check failed.
    pub result: Option<CapabilityResult>,
}

#[derive(Clone)]
pub struct CapabilityUseCase {
    session: SessionUseCase,
    capability_repository: Arc<dyn CapabilityRepository>,
    executor: Arc<WorkflowExecutor>,
}

impl CapabilityUseCase {
    pub fn new(
        session: SessionUseCase,
        capability_repository: Arc<dyn CapabilityRepository>,
        executor: Arc<WorkflowExecutor>,
    ) -> Self {
        Self {
            session,
            capability_repository,
            executor,
        }
    }

    /// Probes `target`. On success the canned result replaces any stored
    /// one; on failure the stored value is left untouched.
    pub async fn check_capability(&self, target: CapabilityTarget) -> Result<CapabilityCheckReport> {
        self.session.require_authenticated().await?;

        tracing::info!("[Capability] Checking {}", target.display_name());
        let workflow = self.executor.run(&capability_check_plan(target)).await?;

        let result = if workflow.is_completed() {
            let result = target.simulated_result();
            self.capability_repository.save(target, &result).await?;
            tracing::info!(
                "[Capability] {} supports [{}]",
                target.display_name(),
                result.supported_technologies().join(", ")
            );
            Some(result)
        } else {
            tracing::warn!(
                "[Capability] {} check failed: {}",
                target.display_name(),
                workflow.failure_message().unwrap_or("unknown")
            );
            None
        };

        Ok(CapabilityCheckReport {
            target,
            workflow,
            result,
        })
    }

    pub async fn stored(&self, target: CapabilityTarget) -> Result<Option<CapabilityResult>> {
        self.capability_repository.get(target).await
    }
}
