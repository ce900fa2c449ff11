//! Environment setup use case.

use serde::Serialize;
use std::sync::Arc;

use pptee_core::capability::{CapabilityRepository, CapabilityResult, CapabilityTarget};
use pptee_core::error::Result;
use pptee_core::workflow::{Workflow, environment_setup_plan, step_ids};
use pptee_execution::WorkflowExecutor;

use crate::session_usecase::SessionUseCase;

/// Outcome of one setup run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupReport {
    pub workflow: Workflow,
    pub device_capability: Option<CapabilityResult>,
    pub cloud_capability: Option<CapabilityResult>,
    pub environment_ready: bool,
}

/// Provisions the device and cloud TEE environments.
///
/// A failed run leaves the environment not ready; the next attempt starts
/// again from the first step.
#[derive(Clone)]
pub struct SetupUseCase {
    session: SessionUseCase,
    capability_repository: Arc<dyn CapabilityRepository>,
    executor: Arc<WorkflowExecutor>,
}

impl SetupUseCase {
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

    pub async fn run(&self) -> Result<SetupReport> {
        let mut session = self.session.require_authenticated().await?;
        tracing::info!("[Setup] Provisioning TEE environment");

        let workflow = self.executor.run(&environment_setup_plan()).await?;

        for target in [CapabilityTarget::Device, CapabilityTarget::Cloud] {
            if workflow.is_step_completed(step_ids::check_for(target)) {
                self.capability_repository
                    .save(target, &target.simulated_result())
                    .await?;
            }
        }

        if workflow.is_completed() {
            session.mark_environment_ready()?;
            tracing::info!("[Setup] Environment ready");
        } else {
            session.environment_ready = false;
            tracing::warn!(
                "[Setup] Setup failed: {}",
                workflow.failure_message().unwrap_or("unknown")
            );
        }
        self.session.save(session).await?;

        Ok(SetupReport {
            device_capability: self.capability_repository.get(CapabilityTarget::Device).await?,
            cloud_capability: self.capability_repository.get(CapabilityTarget::Cloud).await?,
            environment_ready: session.environment_ready,
            workflow,
        })
    }
}
