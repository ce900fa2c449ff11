//! The workflow executor.

use std::sync::{Arc, RwLock};

use pptee_core::error::Result;
use pptee_core::workflow::{FailureInjector, Workflow, WorkflowPlan};
use tokio::sync::mpsc;
use tracing::Instrument;

use crate::event::WorkflowEvent;

/// Runs workflow plans one step at a time.
///
/// Each step begins, then each of its log fragments is appended after an
/// equal share of the step's duration, then the failure injector decides
/// between completion and failure. A failure halts the run.
///
/// Runs are not queued or cancelled. Starting a run replaces the latest
/// snapshot of the previous one.
#[derive(Clone)]
pub struct WorkflowExecutor {
    injector: Arc<dyn FailureInjector>,
    time_scale: f64,
    event_sender: Option<mpsc::UnboundedSender<WorkflowEvent>>,
    latest: Arc<RwLock<Option<WorkflowEvent>>>,
}

impl WorkflowExecutor {
    /// Creates an executor with real-time delays and no event channel.
    pub fn new(injector: Arc<dyn FailureInjector>) -> Self {
        Self {
            injector,
            time_scale: 1.0,
            event_sender: None,
            latest: Arc::new(RwLock::new(None)),
        }
    }

    /// Multiplies every step delay. `0.0` runs without sleeping.
    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Streams a [`WorkflowEvent`] after every transition.
    pub fn with_event_sender(mut self, sender: mpsc::UnboundedSender<WorkflowEvent>) -> Self {
        self.event_sender = Some(sender);
        self
    }

    pub fn set_event_sender(&mut self, sender: Option<mpsc::UnboundedSender<WorkflowEvent>>) {
        self.event_sender = sender;
    }

    /// Snapshot of the most recent transition of the most recent run.
    pub fn latest(&self) -> Option<WorkflowEvent> {
        self.latest
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Runs `plan` to completion or first failure.
    ///
    /// A simulated failure is a successful return whose workflow is in the
    /// `Failed` state.
    ///
    /// # Errors
    ///
    /// Only on an internal state machine violation.
    pub async fn run(&self, plan: &WorkflowPlan) -> Result<Workflow> {
        let workflow = Workflow::from_plan(plan);
        let span = tracing::info_span!(
            "workflow",
            workflow_id = %workflow.id,
            kind = %plan.kind
        );
        self.drive(plan, workflow).instrument(span).await
    }

    async fn drive(&self, plan: &WorkflowPlan, mut workflow: Workflow) -> Result<Workflow> {
        tracing::info!("[Workflow] Starting {} ({} steps)", plan.kind, plan.steps.len());
        self.publish(&workflow);

        if plan.steps.is_empty() {
            workflow.begin_step()?;
            self.publish(&workflow);
            return Ok(workflow);
        }

        for descriptor in &plan.steps {
            workflow.begin_step()?;
            self.publish(&workflow);
            tracing::debug!("[Workflow] Step '{}' processing", descriptor.id);

            let delay = descriptor.sub_stage_delay(self.time_scale);
            if descriptor.log_fragments.is_empty() {
                tokio::time::sleep(delay).await;
            }
            for fragment in &descriptor.log_fragments {
                tokio::time::sleep(delay).await;
                workflow.log(fragment.clone())?;
                self.publish(&workflow);
            }

            if self.injector.should_fail(plan.kind, descriptor) {
                let message = descriptor
                    .failure_message
                    .clone()
                    .unwrap_or_else(|| format!("{} failed", descriptor.label));
                tracing::warn!("[Workflow] Step '{}' failed: {}", descriptor.id, message);
                workflow.fail_step(message)?;
                self.publish(&workflow);
                return Ok(workflow);
            }

            workflow.complete_step()?;
            self.publish(&workflow);
        }

        tracing::info!("[Workflow] {} completed", plan.kind);
        Ok(workflow)
    }

    fn publish(&self, workflow: &Workflow) {
        let event = WorkflowEvent::snapshot(workflow);
        if let Some(sender) = &self.event_sender {
            // The receiver may have gone away; progress is best-effort.
            let _ = sender.send(event.clone());
        }
        *self.latest.write().unwrap_or_else(|e| e.into_inner()) = Some(event);
    }
}
