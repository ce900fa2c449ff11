//! Workflow progress events.

use pptee_core::workflow::{Workflow, WorkflowKind, WorkflowState, WorkflowStep};
use serde::Serialize;

/// A full snapshot of a workflow run, emitted after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEvent {
    pub workflow_id: String,
    pub kind: WorkflowKind,
    pub state: WorkflowState,
    pub steps: Vec<WorkflowStep>,
    /// RFC 3339 emission time.
    pub timestamp: String,
}

impl WorkflowEvent {
    pub fn snapshot(workflow: &Workflow) -> Self {
        Self {
            workflow_id: workflow.id.clone(),
            kind: workflow.kind,
            state: workflow.state.clone(),
            steps: workflow.steps.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// The step processing at snapshot time, if any.
    pub fn current_step(&self) -> Option<&WorkflowStep> {
        match self.state {
            WorkflowState::Running { current } => self.steps.get(current),
            _ => None,
        }
    }
}
