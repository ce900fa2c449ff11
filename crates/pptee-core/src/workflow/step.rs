//! Workflow step types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::{PpteeError, Result};

/// Progress status of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Processing,
    Completed,
    /// Terminal; the run halted here.
    Failed,
}

impl StepStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Failed)
    }

    /// Status transitions are monotonic and never skip `Processing`.
    pub fn can_transition_to(self, next: StepStatus) -> bool {
        matches!(
            (self, next),
            (StepStatus::Pending, StepStatus::Processing)
                | (StepStatus::Processing, StepStatus::Completed)
                | (StepStatus::Processing, StepStatus::Failed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Processing => "processing",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of a step: what it is called, how long it pretends to
/// take, and the canned text it produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDescriptor {
    pub id: String,
    pub label: String,
    pub description: String,
    /// Simulated duration of the whole step, spread across its log fragments.
    pub duration_ms: u64,
    /// Canned log lines, appended one per sub-stage.
    pub log_fragments: Vec<String>,
    /// Set on steps that may fail; the text shown when they do.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_preview: Option<String>,
}

impl StepDescriptor {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: description.into(),
            duration_ms,
            log_fragments: Vec::new(),
            failure_message: None,
            encrypted_preview: None,
        }
    }

    pub fn with_logs<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.log_fragments = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Marks this step as a failure point.
    pub fn may_fail(mut self, message: impl Into<String>) -> Self {
        self.failure_message = Some(message.into());
        self
    }

    pub fn with_encrypted_preview(mut self, preview: impl Into<String>) -> Self {
        self.encrypted_preview = Some(preview.into());
        self
    }

    pub fn is_failure_point(&self) -> bool {
        self.failure_message.is_some()
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Delay before each sub-stage, scaled by `time_scale`.
    ///
    /// A step with no log fragments has a single sub-stage.
    pub fn sub_stage_delay(&self, time_scale: f64) -> Duration {
        let stages = self.log_fragments.len().max(1) as u32;
        let scale = if time_scale.is_finite() && time_scale > 0.0 {
            time_scale
        } else {
            0.0
        };
        self.duration().mul_f64(scale) / stages
    }
}

/// A step as observed while a workflow runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub id: String,
    pub label: String,
    pub description: String,
    pub status: StepStatus,
    #[serde(default)]
    pub log_lines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_preview: Option<String>,
}

impl WorkflowStep {
    pub(crate) fn transition(&mut self, next: StepStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(PpteeError::invalid_transition(
                format!("step '{}' is {}", self.id, self.status),
                format!("mark {}", next),
            ));
        }
        self.status = next;
        Ok(())
    }
}

impl From<&StepDescriptor> for WorkflowStep {
    fn from(descriptor: &StepDescriptor) -> Self {
        Self {
            id: descriptor.id.clone(),
            label: descriptor.label.clone(),
            description: descriptor.description.clone(),
            status: StepStatus::Pending,
            log_lines: Vec::new(),
            encrypted_preview: descriptor.encrypted_preview.clone(),
        }
    }
}
