//! The workflow state machine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::plan::{WorkflowKind, WorkflowPlan};
use super::step::{StepStatus, WorkflowStep};
use crate::error::{PpteeError, Result};

/// Where a workflow run currently is.
///
/// Exactly one of `Running`'s `current` step is `Processing`; in every other
/// state no step is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum WorkflowState {
    NotStarted,
    /// `steps[current]` is processing.
    Running { current: usize },
    /// `steps[..=completed]` are done and the next step has not begun.
    Advancing { completed: usize },
    Completed,
    /// `steps[step]` failed; later steps stay pending for this run.
    Failed { step: usize, message: String },
}

impl WorkflowState {
    pub fn is_finished(&self) -> bool {
        matches!(self, WorkflowState::Completed | WorkflowState::Failed { .. })
    }

    fn describe(&self) -> String {
        match self {
            WorkflowState::NotStarted => "not started".to_string(),
            WorkflowState::Running { current } => format!("step {} is running", current),
            WorkflowState::Advancing { completed } => {
                format!("step {} just completed", completed)
            }
            WorkflowState::Completed => "completed".to_string(),
            WorkflowState::Failed { step, .. } => format!("step {} failed", step),
        }
    }
}

/// Input to [`Workflow::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepTransition {
    /// Move the next pending step to processing.
    Begin,
    /// Append a log line to the processing step.
    Log(String),
    /// Mark the processing step completed.
    Complete,
    /// Mark the processing step failed and halt the run.
    Fail(String),
}

impl StepTransition {
    fn name(&self) -> &'static str {
        match self {
            StepTransition::Begin => "begin",
            StepTransition::Log(_) => "log",
            StepTransition::Complete => "complete",
            StepTransition::Fail(_) => "fail",
        }
    }
}

/// A single run of a workflow plan.
///
/// Created fresh per run. To retry after a failure, build a new workflow from
/// the same plan; a failed run never resumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: String,
    pub kind: WorkflowKind,
    pub steps: Vec<WorkflowStep>,
    pub state: WorkflowState,
}

impl Workflow {
    /// Creates a run with every step pending.
    pub fn from_plan(plan: &WorkflowPlan) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: plan.kind,
            steps: plan.steps.iter().map(WorkflowStep::from).collect(),
            state: WorkflowState::NotStarted,
        }
    }

    /// The single transition function of the state machine.
    ///
    /// # Errors
    ///
    /// Returns `PpteeError::InvalidTransition` if `transition` is not allowed in
    /// the current state; the workflow is left unchanged.
    pub fn apply(&mut self, transition: StepTransition) -> Result<()> {
        let rejected = |state: &WorkflowState, transition: &StepTransition| {
            PpteeError::invalid_transition(state.describe(), transition.name())
        };

        match (&self.state, transition) {
            (WorkflowState::NotStarted, StepTransition::Begin) => {
                if self.steps.is_empty() {
                    self.state = WorkflowState::Completed;
                    return Ok(());
                }
                self.step_at(0)?.transition(StepStatus::Processing)?;
                self.state = WorkflowState::Running { current: 0 };
            }
            (WorkflowState::Advancing { completed }, StepTransition::Begin) => {
                let next = completed + 1;
                self.step_at(next)?.transition(StepStatus::Processing)?;
                self.state = WorkflowState::Running { current: next };
            }
            (WorkflowState::Running { current }, StepTransition::Log(line)) => {
                let current = *current;
                self.step_at(current)?.log_lines.push(line);
            }
            (WorkflowState::Running { current }, StepTransition::Complete) => {
                let current = *current;
                self.step_at(current)?.transition(StepStatus::Completed)?;
                self.state = if current + 1 == self.steps.len() {
                    WorkflowState::Completed
                } else {
                    WorkflowState::Advancing { completed: current }
                };
            }
            (WorkflowState::Running { current }, StepTransition::Fail(message)) => {
                let current = *current;
                self.step_at(current)?.transition(StepStatus::Failed)?;
                self.state = WorkflowState::Failed {
                    step: current,
                    message,
                };
            }
            (state, transition) => return Err(rejected(state, &transition)),
        }

        Ok(())
    }

    fn step_at(&mut self, index: usize) -> Result<&mut WorkflowStep> {
        let count = self.steps.len();
        self.steps.get_mut(index).ok_or_else(|| {
            PpteeError::invalid_transition(
                format!("workflow has {} steps", count),
                format!("use step {}", index),
            )
        })
    }

    pub fn begin_step(&mut self) -> Result<()> {
        self.apply(StepTransition::Begin)
    }

    pub fn log(&mut self, line: impl Into<String>) -> Result<()> {
        self.apply(StepTransition::Log(line.into()))
    }

    pub fn complete_step(&mut self) -> Result<()> {
        self.apply(StepTransition::Complete)
    }

    pub fn fail_step(&mut self, message: impl Into<String>) -> Result<()> {
        self.apply(StepTransition::Fail(message.into()))
    }

    /// True if `Begin` would start another step.
    pub fn has_next_step(&self) -> bool {
        match self.state {
            WorkflowState::NotStarted => !self.steps.is_empty(),
            WorkflowState::Advancing { .. } => true,
            _ => false,
        }
    }

    /// Index of the step currently processing, if any.
    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            WorkflowState::Running { current } => Some(current),
            _ => None,
        }
    }

    pub fn current_step(&self) -> Option<&WorkflowStep> {
        self.current_index().and_then(|index| self.steps.get(index))
    }

    pub fn step(&self, id: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|step| step.id == id)
    }

    pub fn is_step_completed(&self, id: &str) -> bool {
        self.step(id)
            .is_some_and(|step| step.status == StepStatus::Completed)
    }

    pub fn is_completed(&self) -> bool {
        self.state == WorkflowState::Completed
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, WorkflowState::Failed { .. })
    }

    /// The canned failure message, if the run failed.
    pub fn failure_message(&self) -> Option<&str> {
        match &self.state {
            WorkflowState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn completed_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.status == StepStatus::Completed)
            .count()
    }

    /// Fraction of steps completed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.steps.is_empty() {
            return if self.is_completed() { 1.0 } else { 0.0 };
        }
        self.completed_count() as f64 / self.steps.len() as f64
    }
}
