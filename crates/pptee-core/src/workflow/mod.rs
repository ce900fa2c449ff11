//! Workflow domain module.
//!
//! A workflow is a fixed, ordered list of named steps driven strictly one at a
//! time: `pending -> processing -> completed`, or `processing -> failed`, which
//! halts the run. Capability checks, environment setup and inference are all
//! instances of the same pattern with different step lists and canned text.
//!
//! # Module Structure
//!
//! - `step`: step status, step descriptors and live steps
//! - `state`: the `Workflow` state machine and its transition function
//! - `plan`: the canned step lists for each workflow kind
//! - `failure`: the failure-injection hook consulted at every step

mod failure;
mod plan;
mod state;
mod step;

pub use failure::{FailAtStep, FailureInjector, NeverFail, RandomFailure};
pub use plan::{
    WorkflowKind, WorkflowPlan, capability_check_plan, environment_setup_plan, inference_plan,
    simulated_ciphertext_preview, step_ids,
};
pub use state::{StepTransition, Workflow, WorkflowState};
pub use step::{StepDescriptor, StepStatus, WorkflowStep};
