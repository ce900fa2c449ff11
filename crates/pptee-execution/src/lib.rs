//! Step-sequence simulator.
//!
//! Drives a [`pptee_core::workflow::Workflow`] through its state machine on a
//! timer cadence and streams a snapshot after every transition.

pub mod event;
pub mod executor;

pub use event::WorkflowEvent;
pub use executor::WorkflowExecutor;
