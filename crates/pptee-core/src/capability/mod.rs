//! TEE capability domain module.
//!
//! - `model`: capability results, check targets and the dummy TEE test result
//! - `repository`: persistence of the last result per target

mod model;
mod repository;

pub use model::{CapabilityResult, CapabilityTarget, TeeTestResult};
pub use repository::CapabilityRepository;
