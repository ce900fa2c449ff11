//! Failure injection.
//!
//! Workflow failures are synthetic. The executor asks a `FailureInjector`
//! after each step's sub-stages whether the step fails; tests swap in a
//! deterministic injector.

use rand::Rng;

use super::plan::WorkflowKind;
use super::step::StepDescriptor;

/// Decides whether a step of a running workflow fails.
pub trait FailureInjector: Send + Sync {
    fn should_fail(&self, kind: WorkflowKind, step: &StepDescriptor) -> bool;
}

/// Uniform random failures at failure points, with a rate per workflow kind.
///
/// Capability checks and environment setup share `capability_rate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomFailure {
    pub capability_rate: f64,
    pub inference_rate: f64,
}

impl RandomFailure {
    pub fn new(capability_rate: f64, inference_rate: f64) -> Self {
        Self {
            capability_rate,
            inference_rate,
        }
    }

    pub fn rate_for(&self, kind: WorkflowKind) -> f64 {
        let rate = match kind {
            WorkflowKind::CapabilityCheck | WorkflowKind::EnvironmentSetup => self.capability_rate,
            WorkflowKind::Inference => self.inference_rate,
        };
        if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) }
    }
}

impl Default for RandomFailure {
    fn default() -> Self {
        Self::new(0.1, 0.05)
    }
}

impl FailureInjector for RandomFailure {
    fn should_fail(&self, kind: WorkflowKind, step: &StepDescriptor) -> bool {
        if !step.is_failure_point() {
            return false;
        }
        rand::thread_rng().gen_bool(self.rate_for(kind))
    }
}

/// Never fails. Forces the success path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverFail;

impl FailureInjector for NeverFail {
    fn should_fail(&self, _kind: WorkflowKind, _step: &StepDescriptor) -> bool {
        false
    }
}

/// Always fails the step with the given id, whether or not it is a declared
/// failure point.
#[derive(Debug, Clone)]
pub struct FailAtStep {
    step_id: String,
}

impl FailAtStep {
    pub fn new(step_id: impl Into<String>) -> Self {
        Self {
            step_id: step_id.into(),
        }
    }
}

impl FailureInjector for FailAtStep {
    fn should_fail(&self, _kind: WorkflowKind, step: &StepDescriptor) -> bool {
        step.id == self.step_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure_point() -> StepDescriptor {
        StepDescriptor::new("check", "Check", "", 10).may_fail("unsupported")
    }

    #[test]
    fn test_random_failure_extremes() {
        let always = RandomFailure::new(1.0, 1.0);
        let never = RandomFailure::new(0.0, 0.0);
        for _ in 0..50 {
            assert!(always.should_fail(WorkflowKind::EnvironmentSetup, &failure_point()));
            assert!(!never.should_fail(WorkflowKind::EnvironmentSetup, &failure_point()));
        }
    }

    #[test]
    fn test_random_failure_skips_ordinary_steps() {
        let always = RandomFailure::new(1.0, 1.0);
        let plain = StepDescriptor::new("build", "Build", "", 10);
        assert!(!always.should_fail(WorkflowKind::EnvironmentSetup, &plain));
    }

    #[test]
    fn test_rate_is_clamped() {
        let odd = RandomFailure::new(3.0, f64::NAN);
        assert_eq!(odd.rate_for(WorkflowKind::CapabilityCheck), 1.0);
        assert_eq!(odd.rate_for(WorkflowKind::Inference), 0.0);
    }

    #[test]
    fn test_fail_at_step() {
        let injector = FailAtStep::new("check");
        assert!(injector.should_fail(WorkflowKind::CapabilityCheck, &failure_point()));
        let other = StepDescriptor::new("other", "Other", "", 10);
        assert!(!injector.should_fail(WorkflowKind::CapabilityCheck, &other));
        assert!(!NeverFail.should_fail(WorkflowKind::CapabilityCheck, &failure_point()));
    }
}
