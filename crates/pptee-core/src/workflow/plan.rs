//! Canned workflow plans.
//!
//! Each plan is the ordered step list of one simulated backend interaction.
//! Durations are the nominal delays at time scale 1.0; the log fragments name the
//! backend commands a real implementation would call.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::step::StepDescriptor;
use crate::capability::CapabilityTarget;

/// The three kinds of simulated backend interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    CapabilityCheck,
    EnvironmentSetup,
    Inference,
}

impl WorkflowKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowKind::CapabilityCheck => "capability_check",
            WorkflowKind::EnvironmentSetup => "environment_setup",
            WorkflowKind::Inference => "inference",
        }
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered list of step descriptors for one workflow kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowPlan {
    pub kind: WorkflowKind,
    pub steps: Vec<StepDescriptor>,
}

impl WorkflowPlan {
    pub fn descriptor(&self, id: &str) -> Option<&StepDescriptor> {
        self.steps.iter().find(|step| step.id == id)
    }
}

/// Step identifiers shared by plans and the use cases that inspect results.
pub mod step_ids {
    pub const DEVICE_CHECK: &str = "device-check";
    pub const DEVICE_BUILD: &str = "device-build";
    pub const CLOUD_CHECK: &str = "cloud-check";
    pub const CLOUD_BUILD: &str = "cloud-build";
    pub const FINALIZE: &str = "finalize";

    pub const ENCRYPT_QUERY: &str = "encrypt-query";
    pub const TRANSMIT_QUERY: &str = "transmit-query";
    pub const CLOUD_DECRYPT: &str = "cloud-decrypt";
    pub const RAG_INFERENCE: &str = "rag-inference";
    pub const ENCRYPT_RESULT: &str = "encrypt-result";
    pub const DEVICE_DECRYPT: &str = "device-decrypt";

    /// Id of the check step for a capability target.
    pub fn check_for(target: crate::capability::CapabilityTarget) -> &'static str {
        match target {
            crate::capability::CapabilityTarget::Device => DEVICE_CHECK,
            crate::capability::CapabilityTarget::Cloud => CLOUD_CHECK,
        }
    }
}

fn unsupported_message(target: CapabilityTarget) -> String {
    format!("{} environment is not supported", target.display_name())
}

fn check_step(target: CapabilityTarget) -> StepDescriptor {
    let result = target.simulated_result();
    StepDescriptor::new(
        step_ids::check_for(target),
        format!("{} check", target.display_name()),
        format!("Inspects the {} TEE environment", target.as_str()),
        2000,
    )
    .with_logs([
        format!("cmd_check_{}_capability: probing SGX / SEV / TDX", target.as_str()),
        format!(
            "supported: [{}] ({})",
            result.supported_technologies().join(", "),
            result.notes
        ),
    ])
    .may_fail(unsupported_message(target))
}

fn dummy_test_step(id: &str, target: CapabilityTarget, label: String) -> StepDescriptor {
    let test = target.simulated_test();
    StepDescriptor::new(
        id,
        label,
        format!("Sets up the secure environment on the {}", target.as_str()),
        2000,
    )
    .with_logs([
        format!("cmd_run_dummy_tee_test: tee_type={}", test.tee_type),
        test.stdout.clone(),
        test.summary(),
    ])
}

/// Two-step capability check for one target: probe, then dummy TEE test.
pub fn capability_check_plan(target: CapabilityTarget) -> WorkflowPlan {
    WorkflowPlan {
        kind: WorkflowKind::CapabilityCheck,
        steps: vec![
            check_step(target),
            dummy_test_step(
                &format!("{}-tee-test", target.as_str()),
                target,
                format!("{} dummy test", target.display_name()),
            ),
        ],
    }
}

/// Five-step environment provisioning: device check and build, cloud check
/// and build, final preparation. Either check may fail.
pub fn environment_setup_plan() -> WorkflowPlan {
    let device = CapabilityTarget::Device;
    let cloud = CapabilityTarget::Cloud;
    WorkflowPlan {
        kind: WorkflowKind::EnvironmentSetup,
        steps: vec![
            check_step(device),
            dummy_test_step(
                step_ids::DEVICE_BUILD,
                device,
                "Device TEE build".to_string(),
            ),
            check_step(cloud),
            dummy_test_step(step_ids::CLOUD_BUILD, cloud, "Cloud TEE build".to_string()),
            StepDescriptor::new(
                step_ids::FINALIZE,
                "Environment ready",
                "All secure environments are prepared",
                2000,
            )
            .with_logs([
                "cmd_prepare_environment: OK",
                "state transition: LoggedIn -> EnvReady",
            ]),
        ],
    }
}

/// Simulated ciphertext preview: a tagged, truncated base64 of the text.
///
/// This is display text only. Nothing is encrypted.
pub fn simulated_ciphertext_preview(tag: &str, plaintext: &str) -> String {
    const PREVIEW_CHARS: usize = 24;
    let encoded = STANDARD.encode(plaintext.as_bytes());
    let mut preview: String = encoded.chars().take(PREVIEW_CHARS).collect();
    if encoded.len() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    format!("{}({})", tag, preview)
}

/// Six-step inference round trip for `query`. `response` is only used for the
/// preview shown on the result encryption step.
pub fn inference_plan(query: &str, response: &str) -> WorkflowPlan {
    WorkflowPlan {
        kind: WorkflowKind::Inference,
        steps: vec![
            StepDescriptor::new(
                step_ids::ENCRYPT_QUERY,
                "Encrypt query in Device TEE",
                "Seal the user query with key A",
                800,
            )
            .with_logs(["cmd_submit_input: query received", "enc_A(q) computed"])
            .with_encrypted_preview(simulated_ciphertext_preview("enc_A", query)),
            StepDescriptor::new(
                step_ids::TRANSMIT_QUERY,
                "Send encrypted query",
                "Transfer the sealed query over the secure channel",
                800,
            )
            .with_logs(["secure channel established", "enc_A(q) sent to Cloud TEE"]),
            StepDescriptor::new(
                step_ids::CLOUD_DECRYPT,
                "Decrypt in Cloud TEE",
                "Recover the query inside the cloud enclave",
                800,
            )
            .with_logs(["dec_A(enc_A(q)) inside enclave"]),
            StepDescriptor::new(
                step_ids::RAG_INFERENCE,
                "RAG processing and model inference",
                "Retrieve context and run the model inside the enclave",
                800,
            )
            .with_logs(["cmd_start_task: RAG retrieval", "model inference"])
            .may_fail("Model inference failed inside the Cloud TEE"),
            StepDescriptor::new(
                step_ids::ENCRYPT_RESULT,
                "Encrypt and return result",
                "Double-encrypt the response and send it back",
                800,
            )
            .with_logs(["enc_B(enc_A(r)) computed", "response sent to Device TEE"])
            .with_encrypted_preview(simulated_ciphertext_preview("enc_B(enc_A", response) + ")"),
            StepDescriptor::new(
                step_ids::DEVICE_DECRYPT,
                "Final decryption on Device",
                "Remove both layers and show the result",
                800,
            )
            .with_logs(["cmd_retrieve_result: dec_A, dec_B", "result ready"]),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_plan_shape() {
        let plan = environment_setup_plan();
        let ids: Vec<&str> = plan.steps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                step_ids::DEVICE_CHECK,
                step_ids::DEVICE_BUILD,
                step_ids::CLOUD_CHECK,
                step_ids::CLOUD_BUILD,
                step_ids::FINALIZE
            ]
        );
        let failure_points: Vec<&str> = plan
            .steps
            .iter()
            .filter(|s| s.is_failure_point())
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(failure_points, vec![step_ids::DEVICE_CHECK, step_ids::CLOUD_CHECK]);
        assert_eq!(
            plan.descriptor(step_ids::CLOUD_CHECK)
                .and_then(|s| s.failure_message.as_deref()),
            Some("Cloud TEE environment is not supported")
        );
    }

    #[test]
    fn test_capability_plan_per_target() {
        let plan = capability_check_plan(CapabilityTarget::Cloud);
        assert_eq!(plan.kind, WorkflowKind::CapabilityCheck);
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[0].id, "cloud-check");
        assert_eq!(plan.steps[1].id, "cloud-tee-test");
        assert!(plan.steps[1].log_fragments[0].contains("tee_type=sev"));
    }

    #[test]
    fn test_inference_plan_has_six_steps_and_previews() {
        let plan = inference_plan("What is a TEE?", "A TEE is an enclave.");
        assert_eq!(plan.steps.len(), 6);
        let preview = plan.steps[0].encrypted_preview.as_deref().unwrap();
        assert!(preview.starts_with("enc_A("));
        assert!(!preview.contains("What is a TEE?"));
        assert!(plan.steps[4].encrypted_preview.is_some());
        assert!(plan.descriptor(step_ids::RAG_INFERENCE).unwrap().is_failure_point());
    }

    #[test]
    fn test_ciphertext_preview_truncates() {
        assert_eq!(simulated_ciphertext_preview("enc_A", "hi"), "enc_A(aGk=)");
        let long = simulated_ciphertext_preview("enc_A", &"x".repeat(100));
        assert!(long.ends_with("...)"));
    }
}
