//! Security overview model.
//!
//! Everything here is descriptive. No cryptography is performed anywhere in
//! the platform.

use serde::{Deserialize, Serialize};

use crate::capability::{CapabilityResult, CapabilityTarget};
use crate::session::Session;

/// A labelled encryption fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncryptionFact {
    pub label: &'static str,
    pub value: &'static str,
}

pub const ENCRYPTION_FACTS: [EncryptionFact; 4] = [
    EncryptionFact {
        label: "Encryption algorithm",
        value: "AES-256-GCM",
    },
    EncryptionFact {
        label: "Key exchange",
        value: "ECDH P-384",
    },
    EncryptionFact {
        label: "Hash function",
        value: "SHA-384",
    },
    EncryptionFact {
        label: "Authentication",
        value: "HMAC-SHA256",
    },
];

/// One hop of the end-to-end data flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataFlowStage {
    pub order: u8,
    pub location: &'static str,
    pub action: &'static str,
    pub description: &'static str,
}

pub const DATA_FLOW: [DataFlowStage; 7] = [
    DataFlowStage {
        order: 1,
        location: "Device TEE",
        action: "enc_A(q)",
        description: "Encrypt the user query with key A",
    },
    DataFlowStage {
        order: 2,
        location: "Secure channel",
        action: "transmit",
        description: "Send the encrypted data",
    },
    DataFlowStage {
        order: 3,
        location: "Cloud TEE",
        action: "dec_A(enc_A(q))",
        description: "Decrypt inside the Cloud TEE",
    },
    DataFlowStage {
        order: 4,
        location: "Cloud TEE",
        action: "RAG + LLM",
        description: "Run inference in the protected environment",
    },
    DataFlowStage {
        order: 5,
        location: "Cloud TEE",
        action: "enc_B(enc_A(r))",
        description: "Double-encrypt the response",
    },
    DataFlowStage {
        order: 6,
        location: "Secure channel",
        action: "transmit",
        description: "Send the double-encrypted response",
    },
    DataFlowStage {
        order: 7,
        location: "Device TEE",
        action: "dec_A, dec_B",
        description: "Decrypt both layers and show the result",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeeState {
    /// Environment provisioned and a capability result is on record.
    Active,
    /// Capability checked but the environment is not provisioned.
    Checked,
    Inactive,
}

impl TeeState {
    pub fn as_str(self) -> &'static str {
        match self {
            TeeState::Active => "active",
            TeeState::Checked => "checked",
            TeeState::Inactive => "inactive",
        }
    }
}

/// Status of one side of the TEE pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeeStatus {
    pub target: CapabilityTarget,
    pub state: TeeState,
    pub capability: Option<CapabilityResult>,
}

impl TeeStatus {
    pub fn derive(
        target: CapabilityTarget,
        session: &Session,
        capability: Option<CapabilityResult>,
    ) -> Self {
        let state = match (&capability, session.environment_ready) {
            (Some(_), true) => TeeState::Active,
            (Some(_), false) => TeeState::Checked,
            (None, _) => TeeState::Inactive,
        };
        Self {
            target,
            state,
            capability,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityOverview {
    pub encryption: &'static [EncryptionFact],
    pub data_flow: &'static [DataFlowStage],
    pub device: TeeStatus,
    pub cloud: TeeStatus,
}

impl SecurityOverview {
    pub fn new(device: TeeStatus, cloud: TeeStatus) -> Self {
        Self {
            encryption: &ENCRYPTION_FACTS,
            data_flow: &DATA_FLOW,
            device,
            cloud,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tee_status_derivation() {
        let mut session = Session::new();
        session.login();
        let device = CapabilityTarget::Device;

        let none = TeeStatus::derive(device, &session, None);
        assert_eq!(none.state, TeeState::Inactive);

        let checked = TeeStatus::derive(device, &session, Some(device.simulated_result()));
        assert_eq!(checked.state, TeeState::Checked);

        session.mark_environment_ready().unwrap();
        let active = TeeStatus::derive(device, &session, Some(device.simulated_result()));
        assert_eq!(active.state, TeeState::Active);
    }

    #[test]
    fn test_data_flow_is_ordered() {
        let orders: Vec<u8> = DATA_FLOW.iter().map(|stage| stage.order).collect();
        assert_eq!(orders, (1..=7).collect::<Vec<u8>>());
    }
}
