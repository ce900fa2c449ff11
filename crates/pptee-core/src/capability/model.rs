//! Capability models.
//!
//! The values produced here are canned: no hardware is probed. SGX, SEV and
//! TDX are display labels only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PpteeError;

/// Result of a (simulated) TEE capability check.
///
/// Immutable once produced; discarded on logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityResult {
    pub sgx: bool,
    pub sev: bool,
    pub tdx: bool,
    pub notes: String,
}

impl CapabilityResult {
    /// True if at least one TEE technology is reported.
    pub fn supports_any(&self) -> bool {
        self.sgx || self.sev || self.tdx
    }

    /// Labels of the supported technologies, in SGX/SEV/TDX order.
    pub fn supported_technologies(&self) -> Vec<&'static str> {
        [("SGX", self.sgx), ("SEV", self.sev), ("TDX", self.tdx)]
            .into_iter()
            .filter_map(|(label, supported)| supported.then_some(label))
            .collect()
    }
}

/// Where a capability check runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityTarget {
    Device,
    Cloud,
}

impl CapabilityTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            CapabilityTarget::Device => "device",
            CapabilityTarget::Cloud => "cloud",
        }
    }

    /// Human-readable name used in canned text ("Device TEE", "Cloud TEE").
    pub fn display_name(self) -> &'static str {
        match self {
            CapabilityTarget::Device => "Device TEE",
            CapabilityTarget::Cloud => "Cloud TEE",
        }
    }

    /// The canned result a successful check reports.
    pub fn simulated_result(self) -> CapabilityResult {
        match self {
            CapabilityTarget::Device => CapabilityResult {
                sgx: true,
                sev: false,
                tdx: true,
                notes: "Intel SGX supported".to_string(),
            },
            CapabilityTarget::Cloud => CapabilityResult {
                sgx: true,
                sev: true,
                tdx: false,
                notes: "AMD SEV supported".to_string(),
            },
        }
    }

    /// TEE type exercised by the dummy test on this target.
    pub fn test_tee_type(self) -> &'static str {
        match self {
            CapabilityTarget::Device => "sgx",
            CapabilityTarget::Cloud => "sev",
        }
    }

    /// The canned output of a passing dummy TEE test.
    pub fn simulated_test(self) -> TeeTestResult {
        let tee_type = self.test_tee_type();
        TeeTestResult {
            tee_type: tee_type.to_string(),
            exit_code: 0,
            stdout: format!("{} enclave launched; attestation quote generated", tee_type),
            stderr: String::new(),
            timed_out: false,
        }
    }
}

impl fmt::Display for CapabilityTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapabilityTarget {
    type Err = PpteeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "device" => Ok(CapabilityTarget::Device),
            "cloud" => Ok(CapabilityTarget::Cloud),
            other => Err(PpteeError::validation(format!(
                "unknown capability target '{}': expected device or cloud",
                other
            ))),
        }
    }
}

/// Output of the simulated dummy TEE test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeeTestResult {
    pub tee_type: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
}

impl TeeTestResult {
    pub fn passed(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }

    /// One-line summary used as a workflow log line.
    pub fn summary(&self) -> String {
        format!(
            "dummy {} test: exit_code={}, timed_out={}",
            self.tee_type, self.exit_code, self.timed_out
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_results() {
        let device = CapabilityTarget::Device.simulated_result();
        assert_eq!(device.supported_technologies(), vec!["SGX", "TDX"]);
        assert_eq!(device.notes, "Intel SGX supported");

        let cloud = CapabilityTarget::Cloud.simulated_result();
        assert_eq!(cloud.supported_technologies(), vec!["SGX", "SEV"]);
        assert!(cloud.supports_any());
    }

    #[test]
    fn test_capability_json_shape() {
        let json = serde_json::to_value(CapabilityTarget::Device.simulated_result()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"sgx": true, "sev": false, "tdx": true, "notes": "Intel SGX supported"})
        );
    }

    #[test]
    fn test_dummy_test_passes() {
        let result = CapabilityTarget::Cloud.simulated_test();
        assert_eq!(result.tee_type, "sev");
        assert!(result.passed());
        assert_eq!(result.summary(), "dummy sev test: exit_code=0, timed_out=false");
    }

    #[test]
    fn test_parse_target() {
        assert_eq!("Cloud".parse::<CapabilityTarget>().unwrap(), CapabilityTarget::Cloud);
        assert!("edge".parse::<CapabilityTarget>().unwrap_err().is_validation());
    }
}
