//! Application configuration model.
//!
//! Stored as `config.toml` in the application root. Every field has a default
//! so a partial or empty file is valid.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{PpteeError, Result};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct PpteeConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Timing and failure behaviour of the simulated backend.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Multiplier on every simulated delay. 0 runs instantly.
    pub time_scale: f64,
    pub login_delay_ms: u64,
    pub response_delay_ms: u64,
    /// Failure probability at capability and setup check steps.
    pub capability_failure_rate: f64,
    /// Failure probability at the inference step.
    pub inference_failure_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            login_delay_ms: 1500,
            response_delay_ms: 500,
            capability_failure_rate: 0.1,
            inference_failure_rate: 0.05,
        }
    }
}

impl SimulationConfig {
    /// `base_ms` scaled by `time_scale`.
    pub fn scaled(&self, base_ms: u64) -> Duration {
        if !self.time_scale.is_finite() || self.time_scale <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(base_ms as f64 * self.time_scale / 1000.0)
    }

    pub fn login_delay(&self) -> Duration {
        self.scaled(self.login_delay_ms)
    }

    pub fn response_delay(&self) -> Duration {
        self.scaled(self.response_delay_ms)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive. `RUST_LOG` takes precedence.
    pub level: String,
    /// Write a daily log file under `logs/`.
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: true,
        }
    }
}

impl PpteeConfig {
    pub fn validate(&self) -> Result<()> {
        let sim = &self.simulation;
        if !sim.time_scale.is_finite() || sim.time_scale < 0.0 {
            return Err(PpteeError::config(format!(
                "simulation.time_scale must be a non-negative number, got {}",
                sim.time_scale
            )));
        }
        for (name, rate) in [
            ("capability_failure_rate", sim.capability_failure_rate),
            ("inference_failure_rate", sim.inference_failure_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(PpteeError::config(format!(
                    "simulation.{} must be within [0, 1], got {}",
                    name, rate
                )));
            }
        }
        if self.logging.level.trim().is_empty() {
            return Err(PpteeError::config("logging.level must not be empty"));
        }
        Ok(())
    }

    /// Zero delays and no random failures.
    pub fn instant() -> Self {
        Self {
            simulation: SimulationConfig {
                time_scale: 0.0,
                capability_failure_rate: 0.0,
                inference_failure_rate: 0.0,
                ..SimulationConfig::default()
            },
            logging: LoggingConfig::default(),
        }
    }
}
