//! Application layer for PP-TEE.
//!
//! Use cases coordinate the domain model, the key-value backed repositories
//! and the workflow executor. [`AppContext`] wires them together.

pub mod capability_usecase;
pub mod context;
pub mod dashboard_service;
pub mod history_service;
pub mod inference_usecase;
pub mod security_service;
pub mod session_usecase;
pub mod settings_service;
pub mod setup_usecase;

pub use capability_usecase::{CapabilityCheckReport, CapabilityUseCase};
pub use context::AppContext;
pub use dashboard_service::{DashboardService, DashboardSummary, ModelUsage};
pub use history_service::HistoryService;
pub use inference_usecase::{InferenceOutcome, InferenceUseCase};
pub use security_service::SecurityService;
pub use session_usecase::SessionUseCase;
pub use settings_service::SettingsService;
pub use setup_usecase::{SetupReport, SetupUseCase};
