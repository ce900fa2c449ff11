//! Platform settings domain module.

mod model;
mod repository;

pub use model::{
    InferenceDefaults, NotificationSettings, PlatformSettings, RagSettings, SecuritySettings,
    ServerSettings, UserProfile,
};
pub use repository::SettingsRepository;
