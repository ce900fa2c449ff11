pub mod config_service;
pub mod kv_capability_repository;
pub mod kv_conversation_repository;
pub mod kv_session_repository;
pub mod kv_settings_repository;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::kv_capability_repository::KvCapabilityRepository;
pub use crate::kv_conversation_repository::KvConversationRepository;
pub use crate::kv_session_repository::KvSessionRepository;
pub use crate::kv_settings_repository::KvSettingsRepository;
pub use crate::paths::PpteePaths;
pub use crate::storage::{FileKeyValueStore, MemoryKeyValueStore};
