pub mod capability;
pub mod catalog;
pub mod config;
pub mod conversation;
pub mod error;
pub mod history;
pub mod kv;
pub mod security;
pub mod session;
pub mod settings;
pub mod workflow;

// Re-export common error type
pub use error::PpteeError;
