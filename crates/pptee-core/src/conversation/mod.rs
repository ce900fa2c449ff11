//! Conversation domain module.
//!
//! - `message`: chat message types
//! - `log`: the append-only per-model message log
//! - `response`: the canned assistant response
//! - `repository`: persistence of the log

mod log;
mod message;
mod repository;
mod response;

pub use log::ConversationLog;
pub use message::{ConversationMessage, MessageRole};
pub use repository::ConversationRepository;
pub use response::simulated_response;
