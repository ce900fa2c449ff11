//! Session domain module.
//!
//! Holds the two persisted flags that gate navigation (authenticated,
//! environment-ready), the screen gating rules, and the repository trait used
//! to persist the flags.
//!
//! # Module Structure
//!
//! - `model`: `Session` and its lifecycle phase
//! - `screen`: screens of the front end and their access rules
//! - `repository`: persistence trait for the session flags

mod model;
mod repository;
mod screen;

pub use model::{Session, SessionPhase};
pub use repository::SessionRepository;
pub use screen::{Access, Screen};
