//! Inference history.
//!
//! - `model`: history records and their status
//! - `filter`: search and filtering
//! - `seed`: the fixed sample records

mod filter;
mod model;
mod seed;

pub use filter::{HistoryFilter, HistorySummary, filter_history};
pub use model::{InferenceRecord, InferenceStatus, records_from_log};
pub use seed::seed_history;
