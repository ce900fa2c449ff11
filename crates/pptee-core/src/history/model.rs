//! History record model.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::find_model;
use crate::conversation::{ConversationLog, MessageRole};
use crate::error::{PpteeError, Result};

/// Display format of record timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferenceStatus {
    Success,
    Failed,
    Processing,
}

impl InferenceStatus {
    pub const ALL: [InferenceStatus; 3] = [
        InferenceStatus::Success,
        InferenceStatus::Failed,
        InferenceStatus::Processing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InferenceStatus::Success => "success",
            InferenceStatus::Failed => "failed",
            InferenceStatus::Processing => "processing",
        }
    }
}

impl fmt::Display for InferenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InferenceStatus {
    type Err = PpteeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                PpteeError::validation(format!(
                    "unknown status '{}' (expected success, failed or processing)",
                    s
                ))
            })
    }
}

/// One row of the inference history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceRecord {
    pub id: String,
    /// Model display name, e.g. `GPT-4`.
    pub model: String,
    pub query: String,
    pub status: InferenceStatus,
    /// `YYYY-MM-DD HH:MM`.
    pub timestamp: String,
    /// `None` while processing.
    pub duration_ms: Option<u64>,
    pub tokens_used: u32,
}

impl InferenceRecord {
    /// Duration in seconds with one decimal, or `-`.
    pub fn duration_label(&self) -> String {
        match self.duration_ms {
            Some(ms) => format!("{:.1}s", ms as f64 / 1000.0),
            None => "-".to_string(),
        }
    }
}

fn estimate_tokens(text: &str) -> u32 {
    let chars = text.chars().count() as u32;
    chars.div_ceil(4)
}

/// Builds records for the completed inferences in `log`, newest first.
///
/// Each user message followed by an assistant message is one successful run.
/// Unparseable timestamps fall back to the raw stored string.
pub fn records_from_log(log: &ConversationLog) -> Vec<InferenceRecord> {
    let mut records: Vec<(Option<DateTime<FixedOffset>>, InferenceRecord)> = Vec::new();

    for (model_id, messages) in log.iter() {
        let model_name = find_model(model_id)
            .map(|model| model.name.to_string())
            .unwrap_or_else(|| model_id.to_string());

        let mut index = 0;
        for pair in messages.windows(2) {
            let (question, answer) = (&pair[0], &pair[1]);
            if question.role != MessageRole::User || answer.role != MessageRole::Assistant {
                continue;
            }
            index += 1;

            let asked = DateTime::parse_from_rfc3339(&question.timestamp).ok();
            let answered = DateTime::parse_from_rfc3339(&answer.timestamp).ok();
            let duration_ms = match (asked, answered) {
                (Some(start), Some(end)) => {
                    Some(end.signed_duration_since(start).num_milliseconds().max(0) as u64)
                }
                _ => None,
            };
            let timestamp = answered
                .map(|at| at.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_else(|| answer.timestamp.clone());

            records.push((
                answered,
                InferenceRecord {
                    id: format!("{}-{}", model_id, index),
                    model: model_name.clone(),
                    query: question.content.clone(),
                    status: InferenceStatus::Success,
                    timestamp,
                    duration_ms,
                    tokens_used: estimate_tokens(&question.content)
                        + estimate_tokens(&answer.content),
                },
            ));
        }
    }

    // Oldest first with ties in log order, then reversed.
    records.sort_by_key(|(answered, _)| *answered);
    records.into_iter().rev().map(|(_, record)| record).collect()
}
