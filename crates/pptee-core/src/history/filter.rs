//! History search and filtering.

use serde::{Deserialize, Serialize};

use super::model::{InferenceRecord, InferenceStatus};

/// Criteria for [`filter_history`]. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilter {
    /// Case-insensitive substring of the query.
    pub search: Option<String>,
    pub status: Option<InferenceStatus>,
    /// Exact model display name.
    pub model: Option<String>,
}

impl HistoryFilter {
    pub fn matches(&self, record: &InferenceRecord) -> bool {
        let search_ok = self.search.as_deref().is_none_or(|needle| {
            record
                .query
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        let status_ok = self.status.is_none_or(|status| record.status == status);
        let model_ok = self
            .model
            .as_deref()
            .is_none_or(|model| record.model == model);
        search_ok && status_ok && model_ok
    }
}

/// Records matching `filter`, in input order.
pub fn filter_history(records: &[InferenceRecord], filter: &HistoryFilter) -> Vec<InferenceRecord> {
    records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect()
}

/// Per-status counts over a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub processing: usize,
    pub total_tokens: u64,
}

impl HistorySummary {
    pub fn from_records(records: &[InferenceRecord]) -> Self {
        records.iter().fold(Self::default(), |mut summary, record| {
            summary.total += 1;
            summary.total_tokens += u64::from(record.tokens_used);
            match record.status {
                InferenceStatus::Success => summary.success += 1,
                InferenceStatus::Failed => summary.failed += 1,
                InferenceStatus::Processing => summary.processing += 1,
            }
            summary
        })
    }

    /// Share of successful records as a percentage, 0 when empty.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.success as f64 * 100.0 / self.total as f64
        }
    }
}
