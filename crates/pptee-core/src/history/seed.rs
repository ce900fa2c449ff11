//! Sample history shown before any real inference has run.

use super::model::{InferenceRecord, InferenceStatus};

/// The eight fixed sample records, newest first.
pub fn seed_history() -> Vec<InferenceRecord> {
    let rows: [(&str, &str, &str, InferenceStatus, &str, Option<u64>, u32); 8] = [
        (
            "1",
            "GPT-4",
            "Data analysis request: Q1 2024 sales trend analysis",
            InferenceStatus::Success,
            "2024-01-22 14:32",
            Some(2300),
            450,
        ),
        (
            "2",
            "Claude-3",
            "Code review request: React component optimisation",
            InferenceStatus::Success,
            "2024-01-22 14:15",
            Some(3100),
            680,
        ),
        (
            "3",
            "Llama-3",
            "Document summary: extract the key points of a project proposal",
            InferenceStatus::Processing,
            "2024-01-22 14:08",
            None,
            0,
        ),
        (
            "4",
            "GPT-4",
            "Translation: technical document from Korean to English",
            InferenceStatus::Success,
            "2024-01-22 13:45",
            Some(1800),
            320,
        ),
        (
            "5",
            "Claude-3",
            "Creative writing: generate marketing copy",
            InferenceStatus::Success,
            "2024-01-22 13:20",
            Some(4200),
            890,
        ),
        (
            "6",
            "Llama-3",
            "Question answering: explain AI ethics",
            InferenceStatus::Failed,
            "2024-01-22 12:55",
            Some(500),
            0,
        ),
        (
            "7",
            "GPT-4",
            "Programming help: Python algorithm optimisation",
            InferenceStatus::Success,
            "2024-01-22 12:30",
            Some(2900),
            520,
        ),
        (
            "8",
            "Claude-3",
            "Data analysis: user behaviour pattern analysis",
            InferenceStatus::Success,
            "2024-01-22 11:45",
            Some(3500),
            740,
        ),
    ];

    rows.into_iter()
        .map(
            |(id, model, query, status, timestamp, duration_ms, tokens_used)| InferenceRecord {
                id: id.to_string(),
                model: model.to_string(),
                query: query.to_string(),
                status,
                timestamp: timestamp.to_string(),
                duration_ms,
                tokens_used,
            },
        )
        .collect()
}
