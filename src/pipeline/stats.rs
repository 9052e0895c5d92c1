//! Classification statistics.
//!
//! The cascade returns metadata; the HTTP layer turns it into flat records
//! here and hands them to a `LogSink`. Raw contention text only reaches a
//! record when it is a known dropdown option. Everything else is replaced by
//! a fixed sentinel, optionally with the normalized tokens that matched.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;

use crate::models::{Claim, ClassifierResponse, Contention, ClassifiedContention};
use crate::pipeline::cascade::ContentionMetadata;

/// Logged in place of free text that is not a dropdown option.
pub const UNMAPPED_CONTENTION_TEXT: &str = "unmapped contention text";

/// `tracing` target the production sink writes to.
pub const STATS_TARGET: &str = "classification_stats";

// ═══════════════════════════════════════════════════════════
// Records
// ═══════════════════════════════════════════════════════════

/// Flat key → scalar record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LogRecord {
    fields: BTreeMap<&'static str, Value>,
}

impl LogRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &'static str, value: impl Into<Value>) -> Self {
        self.fields.insert(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }
}

/// Text to log for a contention. Only dropdown options pass through.
pub fn processed_contention_text(contention: &Contention, metadata: &ContentionMetadata) -> String {
    if metadata.is_in_dropdown {
        contention.contention_text.trim().to_lowercase()
    } else {
        UNMAPPED_CONTENTION_TEXT.to_string()
    }
}

/// One record per contention.
pub fn contention_record(
    endpoint: &str,
    claim: &Claim,
    contention: &Contention,
    classified: &ClassifiedContention,
    metadata: &ContentionMetadata,
) -> LogRecord {
    let mut record = LogRecord::new()
        .with("record_type", "contention")
        .with("endpoint", endpoint)
        .with("claim_id", claim.claim_id)
        .with("form526_submission_id", claim.form526_submission_id)
        .with(
            "processed_contention_text",
            processed_contention_text(contention, metadata),
        )
        .with("contention_type", contention.contention_type.as_str())
        .with("classification_code", classified.classification_code)
        .with("classification_name", classified.classification_name.clone())
        .with("diagnostic_code", contention.diagnostic_code)
        .with("classified_by", metadata.classified_by.as_str())
        .with("is_in_dropdown", metadata.is_in_dropdown)
        .with("is_lookup_table_match", metadata.is_lookup_table_match)
        .with("is_multi_contention", claim.contentions.len() > 1);

    // Only keys that matched a table entry, so every token is table vocabulary.
    if metadata.is_lookup_table_match {
        if let Some(key) = &metadata.normalized_key {
            record = record.with("normalized_tokens", key.as_str());
        }
    }
    record
}

/// One summary record per claim.
pub fn claim_record(endpoint: &str, response: &ClassifierResponse) -> LogRecord {
    LogRecord::new()
        .with("record_type", "claim")
        .with("endpoint", endpoint)
        .with("claim_id", response.claim_id)
        .with("form526_submission_id", response.form526_submission_id)
        .with("is_fully_classified", response.is_fully_classified)
        .with("percent_classified", response.percent_classified())
        .with("num_processed_contentions", response.num_processed_contentions)
        .with("num_classified_contentions", response.num_classified_contentions)
        .with("logged_at", chrono::Utc::now().to_rfc3339())
}

/// Emit every contention record followed by the claim summary.
pub fn log_claim_stats(
    sink: &dyn LogSink,
    endpoint: &str,
    claim: &Claim,
    response: &ClassifierResponse,
    metadata: &[ContentionMetadata],
) {
    for ((contention, classified), meta) in claim
        .contentions
        .iter()
        .zip(&response.contentions)
        .zip(metadata)
    {
        sink.emit(&contention_record(endpoint, claim, contention, classified, meta));
    }
    sink.emit(&claim_record(endpoint, response));
}

// ═══════════════════════════════════════════════════════════
// Sinks
// ═══════════════════════════════════════════════════════════

/// Destination for statistics records.
pub trait LogSink: Send + Sync {
    fn emit(&self, record: &LogRecord);
}

/// Writes each record as one JSON line through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, record: &LogRecord) {
        match serde_json::to_string(record) {
            Ok(json) => tracing::info!(target: STATS_TARGET, stats = %json),
            Err(e) => tracing::warn!(error = %e, "Failed to serialize stats record"),
        }
    }
}

/// Keeps records in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl LogSink for RecordingSink {
    fn emit(&self, record: &LogRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record.clone());
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
