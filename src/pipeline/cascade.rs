//! Classification cascade.
//!
//! Strict short-circuit per contention; the first stage with a non-null code wins:
//! 1. diagnostic code (claims for increase only)
//! 2. contention text: dropdown exact match, then expanded word-set match
//! 3. ML fallback, label resolved through the classification index
//! 4. not classified
//!
//! Misses and ML failures are never errors here.

use crate::models::{
    Claim, ClassificationEntry, ClassifiedBy, ClassifiedContention, ClassifierResponse, Contention,
};
use crate::pipeline::lookup::{LookupTable, LookupTables};
use crate::pipeline::ml::MlClassifier;
use crate::pipeline::normalize::WordSetKey;

/// What the cascade learned about one contention, for the caller to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentionMetadata {
    pub classified_by: ClassifiedBy,
    /// The literal text is one of the known dropdown options.
    pub is_in_dropdown: bool,
    /// The expanded (normalized) table produced the classification.
    pub is_lookup_table_match: bool,
    /// Key looked up in the expanded table, when that stage ran.
    pub normalized_key: Option<WordSetKey>,
}

impl ContentionMetadata {
    fn new(is_in_dropdown: bool) -> Self {
        Self {
            classified_by: ClassifiedBy::NotClassified,
            is_in_dropdown,
            is_lookup_table_match: false,
            normalized_key: None,
        }
    }
}

/// Classify one contention, returning the result and the stage that produced it.
pub fn classify_contention(
    contention: &Contention,
    tables: &LookupTables,
    ml: Option<&dyn MlClassifier>,
) -> (ClassifiedContention, ClassifiedBy) {
    let (classified, metadata) = classify_contention_with_metadata(contention, tables, ml);
    (classified, metadata.classified_by)
}

/// Classify one contention with the full logging metadata.
pub fn classify_contention_with_metadata(
    contention: &Contention,
    tables: &LookupTables,
    ml: Option<&dyn MlClassifier>,
) -> (ClassifiedContention, ContentionMetadata) {
    let text = contention.contention_text.trim();
    let mut metadata = ContentionMetadata::new(!text.is_empty() && tables.dropdown.contains(text));

    let classified = |entry: ClassificationEntry| ClassifiedContention::new(contention, entry);

    if contention.contention_type.is_increase() {
        if let Some(code) = contention.diagnostic_code {
            let entry = tables.diagnostic_code.get_code(code);
            if entry.is_classified() {
                metadata.classified_by = ClassifiedBy::DiagnosticCode;
                return (classified(entry), metadata);
            }
        }
    }

    if !text.is_empty() {
        let entry = tables.dropdown.get(text);
        if entry.is_classified() {
            metadata.classified_by = ClassifiedBy::ContentionText;
            return (classified(entry), metadata);
        }

        let expanded = tables.expanded.lookup(text);
        metadata.normalized_key = Some(expanded.key);
        if expanded.entry.is_classified() {
            metadata.classified_by = ClassifiedBy::ContentionText;
            metadata.is_lookup_table_match = true;
            return (classified(expanded.entry), metadata);
        }

        if let Some(entry) = ml.and_then(|ml| predict(ml, &contention.contention_text, tables)) {
            metadata.classified_by = ClassifiedBy::MlFallback;
            return (classified(entry), metadata);
        }
    }

    (classified(ClassificationEntry::unclassified()), metadata)
}

/// Ask the ML classifier and resolve its label. Failures degrade to `None`.
fn predict(
    ml: &dyn MlClassifier,
    text: &str,
    tables: &LookupTables,
) -> Option<ClassificationEntry> {
    match ml.predict(text) {
        Ok(Some(label)) => {
            let resolved = tables.classification_index().resolve_label(&label);
            if resolved.is_none() {
                tracing::debug!(classifier = %ml.describe(), "ML label did not resolve to a known classification");
            }
            resolved
        }
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(
                classifier = %ml.describe(),
                error = %e,
                "ML fallback failed, contention left unclassified"
            );
            None
        }
    }
}

/// Classify every contention of a claim, preserving input order.
pub fn classify_claim(
    claim: &Claim,
    tables: &LookupTables,
    ml: Option<&dyn MlClassifier>,
) -> ClassifierResponse {
    classify_claim_with_metadata(claim, tables, ml).0
}

/// Classify a claim and return per-contention metadata in the same order.
pub fn classify_claim_with_metadata(
    claim: &Claim,
    tables: &LookupTables,
    ml: Option<&dyn MlClassifier>,
) -> (ClassifierResponse, Vec<ContentionMetadata>) {
    let (contentions, metadata): (Vec<_>, Vec<_>) = claim
        .contentions
        .iter()
        .map(|c| classify_contention_with_metadata(c, tables, ml))
        .unzip();

    let response = ClassifierResponse::new(claim, contentions);
    tracing::debug!(
        claim_id = claim.claim_id,
        processed = response.num_processed_contentions,
        classified = response.num_classified_contentions,
        "claim classified"
    );
    (response, metadata)
}
