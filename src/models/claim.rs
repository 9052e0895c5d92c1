use serde::{Deserialize, Serialize};

use super::enums::ContentionType;
use super::ClassificationEntry;

/// A single claimed condition as submitted with a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contention {
    pub contention_text: String,
    pub contention_type: ContentionType,
    #[serde(default)]
    pub diagnostic_code: Option<i64>,
}

impl Contention {
    pub fn new(text: impl Into<String>, contention_type: ContentionType) -> Self {
        Self {
            contention_text: text.into(),
            contention_type,
            diagnostic_code: None,
        }
    }

    pub fn with_diagnostic_code(mut self, code: i64) -> Self {
        self.diagnostic_code = Some(code);
        self
    }
}

/// A claim submission. Lives for the duration of one classification call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: i64,
    pub form526_submission_id: i64,
    pub contentions: Vec<Contention>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedContention {
    pub classification_code: Option<i64>,
    pub classification_name: Option<String>,
    pub diagnostic_code: Option<i64>,
    pub contention_type: ContentionType,
}

impl ClassifiedContention {
    pub fn new(contention: &Contention, entry: ClassificationEntry) -> Self {
        Self {
            classification_code: entry.code,
            classification_name: entry.name,
            diagnostic_code: contention.diagnostic_code,
            contention_type: contention.contention_type,
        }
    }

    pub fn is_classified(&self) -> bool {
        self.classification_code.is_some()
    }
}

/// Claim-level classification result with completion statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierResponse {
    pub contentions: Vec<ClassifiedContention>,
    pub claim_id: i64,
    pub form526_submission_id: i64,
    pub is_fully_classified: bool,
    pub num_processed_contentions: usize,
    pub num_classified_contentions: usize,
}

impl ClassifierResponse {
    /// Aggregate per-contention results (already in input order).
    pub fn new(claim: &Claim, contentions: Vec<ClassifiedContention>) -> Self {
        let num_processed_contentions = contentions.len();
        let num_classified_contentions = contentions.iter().filter(|c| c.is_classified()).count();
        Self {
            contentions,
            claim_id: claim.claim_id,
            form526_submission_id: claim.form526_submission_id,
            is_fully_classified: num_classified_contentions == num_processed_contentions,
            num_processed_contentions,
            num_classified_contentions,
        }
    }

    /// Share of classified contentions, 0–100. An empty claim reports 0.
    pub fn percent_classified(&self) -> f64 {
        if self.num_processed_contentions == 0 {
            return 0.0;
        }
        100.0 * self.num_classified_contentions as f64 / self.num_processed_contentions as f64
    }
}
