//! Classification lookup tables.
//!
//! Three table kinds share one query contract (`LookupTable::get`) and differ
//! only in how keys are normalized:
//! - diagnostic code table: stringified integer code
//! - dropdown table: trimmed, lower-cased full phrase
//! - expanded table: normalized word-set (see `pipeline::normalize`)
//!
//! Tables are built once from CSV sources and are read-only afterwards.

pub mod exact;
pub mod expanded;
pub mod index;
pub mod musculoskeletal;
pub mod source;

pub use exact::*;
pub use expanded::*;
pub use index::*;
pub use source::*;

use thiserror::Error;

use crate::models::ClassificationEntry;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Cannot read lookup source {path}: {error}")]
    Io {
        path: String,
        #[source]
        error: std::io::Error,
    },

    #[error("Malformed CSV in {table}: {error}")]
    Csv {
        table: String,
        #[source]
        error: csv::Error,
    },

    #[error("Lookup source {table} is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("Non-numeric code '{value}' in {table} at line {line}")]
    InvalidCode {
        table: String,
        line: u64,
        value: String,
    },

    #[error("Invalid table configuration for {table}: {reason}")]
    InvalidConfig { table: String, reason: String },
}

/// Exact or normalized key → classification.
pub trait LookupTable {
    /// Look up `key`, returning the table default on a miss.
    fn get(&self, key: &str) -> ClassificationEntry;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The three tables the cascade consults, plus the classification index
/// used to resolve ML labels. Built once at startup and shared read-only.
pub struct LookupTables {
    pub diagnostic_code: ExactMatchTable,
    pub dropdown: ExactMatchTable,
    pub expanded: ExpandedLookupTable,
    classification_index: ClassificationIndex,
}

impl LookupTables {
    pub fn new(
        diagnostic_code: ExactMatchTable,
        dropdown: ExactMatchTable,
        expanded: ExpandedLookupTable,
    ) -> Self {
        let classification_index = ClassificationIndex::from_classifications(
            diagnostic_code.classifications(),
        );
        Self {
            diagnostic_code,
            dropdown,
            expanded,
            classification_index,
        }
    }

    /// Build all tables from their sources. Any malformed source fails the whole load.
    pub fn load(
        diagnostic_code: &TableSourceConfig,
        dropdown: &TableSourceConfig,
        expanded: &TableSourceConfig,
    ) -> Result<Self, LookupError> {
        let diagnostic_code = ExactMatchTable::build(diagnostic_code, ExactKeyKind::DiagnosticCode)?;
        let dropdown = ExactMatchTable::build(dropdown, ExactKeyKind::Phrase)?;
        let expanded = ExpandedLookupTable::build(expanded)?;
        Ok(Self::new(diagnostic_code, dropdown, expanded))
    }

    pub fn classification_index(&self) -> &ClassificationIndex {
        &self.classification_index
    }
}
