//! Exact-match tables: diagnostic codes and dropdown (autosuggestion) phrases.

use std::collections::HashMap;
use std::io::Read;

use super::source::{parse_code, read_rows, TableSourceConfig};
use super::{LookupError, LookupTable};
use crate::models::{Classification, ClassificationEntry};

/// How key cells and query keys are normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExactKeyKind {
    /// Integer codes; "5260" and "5260.0" are the same key.
    DiagnosticCode,
    /// Full phrases, trimmed and lower-cased.
    Phrase,
}

impl ExactKeyKind {
    /// Canonical form of a key. `None` means the key can never match.
    pub fn normalize_key(&self, raw: &str) -> Option<String> {
        match self {
            Self::DiagnosticCode => parse_code(raw).map(|c| c.to_string()),
            Self::Phrase => {
                let key = raw.trim().to_lowercase();
                (!key.is_empty()).then_some(key)
            }
        }
    }
}

/// O(1) exact-key table. Later source rows overwrite earlier ones.
#[derive(Debug, Clone)]
pub struct ExactMatchTable {
    kind: ExactKeyKind,
    entries: HashMap<String, Classification>,
    default: ClassificationEntry,
}

impl ExactMatchTable {
    /// Build from the configured CSV file.
    pub fn build(config: &TableSourceConfig, kind: ExactKeyKind) -> Result<Self, LookupError> {
        let file = config.open()?;
        let table = Self::from_reader(file, config, kind)?;
        tracing::info!(
            table = %config.table_name(),
            entries = table.len(),
            "exact-match table loaded"
        );
        Ok(table)
    }

    /// Build from any CSV reader laid out as `config` describes.
    pub fn from_reader<R: Read>(
        reader: R,
        config: &TableSourceConfig,
        kind: ExactKeyKind,
    ) -> Result<Self, LookupError> {
        let rows = read_rows(reader, config)?;
        let mut entries = HashMap::with_capacity(rows.len());

        for row in rows {
            for cell in &row.keys {
                let key = kind
                    .normalize_key(cell)
                    .ok_or_else(|| LookupError::InvalidCode {
                        table: config.table_name(),
                        line: row.line,
                        value: cell.clone(),
                    })?;
                entries.insert(key, row.classification.clone());
            }
        }

        Ok(Self {
            kind,
            entries,
            default: config.default.clone(),
        })
    }

    pub fn kind(&self) -> ExactKeyKind {
        self.kind
    }

    /// Look up a diagnostic code.
    pub fn get_code(&self, code: i64) -> ClassificationEntry {
        self.get(&code.to_string())
    }

    /// Whether `key` is present, regardless of the default.
    pub fn contains(&self, key: &str) -> bool {
        self.kind
            .normalize_key(key)
            .is_some_and(|k| self.entries.contains_key(&k))
    }

    /// Every stored classification (one per key).
    pub fn classifications(&self) -> impl Iterator<Item = &Classification> {
        self.entries.values()
    }
}

impl LookupTable for ExactMatchTable {
    fn get(&self, key: &str) -> ClassificationEntry {
        self.kind
            .normalize_key(key)
            .and_then(|k| self.entries.get(&k))
            .map(ClassificationEntry::from)
            .unwrap_or_else(|| self.default.clone())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
