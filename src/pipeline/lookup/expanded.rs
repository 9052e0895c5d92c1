//! Expanded lookup table: normalized, order-independent free-text matching.
//!
//! Keys are word-sets produced by `pipeline::normalize`, so "Left knee pain",
//! "pain, knee (left)" and "knee" all share the key `knee`.
//!
//! Construction rules:
//! - only active source rows, every configured phrase column
//! - empty word-sets are skipped
//! - a word-set already mapped to a *different* code keeps its first code
//! - curated musculoskeletal entries are merged last and always win

use std::collections::HashMap;
use std::io::Read;

use super::musculoskeletal;
use super::source::{read_rows, TableSourceConfig};
use super::{LookupError, LookupTable};
use crate::models::{Classification, ClassificationEntry};
use crate::pipeline::normalize::WordSetKey;

/// Literal phrase that keeps its causal clause; truncation would drop the
/// clinically relevant part.
pub const LOSS_OF_TEETH_PHRASE: &str = "loss of teeth due to bone loss";
pub const DENTAL_AND_ORAL_CODE: i64 = 8967;
pub const DENTAL_AND_ORAL_NAME: &str = "Dental and Oral";

/// Outcome of inserting one source key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Replaced,
    Conflict,
    EmptyKey,
}

/// Result of an expanded-table query, with the key that was looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedMatch {
    pub entry: ClassificationEntry,
    pub key: WordSetKey,
}

#[derive(Debug, Clone, Default)]
pub struct ExpandedLookupTable {
    entries: HashMap<WordSetKey, Classification>,
    default: ClassificationEntry,
}

impl ExpandedLookupTable {
    /// Build from the configured CSV file plus the curated overrides.
    pub fn build(config: &TableSourceConfig) -> Result<Self, LookupError> {
        let file = config.open()?;
        Self::from_reader(file, config)
    }

    /// Build from any CSV reader laid out as `config` describes.
    pub fn from_reader<R: Read>(reader: R, config: &TableSourceConfig) -> Result<Self, LookupError> {
        let rows = read_rows(reader, config)?;
        let mut table = Self {
            entries: HashMap::with_capacity(rows.len()),
            default: config.default.clone(),
        };

        let mut conflicts = 0usize;
        let mut empty = 0usize;
        for row in &rows {
            for phrase in &row.keys {
                match table.insert_source_phrase(phrase, &row.classification) {
                    InsertOutcome::Conflict => conflicts += 1,
                    InsertOutcome::EmptyKey => empty += 1,
                    InsertOutcome::Inserted | InsertOutcome::Replaced => {}
                }
            }
        }

        let overrides = table.merge_curated_overrides();

        tracing::info!(
            table = %config.table_name(),
            rows = rows.len(),
            entries = table.len(),
            conflicts,
            empty,
            overrides,
            "expanded lookup table built"
        );
        Ok(table)
    }

    /// Insert one source phrase. Never replaces an entry with a different code.
    pub fn insert_source_phrase(
        &mut self,
        phrase: &str,
        classification: &Classification,
    ) -> InsertOutcome {
        let key = WordSetKey::from_text(phrase);
        if key.is_empty() {
            return InsertOutcome::EmptyKey;
        }
        match self.entries.get(&key) {
            Some(existing) if existing.code != classification.code => InsertOutcome::Conflict,
            Some(_) => {
                self.entries.insert(key, classification.clone());
                InsertOutcome::Replaced
            }
            None => {
                self.entries.insert(key, classification.clone());
                InsertOutcome::Inserted
            }
        }
    }

    /// Merge the curated musculoskeletal entries, overwriting unconditionally.
    /// Returns how many keys were written.
    pub fn merge_curated_overrides(&mut self) -> usize {
        let mut written = 0;
        for (phrase, classification) in musculoskeletal::overrides() {
            let key = WordSetKey::from_text(phrase);
            if key.is_empty() {
                continue;
            }
            self.entries.insert(key, classification);
            written += 1;
        }
        written
    }

    /// Query with the normalized key that was used.
    pub fn lookup(&self, text: &str) -> ExpandedMatch {
        if text.trim().eq_ignore_ascii_case(LOSS_OF_TEETH_PHRASE) {
            return ExpandedMatch {
                entry: Classification::new(DENTAL_AND_ORAL_CODE, DENTAL_AND_ORAL_NAME).into(),
                key: WordSetKey::from_normalized("bone loss teeth"),
            };
        }

        let key = WordSetKey::from_text(text);
        let entry = self.lookup_key(&key);
        ExpandedMatch { entry, key }
    }

    /// Query by an already-built key. The empty key never matches.
    pub fn lookup_key(&self, key: &WordSetKey) -> ClassificationEntry {
        if key.is_empty() {
            return self.default.clone();
        }
        self.entries
            .get(key)
            .map(ClassificationEntry::from)
            .unwrap_or_else(|| self.default.clone())
    }
}

impl LookupTable for ExpandedLookupTable {
    fn get(&self, text: &str) -> ClassificationEntry {
        self.lookup(text).entry
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
