//! Transport-agnostic classifier state.
//!
//! `ClassifierContext` is built once at startup and shared behind an `Arc`.
//! Lookup tables are immutable. The ML classifier sits behind a `RwLock` so
//! it can be rebuilt and swapped while requests are in flight.

use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::config::AppConfig;
use crate::pipeline::lookup::{LookupError, LookupTable, LookupTables};
use crate::pipeline::ml::{HttpMlClassifier, MlClassifier, MlConfig, MlError};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Internal lock poisoned")]
    LockPoisoned,

    #[error("Lookup table error: {0}")]
    Lookup(#[from] LookupError),

    #[error("ML classifier error: {0}")]
    Ml(#[from] MlError),
}

// ═══════════════════════════════════════════════════════════
// ClassifierContext — shared by every request
// ═══════════════════════════════════════════════════════════

/// Entry counts reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableCounts {
    pub diagnostic_code: usize,
    pub dropdown: usize,
    pub expanded: usize,
}

pub struct ClassifierContext {
    tables: LookupTables,
    /// `None` when no ML endpoint is configured.
    ml: RwLock<Option<Arc<dyn MlClassifier>>>,
}

impl ClassifierContext {
    pub fn new(tables: LookupTables, ml: Option<Arc<dyn MlClassifier>>) -> Self {
        Self {
            tables,
            ml: RwLock::new(ml),
        }
    }

    /// Load every table and build the ML client. Fails fast on bad sources.
    ///
    /// Must run outside an async context: the ML client is a blocking
    /// reqwest client.
    pub fn from_config(config: &AppConfig) -> Result<Self, CoreError> {
        let tables = LookupTables::load(
            &config.diagnostic_code_table,
            &config.dropdown_table,
            &config.expanded_table,
        )?;
        let ml = build_ml_classifier(config.ml.as_ref())?;

        let context = Self::new(tables, ml);
        let counts = context.table_counts();
        tracing::info!(
            diagnostic_code = counts.diagnostic_code,
            dropdown = counts.dropdown,
            expanded = counts.expanded,
            ml_enabled = context.ml_enabled(),
            "Classifier context ready"
        );
        Ok(context)
    }

    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    pub fn table_counts(&self) -> TableCounts {
        TableCounts {
            diagnostic_code: self.tables.diagnostic_code.len(),
            dropdown: self.tables.dropdown.len(),
            expanded: self.tables.expanded.len(),
        }
    }

    // ── ML classifier (swappable) ───────────────────────────

    /// Current classifier. The lock is released before the caller predicts.
    pub fn ml_classifier(&self) -> Result<Option<Arc<dyn MlClassifier>>, CoreError> {
        let guard = self.ml.read().map_err(|_| CoreError::LockPoisoned)?;
        Ok(guard.clone())
    }

    pub fn ml_enabled(&self) -> bool {
        self.ml.read().map(|guard| guard.is_some()).unwrap_or(false)
    }

    /// Replace the classifier in one write. Returns the previous one.
    pub fn swap_ml_classifier(
        &self,
        replacement: Option<Arc<dyn MlClassifier>>,
    ) -> Result<Option<Arc<dyn MlClassifier>>, CoreError> {
        let mut guard = self.ml.write().map_err(|_| CoreError::LockPoisoned)?;
        Ok(std::mem::replace(&mut *guard, replacement))
    }

    /// Rebuild the classifier from configuration, then swap it in.
    /// On failure the current classifier stays in place.
    pub fn reinitialize_ml(&self, config: Option<&MlConfig>) -> Result<bool, CoreError> {
        let replacement = build_ml_classifier(config)?;
        let enabled = replacement.is_some();
        let previous = self.swap_ml_classifier(replacement)?;
        tracing::info!(
            was_enabled = previous.is_some(),
            enabled,
            "ML classifier reinitialized"
        );
        Ok(enabled)
    }
}

fn build_ml_classifier(
    config: Option<&MlConfig>,
) -> Result<Option<Arc<dyn MlClassifier>>, CoreError> {
    match config {
        Some(config) => {
            let classifier = HttpMlClassifier::new(config)?;
            tracing::info!(classifier = %classifier.describe(), "ML classifier configured");
            Ok(Some(Arc::new(classifier)))
        }
        None => Ok(None),
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::lookup::test_support::tables;
    use crate::pipeline::ml::test_support::FixedClassifier;

    #[test]
    fn new_context_without_ml() {
        let context = ClassifierContext::new(tables(), None);
        assert!(!context.ml_enabled());
        assert!(context.ml_classifier().unwrap().is_none());
        assert_eq!(context.table_counts().diagnostic_code, 5);
        assert_eq!(context.table_counts().dropdown, 3);
    }

    #[test]
    fn swap_returns_previous_and_keeps_clones_alive() {
        let context = ClassifierContext::new(
            tables(),
            Some(Arc::new(FixedClassifier(Some("Hearing Loss")))),
        );
        let in_flight = context.ml_classifier().unwrap().unwrap();

        let previous = context
            .swap_ml_classifier(Some(Arc::new(FixedClassifier(Some("Sleep Disorders")))))
            .unwrap();
        assert!(previous.is_some());

        // The clone taken before the swap still answers with the old classifier
        assert_eq!(in_flight.predict("x").unwrap().as_deref(), Some("Hearing Loss"));
        let current = context.ml_classifier().unwrap().unwrap();
        assert_eq!(current.predict("x").unwrap().as_deref(), Some("Sleep Disorders"));
    }

    #[test]
    fn reinitialize_with_no_config_disables_ml() {
        let context = ClassifierContext::new(tables(), Some(Arc::new(FixedClassifier(None))));
        assert!(context.ml_enabled());
        assert!(!context.reinitialize_ml(None).unwrap());
        assert!(!context.ml_enabled());
    }

    #[test]
    fn reinitialize_with_endpoint_enables_ml() {
        let context = ClassifierContext::new(tables(), None);
        let config = MlConfig {
            endpoint_url: "http://127.0.0.1:9/predict".into(),
            timeout_secs: 1,
        };
        assert!(context.reinitialize_ml(Some(&config)).unwrap());
        let classifier = context.ml_classifier().unwrap().unwrap();
        assert_eq!(classifier.describe(), "http:http://127.0.0.1:9/predict");
    }

    #[test]
    fn from_config_loads_bundled_data() {
        use crate::models::{Contention, ContentionType};
        use crate::pipeline::cascade::classify_contention;

        let data_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let context = ClassifierContext::from_config(&AppConfig::with_data_dir(data_dir)).unwrap();
        assert!(!context.ml_enabled());
        // Inactive rows are skipped
        assert_eq!(context.table_counts().dropdown, 16);

        let tables = context.tables();
        let knee = Contention::new("Left knee pain", ContentionType::New);
        assert_eq!(classify_contention(&knee, tables, None).0.classification_code, Some(8997));
        let teeth = Contention::new("loss of teeth due to bone loss", ContentionType::New);
        assert_eq!(classify_contention(&teeth, tables, None).0.classification_code, Some(8967));
        let increase = Contention::new("ringing", ContentionType::Increase).with_diagnostic_code(6847);
        assert_eq!(classify_contention(&increase, tables, None).0.classification_code, Some(9016));
    }

    #[test]
    fn from_config_fails_fast_on_missing_tables() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::with_data_dir(dir.path());
        assert!(matches!(
            ClassifierContext::from_config(&config),
            Err(CoreError::Lookup(LookupError::Io { .. }))
        ));
    }
}
