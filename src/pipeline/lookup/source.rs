//! CSV sources for lookup tables.
//!
//! Column names come from configuration; nothing here knows the layout of a
//! particular export.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::LookupError;
use crate::models::{Classification, ClassificationEntry};

/// Values of the active-flag column that mark a row as active (case-insensitive).
const ACTIVE_VALUES: &[&str] = &["active", "true", "yes", "y", "1"];

/// Where a table comes from and how to read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSourceConfig {
    pub path: PathBuf,
    /// Phrase (or code) columns. Every non-empty cell becomes a key.
    pub input_columns: Vec<String>,
    pub classification_code_column: String,
    pub classification_name_column: String,
    /// When set, only rows whose flag is in `ACTIVE_VALUES` are loaded.
    #[serde(default)]
    pub active_column: Option<String>,
    /// Returned on a lookup miss.
    #[serde(default)]
    pub default: ClassificationEntry,
}

impl TableSourceConfig {
    pub fn table_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn validate(&self) -> Result<(), LookupError> {
        let invalid = |reason: &str| LookupError::InvalidConfig {
            table: self.table_name(),
            reason: reason.to_string(),
        };
        if self.input_columns.is_empty() {
            return Err(invalid("at least one input column is required"));
        }
        if self.input_columns.iter().any(|c| c.trim().is_empty()) {
            return Err(invalid("input column names must not be empty"));
        }
        if self.classification_code_column.trim().is_empty() {
            return Err(invalid("classification code column must not be empty"));
        }
        if self.classification_name_column.trim().is_empty() {
            return Err(invalid("classification name column must not be empty"));
        }
        if matches!(&self.active_column, Some(c) if c.trim().is_empty()) {
            return Err(invalid("active column name must not be empty"));
        }
        Ok(())
    }

    /// Open the configured file.
    pub fn open(&self) -> Result<File, LookupError> {
        File::open(&self.path).map_err(|error| LookupError::Io {
            path: self.path.display().to_string(),
            error,
        })
    }
}

/// One active source row: its key cells and the classification they map to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub line: u64,
    pub keys: Vec<String>,
    pub classification: Classification,
}

/// Read all active rows from a CSV source.
///
/// Fails on missing columns, CSV syntax errors, and non-numeric codes on
/// active rows. Inactive rows are never parsed beyond their flag.
pub fn read_rows<R: Read>(
    reader: R,
    config: &TableSourceConfig,
) -> Result<Vec<SourceRow>, LookupError> {
    config.validate()?;
    let table = config.table_name();
    let csv_error = |error: csv::Error| LookupError::Csv {
        table: table.clone(),
        error,
    };

    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(csv_error)?.clone();
    let column = |name: &str| -> Result<usize, LookupError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LookupError::MissingColumn {
                table: table.clone(),
                column: name.to_string(),
            })
    };

    let key_columns = config
        .input_columns
        .iter()
        .map(|c| column(c))
        .collect::<Result<Vec<_>, _>>()?;
    let code_column = column(&config.classification_code_column)?;
    let name_column = column(&config.classification_name_column)?;
    let active_column = config.active_column.as_deref().map(column).transpose()?;

    let mut rows = Vec::new();
    let mut inactive = 0usize;

    for record in csv_reader.records() {
        let record = record.map_err(csv_error)?;
        let line = record.position().map_or(0, |p| p.line());

        if let Some(idx) = active_column {
            if !is_active(record.get(idx).unwrap_or_default()) {
                inactive += 1;
                continue;
            }
        }

        let raw_code = record.get(code_column).unwrap_or_default();
        let code = parse_code(raw_code).ok_or_else(|| LookupError::InvalidCode {
            table: table.clone(),
            line,
            value: raw_code.to_string(),
        })?;
        let name = record.get(name_column).unwrap_or_default().to_string();

        let keys = key_columns
            .iter()
            .filter_map(|&idx| record.get(idx))
            .filter(|cell| !cell.is_empty())
            .map(str::to_string)
            .collect();

        rows.push(SourceRow {
            line,
            keys,
            classification: Classification { code, name },
        });
    }

    tracing::debug!(table = %table, active = rows.len(), inactive, "lookup source read");
    Ok(rows)
}

/// Whether an active-flag cell marks the row as active.
pub fn is_active(flag: &str) -> bool {
    let flag = flag.trim();
    ACTIVE_VALUES.iter().any(|v| flag.eq_ignore_ascii_case(v))
}

/// Parse an integer code. Integral floats ("8997.0", as written by
/// spreadsheet exports) are accepted.
pub fn parse_code(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(code) = raw.parse::<i64>() {
        return Some(code);
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}
