//! Code ↔ name index over known classifications, used to resolve ML labels.

use std::collections::HashMap;

use crate::models::{Classification, ClassificationEntry};

#[derive(Debug, Clone, Default)]
pub struct ClassificationIndex {
    by_code: HashMap<i64, String>,
    by_name: HashMap<String, i64>,
}

impl ClassificationIndex {
    /// First occurrence of a code (and of a name) wins.
    pub fn from_classifications<'a>(
        classifications: impl IntoIterator<Item = &'a Classification>,
    ) -> Self {
        let mut index = Self::default();
        for c in classifications {
            index.by_code.entry(c.code).or_insert_with(|| c.name.clone());
            index
                .by_name
                .entry(c.name.trim().to_lowercase())
                .or_insert(c.code);
        }
        index
    }

    pub fn name_for_code(&self, code: i64) -> Option<&str> {
        self.by_code.get(&code).map(String::as_str)
    }

    pub fn code_for_name(&self, name: &str) -> Option<i64> {
        self.by_name.get(&name.trim().to_lowercase()).copied()
    }

    /// Resolve a classifier label. Numeric labels are codes, anything else
    /// is a classification name. Unknown labels resolve to `None`.
    pub fn resolve_label(&self, label: &str) -> Option<ClassificationEntry> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        if let Ok(code) = label.parse::<i64>() {
            let name = self.name_for_code(code)?;
            return Some(Classification::new(code, name).into());
        }
        let code = self.code_for_name(label)?;
        let name = self.name_for_code(code)?;
        Some(Classification::new(code, name).into())
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
