use serde::{Deserialize, Serialize};

/// A classification loaded from a source table. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Classification {
    pub code: i64,
    pub name: String,
}

impl Classification {
    pub fn new(code: i64, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
        }
    }
}

/// Result of a table query. A miss is `{ code: None, name: None }`
/// unless the table was configured with another default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationEntry {
    pub code: Option<i64>,
    pub name: Option<String>,
}

impl ClassificationEntry {
    /// The "unclassified" entry.
    pub fn unclassified() -> Self {
        Self::default()
    }

    pub fn is_classified(&self) -> bool {
        self.code.is_some()
    }
}

impl From<Classification> for ClassificationEntry {
    fn from(c: Classification) -> Self {
        Self {
            code: Some(c.code),
            name: Some(c.name),
        }
    }
}

impl From<&Classification> for ClassificationEntry {
    fn from(c: &Classification) -> Self {
        Self {
            code: Some(c.code),
            name: Some(c.name.clone()),
        }
    }
}
