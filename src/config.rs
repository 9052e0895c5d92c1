use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ClassificationEntry;
use crate::pipeline::lookup::{LookupError, TableSourceConfig};
use crate::pipeline::ml::MlConfig;

/// Application-level constants
pub const APP_NAME: &str = "contention-classifier";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// JSON configuration file. When unset, defaults are used.
pub const CONFIG_PATH_ENV: &str = "CLASSIFIER_CONFIG";
/// Directory holding the default CSV sources.
pub const DATA_DIR_ENV: &str = "CLASSIFIER_DATA_DIR";
pub const BIND_ADDR_ENV: &str = "CLASSIFIER_BIND_ADDR";
/// Enables the ML fallback when set.
pub const ML_URL_ENV: &str = "CLASSIFIER_ML_URL";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8120";

pub const DIAGNOSTIC_CODE_TABLE_FILE: &str = "diagnostic_code_lookup_table.csv";
pub const DROPDOWN_TABLE_FILE: &str = "contention_dropdown_table.csv";
pub const EXPANDED_TABLE_FILE: &str = "contention_expanded_lookup_table.csv";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,contention_classifier=info"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid bind address '{0}'")]
    InvalidBindAddr(String),

    #[error("Invalid ML configuration: {0}")]
    InvalidMl(String),

    #[error(transparent)]
    Table(#[from] LookupError),
}

// ═══════════════════════════════════════════════════════════
// AppConfig
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    pub diagnostic_code_table: TableSourceConfig,
    pub dropdown_table: TableSourceConfig,
    pub expanded_table: TableSourceConfig,
    #[serde(default)]
    pub ml: Option<MlConfig>,
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn phrase_table(path: PathBuf) -> TableSourceConfig {
    TableSourceConfig {
        path,
        input_columns: vec!["CONTENTION TEXT".into()],
        classification_code_column: "CLASSIFICATION CODE".into(),
        classification_name_column: "CLASSIFICATION TEXT".into(),
        active_column: Some("ACTIVE".into()),
        default: ClassificationEntry::unclassified(),
    }
}

impl AppConfig {
    /// Default table layout rooted at `data_dir`, no ML.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            bind_addr: default_bind_addr(),
            diagnostic_code_table: TableSourceConfig {
                path: data_dir.join(DIAGNOSTIC_CODE_TABLE_FILE),
                input_columns: vec!["DIAGNOSTIC_CODE".into()],
                classification_code_column: "CLASSIFICATION_CODE".into(),
                classification_name_column: "CLASSIFICATION_TEXT".into(),
                active_column: None,
                default: ClassificationEntry::unclassified(),
            },
            dropdown_table: phrase_table(data_dir.join(DROPDOWN_TABLE_FILE)),
            expanded_table: phrase_table(data_dir.join(EXPANDED_TABLE_FILE)),
            ml: None,
        }
    }

    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load from the process environment and validate.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `env` as the variable lookup.
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match env(CONFIG_PATH_ENV) {
            Some(path) => {
                tracing::info!(path = %path, "Loading configuration file");
                Self::from_file(Path::new(&path))?
            }
            None => {
                let data_dir = env(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
                Self::with_data_dir(data_dir)
            }
        };

        if let Some(addr) = env(BIND_ADDR_ENV) {
            config.bind_addr = addr;
        }
        if let Some(url) = env(ML_URL_ENV) {
            match config.ml.as_mut() {
                Some(ml) => ml.endpoint_url = url,
                None => config.ml = Some(MlConfig::new(url)),
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;
        self.diagnostic_code_table.validate()?;
        self.dropdown_table.validate()?;
        self.expanded_table.validate()?;
        if let Some(ml) = &self.ml {
            if ml.endpoint_url.trim().is_empty() {
                return Err(ConfigError::InvalidMl("endpoint_url must not be empty".into()));
            }
            if ml.timeout_secs == 0 {
                return Err(ConfigError::InvalidMl("timeout_secs must be positive".into()));
            }
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(self.bind_addr.clone()))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_data_dir(DEFAULT_DATA_DIR)
    }
}
