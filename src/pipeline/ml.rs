//! ML fallback classifier seam.
//!
//! The cascade only needs `predict(text) -> Option<label>`. The label is a
//! classification name (or code); resolving it is the cascade's job.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MlError {
    #[error("ML classifier is not reachable at {0}")]
    Unreachable(String),

    #[error("ML classifier timed out after {0}s")]
    Timeout(u64),

    #[error("ML classifier returned status {0}")]
    Status(u16),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed ML classifier response: {0}")]
    MalformedResponse(String),
}

/// Opaque text classifier used when no lookup table matches.
pub trait MlClassifier: Send + Sync {
    /// Predict a label for raw contention text. `Ok(None)` means "no opinion".
    fn predict(&self, text: &str) -> Result<Option<String>, MlError>;

    /// Short identifier for logs.
    fn describe(&self) -> String;
}

/// Remote inference endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MlConfig {
    pub endpoint_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

impl MlConfig {
    pub fn new(endpoint_url: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Request body for the inference endpoint.
#[derive(Serialize)]
struct PredictRequest<'a> {
    text: &'a str,
}

/// Response body from the inference endpoint.
#[derive(Deserialize)]
struct PredictResponse {
    label: Option<String>,
}

/// Blocking HTTP client for a remote inference endpoint.
///
/// `POST {endpoint_url}` with `{"text": ...}`, expects `{"label": string|null}`.
pub struct HttpMlClassifier {
    endpoint_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpMlClassifier {
    pub fn new(config: &MlConfig) -> Result<Self, MlError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MlError::HttpClient(e.to_string()))?;

        Ok(Self {
            endpoint_url: config.endpoint_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }
}

impl MlClassifier for HttpMlClassifier {
    fn predict(&self, text: &str) -> Result<Option<String>, MlError> {
        let response = self
            .client
            .post(&self.endpoint_url)
            .json(&PredictRequest { text })
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    MlError::Unreachable(self.endpoint_url.clone())
                } else if e.is_timeout() {
                    MlError::Timeout(self.timeout_secs)
                } else {
                    MlError::HttpClient(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MlError::Status(status.as_u16()));
        }

        let body: PredictResponse = response
            .json()
            .map_err(|e| MlError::MalformedResponse(e.to_string()))?;

        Ok(body
            .label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty()))
    }

    fn describe(&self) -> String {
        format!("http:{}", self.endpoint_url)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Returns a fixed answer for every call.
    pub struct FixedClassifier(pub Option<&'static str>);

    impl MlClassifier for FixedClassifier {
        fn predict(&self, _text: &str) -> Result<Option<String>, MlError> {
            Ok(self.0.map(str::to_string))
        }

        fn describe(&self) -> String {
            "fixed".into()
        }
    }

    /// Always fails as if the endpoint were down.
    pub struct UnreachableClassifier;

    impl MlClassifier for UnreachableClassifier {
        fn predict(&self, _text: &str) -> Result<Option<String>, MlError> {
            Err(MlError::Unreachable("http://127.0.0.1:9".into()))
        }

        fn describe(&self) -> String {
            "unreachable".into()
        }
    }
}
