//! Shared types for the HTTP layer.

use std::sync::Arc;

use serde::Serialize;

use crate::core_state::ClassifierContext;
use crate::pipeline::ml::MlConfig;
use crate::pipeline::stats::LogSink;

// ═══════════════════════════════════════════════════════════
// API context — shared state for the classifier router
// ═══════════════════════════════════════════════════════════

/// Shared context for all routes.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<ClassifierContext>,
    /// Receives the classification statistics of every request.
    pub sink: Arc<dyn LogSink>,
    /// Used by `/ml-classifier/reinitialize` to rebuild the client.
    pub ml_config: Option<MlConfig>,
}

impl ApiContext {
    pub fn new(
        core: Arc<ClassifierContext>,
        sink: Arc<dyn LogSink>,
        ml_config: Option<MlConfig>,
    ) -> Self {
        Self {
            core,
            sink,
            ml_config,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Response bodies
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub diagnostic_code_entries: usize,
    pub dropdown_entries: usize,
    pub expanded_entries: usize,
    pub ml_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct ReinitializeResponse {
    pub ml_enabled: bool,
}
