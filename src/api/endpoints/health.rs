//! Health check endpoint.

use axum::extract::State;
use axum::Json;

use crate::api::types::{ApiContext, HealthResponse};

/// `GET /health` — liveness plus loaded table sizes.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    let counts = ctx.core.table_counts();

    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        diagnostic_code_entries: counts.diagnostic_code,
        dropdown_entries: counts.dropdown,
        expanded_entries: counts.expanded,
        ml_enabled: ctx.core.ml_enabled(),
    })
}
