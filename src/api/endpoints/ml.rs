//! ML classifier management endpoint.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ReinitializeResponse};

/// `POST /ml-classifier/reinitialize` — rebuild the ML client from
/// configuration and swap it in. Requests already running keep the old one.
pub async fn reinitialize(
    State(ctx): State<ApiContext>,
) -> Result<Json<ReinitializeResponse>, ApiError> {
    let core = ctx.core.clone();
    let config = ctx.ml_config.clone();

    // Building the blocking HTTP client must happen off the async workers.
    let ml_enabled =
        tokio::task::spawn_blocking(move || core.reinitialize_ml(config.as_ref())).await??;

    Ok(Json(ReinitializeResponse { ml_enabled }))
}
