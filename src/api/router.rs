//! Classifier API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Every route passes through the access logger.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::ClassifierContext;
use crate::pipeline::ml::MlConfig;
use crate::pipeline::stats::LogSink;

/// Build the classifier router.
pub fn classifier_router(
    core: Arc<ClassifierContext>,
    sink: Arc<dyn LogSink>,
    ml_config: Option<MlConfig>,
) -> Router {
    build_router(ApiContext::new(core, sink, ml_config))
}

pub(crate) fn build_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/expanded-contention-classification",
            post(endpoints::classify::expanded),
        )
        .route(
            "/hybrid-contention-classification",
            post(endpoints::classify::hybrid),
        )
        .route(
            "/ml-classifier/reinitialize",
            post(endpoints::ml::reinitialize),
        )
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
}
