//! Claim classification endpoints.
//!
//! Both endpoints run the same cascade. The expanded endpoint uses lookup
//! tables only; the hybrid endpoint adds the ML fallback and runs on the
//! blocking pool because the ML call is a blocking HTTP request.
//! Statistics are logged explicitly after classification. Bodies that do not
//! deserialize into a `Claim` get the structured 400 error.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{Claim, ClassifierResponse};
use crate::pipeline::cascade::classify_claim_with_metadata;
use crate::pipeline::stats::log_claim_stats;

pub const EXPANDED_ENDPOINT: &str = "expanded";
pub const HYBRID_ENDPOINT: &str = "hybrid";

/// Reject claims the cascade cannot meaningfully process.
pub fn validate_claim(claim: &Claim) -> Result<(), ApiError> {
    if claim.contentions.is_empty() {
        return Err(ApiError::Validation(
            "contentions must contain at least one contention".into(),
        ));
    }
    for (i, contention) in claim.contentions.iter().enumerate() {
        if contention.contention_type.is_increase() && contention.diagnostic_code.is_none() {
            return Err(ApiError::Validation(format!(
                "contentions[{i}]: diagnostic_code is required for INCREASE contentions"
            )));
        }
    }
    Ok(())
}

/// `POST /expanded-contention-classification`
pub async fn expanded(
    State(ctx): State<ApiContext>,
    payload: Result<Json<Claim>, JsonRejection>,
) -> Result<Json<ClassifierResponse>, ApiError> {
    let Json(claim) = payload?;
    validate_claim(&claim)?;

    let (response, metadata) = classify_claim_with_metadata(&claim, ctx.core.tables(), None);
    log_claim_stats(ctx.sink.as_ref(), EXPANDED_ENDPOINT, &claim, &response, &metadata);

    Ok(Json(response))
}

/// `POST /hybrid-contention-classification`
pub async fn hybrid(
    State(ctx): State<ApiContext>,
    payload: Result<Json<Claim>, JsonRejection>,
) -> Result<Json<ClassifierResponse>, ApiError> {
    let Json(claim) = payload?;
    validate_claim(&claim)?;

    let ml = ctx.core.ml_classifier()?;
    let core = ctx.core.clone();
    let sink = ctx.sink.clone();

    let response = tokio::task::spawn_blocking(move || {
        let (response, metadata) =
            classify_claim_with_metadata(&claim, core.tables(), ml.as_deref());
        log_claim_stats(sink.as_ref(), HYBRID_ENDPOINT, &claim, &response, &metadata);
        response
    })
    .await?;

    Ok(Json(response))
}
