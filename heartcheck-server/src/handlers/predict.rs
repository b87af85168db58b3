//! Prediction handler

use axum::{extract::State, Json};
use validator::Validate;

use heartcheck_core::FeatureVector;

use crate::middleware::auth::UserContext;
use crate::models::{describe_violations, PredictRequest, PredictResponse};
use crate::{AppError, AppResult, AppState};

/// Classify one patient and record the result in the caller's session
pub async fn predict(
    State(state): State<AppState>,
    user: UserContext,
    Json(req): Json<PredictRequest>,
) -> AppResult<Json<PredictResponse>> {
    req.validate()?;

    let features = FeatureVector::from(&req);
    let violations = features.domain_violations();
    if !violations.is_empty() {
        return Err(AppError::ValidationError(describe_violations(&violations)));
    }

    let result = state.engine.predict(&features)?;

    user.session.lock().record_prediction(features, result);

    tracing::debug!(
        "Prediction for {}: {} ({:.2}%)",
        user.username,
        result.label,
        result.confidence
    );

    Ok(Json(result.into()))
}
