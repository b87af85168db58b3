//! Prediction DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use heartcheck_core::logic::features::DomainViolation;
use heartcheck_core::logic::report::risk_summary;
use heartcheck_core::{FeatureVector, FeatureVectorBuilder, PredictionResult, RiskLabel};

/// The 13 clinical fields, canonical numeric encoding.
///
/// Continuous ranges are checked by `validate()`; categorical codes are
/// checked against the feature schema after conversion.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PredictRequest {
    #[validate(range(min = 1.0, max = 120.0))]
    pub age: f64,
    pub sex: f64,
    pub cp: f64,
    #[validate(range(min = 80.0, max = 220.0))]
    pub trestbps: f64,
    #[validate(range(min = 100.0, max = 600.0))]
    pub chol: f64,
    pub fbs: f64,
    pub restecg: f64,
    #[validate(range(min = 60.0, max = 220.0))]
    pub thalach: f64,
    pub exang: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub oldpeak: f64,
    pub slope: f64,
    pub ca: f64,
    pub thal: f64,
}

impl From<&PredictRequest> for FeatureVector {
    fn from(req: &PredictRequest) -> Self {
        FeatureVectorBuilder::new()
            .age(req.age)
            .sex(req.sex)
            .cp(req.cp)
            .trestbps(req.trestbps)
            .chol(req.chol)
            .fbs(req.fbs)
            .restecg(req.restecg)
            .thalach(req.thalach)
            .exang(req.exang)
            .oldpeak(req.oldpeak)
            .slope(req.slope)
            .ca(req.ca)
            .thal(req.thal)
            .build()
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub label: RiskLabel,
    pub confidence: f64,
    /// `At Risk (Confidence: 87.50%)`
    pub summary: String,
}

impl From<PredictionResult> for PredictResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            label: result.label,
            confidence: result.confidence,
            summary: risk_summary(result.label, result.confidence),
        }
    }
}

/// `sex: 3 (expected {0, 1}); chol: 700 (expected [100, 600])`
pub fn describe_violations(violations: &[DomainViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {} (expected {})", v.field, v.value, v.expected))
        .collect::<Vec<_>>()
        .join("; ")
}
