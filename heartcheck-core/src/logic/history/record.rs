use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::logic::features::FeatureVector;
use crate::logic::model::{PredictionResult, RiskLabel};

/// One past prediction, with a subset of its inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Local wall-clock time, second precision
    pub timestamp: NaiveDateTime,
    pub label: RiskLabel,
    pub confidence: f64,
    pub age: f64,
    pub sex: f64,
    pub trestbps: f64,
    pub chol: f64,
    pub thalach: f64,
}

impl HistoryEntry {
    pub fn from_prediction(
        at: NaiveDateTime,
        features: &FeatureVector,
        result: &PredictionResult,
    ) -> Self {
        let field = |name: &str| features.get_by_name(name).unwrap_or_default();

        Self {
            timestamp: at.with_nanosecond(0).unwrap_or(at),
            label: result.label,
            confidence: result.confidence,
            age: field("age"),
            sex: field("sex"),
            trestbps: field("trestbps"),
            chol: field("chol"),
            thalach: field("thalach"),
        }
    }
}
