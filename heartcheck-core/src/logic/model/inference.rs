//! Inference Engine - scaler + classifier pair
//!
//! Artifacts are loaded once at startup and reused for every prediction.
//! A missing artifact is fatal for the caller; nothing here retries.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::features::FeatureVector;
use super::classifier::{load_classifier, Classifier};
use super::scaler::StandardScaler;

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Failure to load a model or scaler artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("invalid artifact {}: {reason}", .path.display())]
    ArtifactInvalid { path: PathBuf, reason: String },

    #[error("failed to read artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ArtifactError {
    pub(crate) fn invalid(path: &Path, reason: impl Into<String>) -> Self {
        ArtifactError::ArtifactInvalid {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Failure while running a loaded model
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("inference runtime error: {0}")]
    Runtime(String),

    #[error("unexpected model output: {0}")]
    BadOutput(String),
}

/// Read an artifact file, mapping absence to `ArtifactNotFound`
pub(crate) fn read_artifact(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::ArtifactNotFound(path.to_path_buf())
        } else {
            ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Binary risk label. Class 1 is `AtRisk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    #[serde(rename = "Low Risk")]
    LowRisk,
    #[serde(rename = "At Risk")]
    AtRisk,
}

impl RiskLabel {
    pub fn from_class(class_index: usize) -> Self {
        if class_index == 1 {
            RiskLabel::AtRisk
        } else {
            RiskLabel::LowRisk
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLabel::LowRisk => "Low Risk",
            RiskLabel::AtRisk => "At Risk",
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RiskLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low Risk" => Ok(RiskLabel::LowRisk),
            "At Risk" => Ok(RiskLabel::AtRisk),
            other => Err(format!("unknown risk label: {}", other)),
        }
    }
}

/// Prediction output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: RiskLabel,
    /// Probability of the predicted class, in percent, two decimals
    pub confidence: f64,
    pub class_index: usize,
    pub inference_time_us: u64,
}

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub scaler_path: String,
    pub model_kind: String,
    pub loaded_at: DateTime<Utc>,
}

/// Engine status for clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub metadata: ModelMetadata,
    pub avg_latency_ms: f32,
    pub inference_count: u64,
}

// ============================================================================
// PREDICTION
// ============================================================================

/// Round to two decimals, the precision confidence is reported at
pub fn round_confidence(percent: f64) -> f64 {
    (percent * 100.0).round() / 100.0
}

/// Scale `features`, classify, and report the predicted class with its
/// probability. Ties go to class 0. Input values are not range-checked.
pub fn predict(
    model: &dyn Classifier,
    scaler: &StandardScaler,
    features: &FeatureVector,
) -> Result<PredictionResult, InferenceError> {
    let start_time = Instant::now();

    let scaled = scaler.transform(features);
    let probabilities = model.predict_proba(&scaled)?;

    let class_index = if probabilities[1] > probabilities[0] { 1 } else { 0 };
    let confidence = round_confidence(probabilities[class_index] * 100.0);

    Ok(PredictionResult {
        label: RiskLabel::from_class(class_index),
        confidence,
        class_index,
        inference_time_us: start_time.elapsed().as_micros() as u64,
    })
}

/// Load the classifier and scaler artifacts
pub fn load_artifacts(
    model_path: &Path,
    scaler_path: &Path,
) -> Result<(Box<dyn Classifier>, StandardScaler), ArtifactError> {
    let model = load_classifier(model_path)?;
    let scaler = StandardScaler::load(scaler_path)?;
    Ok((model, scaler))
}

// ============================================================================
// ENGINE
// ============================================================================

/// Loaded artifact pair plus latency statistics
pub struct InferenceEngine {
    model: Box<dyn Classifier>,
    scaler: StandardScaler,
    metadata: ModelMetadata,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl InferenceEngine {
    /// Load both artifacts from disk
    pub fn load(model_path: &Path, scaler_path: &Path) -> Result<Self, ArtifactError> {
        log::info!(
            "Loading model artifacts: model={}, scaler={}",
            model_path.display(),
            scaler_path.display()
        );

        let (model, scaler) = load_artifacts(model_path, scaler_path)?;
        let engine = Self::from_parts(
            model,
            scaler,
            model_path.display().to_string(),
            scaler_path.display().to_string(),
        );

        log::info!("Model loaded ({})", engine.metadata.model_kind);
        Ok(engine)
    }

    /// Wrap an already-built model and scaler
    pub fn from_parts(
        model: Box<dyn Classifier>,
        scaler: StandardScaler,
        model_path: String,
        scaler_path: String,
    ) -> Self {
        let metadata = ModelMetadata {
            model_path,
            scaler_path,
            model_kind: model.kind().to_string(),
            loaded_at: Utc::now(),
        };

        Self {
            model,
            scaler,
            metadata,
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        }
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, InferenceError> {
        let result = predict(self.model.as_ref(), &self.scaler, features)?;

        self.latency_sum_us.fetch_add(result.inference_time_us, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        log::debug!(
            "Prediction: {} ({:.2}%) in {}us",
            result.label,
            result.confidence,
            result.inference_time_us
        );

        Ok(result)
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub fn status(&self) -> EngineStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        EngineStatus {
            model_loaded: true,
            metadata: self.metadata.clone(),
            avg_latency_ms: avg,
            inference_count: count,
        }
    }
}
