//! Model Module - risk inference
//!
//! Scaler and classifier are separate artifacts; the engine owns one of
//! each for the life of the process.

pub mod classifier;
pub mod inference;
pub mod scaler;

#[cfg(test)]
mod tests;

// Re-export common types
pub use classifier::{load_classifier, Classifier, LogisticModel, OnnxClassifier};
pub use inference::{
    load_artifacts, predict, ArtifactError, EngineStatus, InferenceEngine, InferenceError,
    ModelMetadata, PredictionResult, RiskLabel,
};
pub use scaler::StandardScaler;
