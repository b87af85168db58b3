//! HeartCheck Core
//!
//! Building blocks behind the heart disease risk service:
//!
//! ```text
//! FeatureVector ──► InferenceEngine ──► PredictionResult
//!                                           │
//!                     ┌─────────────────────┼──────────────────┐
//!                     ▼                     ▼                  ▼
//!               SessionContext ──►     HistoryLog        report::render
//!                                    (CSV export)          (PDF bytes)
//!
//! CsvCredentialStore + CredentialVerifier: account sign-up / login
//! ```

pub mod constants;
pub mod logic;

pub use logic::credentials::{
    verifier_by_name, Argon2Verifier, CredentialError, CredentialStore, CredentialVerifier,
    CsvCredentialStore, PlaintextVerifier, UserAccount,
};
pub use logic::features::{FeatureVector, FeatureVectorBuilder, LayoutInfo, FEATURE_COUNT};
pub use logic::history::{HistoryEntry, HistoryError, HistoryLog};
pub use logic::model::{
    ArtifactError, EngineStatus, InferenceEngine, InferenceError, PredictionResult, RiskLabel,
};
pub use logic::report::ReportError;
pub use logic::session::{LastPrediction, SessionContext};
