//! Classifiers - pre-fitted binary risk models
//!
//! Two artifact formats are supported:
//! - `.onnx`: any graph exported with a float `probabilities` output of
//!   shape `[1, 2]` (e.g. skl2onnx with zipmap disabled), run through ONNX
//!   Runtime;
//! - anything else: JSON logistic regression parameters
//!   `{"coefficients": [..13], "intercept": f64}`. sklearn attribute dumps
//!   (`coef_` of shape `[1, 13]`, `intercept_` of shape `[1]`) load too.

use std::path::Path;
use ndarray::Array2;
use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize};
use serde::de::Error as _;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Value;

use crate::logic::features::FEATURE_COUNT;
use super::inference::{read_artifact, ArtifactError, InferenceError};

/// Class probabilities, indexed by class: `[p(0), p(1)]`
pub type ClassProbabilities = [f64; 2];

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// A fitted classifier taking already-scaled features
pub trait Classifier: Send + Sync {
    /// Short name of the model family, for status reporting
    fn kind(&self) -> &'static str;

    /// Posterior probability of each class
    fn predict_proba(
        &self,
        scaled: &[f64; FEATURE_COUNT],
    ) -> Result<ClassProbabilities, InferenceError>;
}

/// Load a classifier artifact, picking the format from the file extension
pub fn load_classifier(path: &Path) -> Result<Box<dyn Classifier>, ArtifactError> {
    let is_onnx = path
        .extension()
        .map_or(false, |e| e.eq_ignore_ascii_case("onnx"));

    if is_onnx {
        Ok(Box::new(OnnxClassifier::load(path)?))
    } else {
        Ok(Box::new(LogisticModel::load(path)?))
    }
}

// ============================================================================
// LOGISTIC REGRESSION
// ============================================================================

/// Logistic regression parameters exported from the training notebook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    #[serde(alias = "coef_", deserialize_with = "single_row")]
    pub coefficients: Vec<f64>,
    #[serde(alias = "intercept_", deserialize_with = "single_value")]
    pub intercept: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RowOrMatrix {
    Row(Vec<f64>),
    Matrix(Vec<Vec<f64>>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScalarOrArray {
    Scalar(f64),
    Array(Vec<f64>),
}

/// `[..]` or a one-row `[[..]]`
fn single_row<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
    match RowOrMatrix::deserialize(deserializer)? {
        RowOrMatrix::Row(row) => Ok(row),
        RowOrMatrix::Matrix(mut rows) if rows.len() == 1 => Ok(rows.remove(0)),
        RowOrMatrix::Matrix(rows) => Err(D::Error::custom(format!(
            "expected one coefficient row for a binary model, got {}",
            rows.len()
        ))),
    }
}

/// `x` or a one-element `[x]`
fn single_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match ScalarOrArray::deserialize(deserializer)? {
        ScalarOrArray::Scalar(value) => Ok(value),
        ScalarOrArray::Array(values) if values.len() == 1 => Ok(values[0]),
        ScalarOrArray::Array(values) => Err(D::Error::custom(format!(
            "expected a single intercept, got {}",
            values.len()
        ))),
    }
}

impl LogisticModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self, String> {
        if coefficients.len() != FEATURE_COUNT {
            return Err(format!(
                "expected {} coefficients, got {}",
                FEATURE_COUNT,
                coefficients.len()
            ));
        }
        Ok(Self { coefficients, intercept })
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let content = read_artifact(path)?;
        let raw: LogisticModel = serde_json::from_slice(&content)
            .map_err(|e| ArtifactError::invalid(path, e.to_string()))?;
        Self::new(raw.coefficients, raw.intercept)
            .map_err(|reason| ArtifactError::invalid(path, reason))
    }

    /// Signed distance to the decision boundary
    pub fn decision_function(&self, scaled: &[f64; FEATURE_COUNT]) -> f64 {
        self.coefficients
            .iter()
            .zip(scaled.iter())
            .fold(self.intercept, |acc, (w, x)| acc + w * x)
    }
}

impl Classifier for LogisticModel {
    fn kind(&self) -> &'static str {
        "logistic_regression"
    }

    fn predict_proba(
        &self,
        scaled: &[f64; FEATURE_COUNT],
    ) -> Result<ClassProbabilities, InferenceError> {
        let z = self.decision_function(scaled);
        let positive = 1.0 / (1.0 + (-z).exp());
        Ok([1.0 - positive, positive])
    }
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// ONNX Runtime session. Running a session needs `&mut`, hence the lock.
pub struct OnnxClassifier {
    session: Mutex<Session>,
    output_name: String,
}

impl OnnxClassifier {
    /// Load ONNX model from file
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        log::info!("Loading ONNX model from: {}", path.display());

        if !path.exists() {
            return Err(ArtifactError::ArtifactNotFound(path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(|e| ArtifactError::invalid(path, format!("session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ArtifactError::invalid(path, format!("optimization: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| ArtifactError::invalid(path, format!("load: {}", e)))?;

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name == "probabilities")
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .ok_or_else(|| ArtifactError::invalid(path, "no output defined"))?;

        log::info!("ONNX model loaded (output: {})", output_name);

        Ok(Self {
            session: Mutex::new(session),
            output_name,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn kind(&self) -> &'static str {
        "onnx"
    }

    fn predict_proba(
        &self,
        scaled: &[f64; FEATURE_COUNT],
    ) -> Result<ClassProbabilities, InferenceError> {
        let input: Vec<f32> = scaled.iter().map(|&v| v as f32).collect();
        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), input)
            .map_err(|e| InferenceError::Runtime(format!("array: {}", e)))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| InferenceError::Runtime(format!("tensor: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(format!("inference failed: {}", e)))?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| InferenceError::BadOutput(format!("missing {}", self.output_name)))?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::BadOutput(format!("extract: {}", e)))?;

        match data {
            [negative, positive, ..] => Ok([*negative as f64, *positive as f64]),
            _ => Err(InferenceError::BadOutput(format!(
                "expected 2 class probabilities, got {}",
                data.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_logistic_probabilities_sum_to_one() {
        let model = LogisticModel::new(vec![0.5; FEATURE_COUNT], -1.0).unwrap();
        let probs = model.predict_proba(&[0.3; FEATURE_COUNT]).unwrap();
        assert!((probs[0] + probs[1] - 1.0).abs() < 1e-12);
        assert!(probs[1] > 0.5);
    }

    #[test]
    fn test_logistic_zero_decision_is_even() {
        let model = LogisticModel::new(vec![0.0; FEATURE_COUNT], 0.0).unwrap();
        let probs = model.predict_proba(&[1.0; FEATURE_COUNT]).unwrap();
        assert_eq!(probs, [0.5, 0.5]);
    }

    #[test]
    fn test_load_picks_json_for_non_onnx() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let json = serde_json::json!({
            "coef_": vec![0.1; FEATURE_COUNT],
            "intercept_": 0.2,
        });
        file.write_all(json.to_string().as_bytes()).unwrap();

        let model = load_classifier(file.path()).unwrap();
        assert_eq!(model.kind(), "logistic_regression");
    }

    #[test]
    fn test_load_sklearn_attribute_shapes() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let json = serde_json::json!({
            "coef_": [vec![0.1; FEATURE_COUNT]],
            "intercept_": [-0.4],
        });
        file.write_all(json.to_string().as_bytes()).unwrap();

        let model = LogisticModel::load(file.path()).unwrap();
        assert_eq!(model.coefficients, vec![0.1; FEATURE_COUNT]);
        assert_eq!(model.intercept, -0.4);
    }

    #[test]
    fn test_load_rejects_multiclass_shapes() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let json = serde_json::json!({
            "coef_": [vec![0.1; FEATURE_COUNT], vec![0.2; FEATURE_COUNT]],
            "intercept_": [0.0, 1.0],
        });
        file.write_all(json.to_string().as_bytes()).unwrap();

        let err = LogisticModel::load(file.path()).err().unwrap();
        assert!(matches!(err, ArtifactError::ArtifactInvalid { .. }));
    }

    #[test]
    fn test_load_rejects_wrong_coefficient_count() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"coefficients": [1.0, 2.0], "intercept": 0.0}"#).unwrap();

        let err = load_classifier(file.path()).err().unwrap();
        assert!(matches!(err, ArtifactError::ArtifactInvalid { .. }));
    }
}
