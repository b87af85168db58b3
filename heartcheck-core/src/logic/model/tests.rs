//! Inference tests against small fixture artifacts

use std::fs;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

use super::*;
use crate::logic::features::{FeatureVector, FeatureVectorBuilder, FEATURE_COUNT};

const MEANS: [f64; FEATURE_COUNT] = [
    54.4, 0.68, 0.97, 131.6, 246.3, 0.15, 0.53, 149.6, 0.33, 1.04, 1.4, 0.73, 2.31,
];
const SCALES: [f64; FEATURE_COUNT] = [
    9.0, 0.47, 1.03, 17.5, 51.8, 0.36, 0.53, 22.9, 0.47, 1.16, 0.62, 1.02, 0.61,
];
const COEFFICIENTS: [f64; FEATURE_COUNT] = [
    -0.08, -0.75, 0.86, -0.28, -0.21, 0.05, 0.24, 0.43, -0.48, -0.55, 0.38, -0.8, -0.55,
];

fn write_artifacts(dir: &TempDir) -> (PathBuf, PathBuf) {
    let model_path = dir.path().join("heart_disease_model.json");
    let scaler_path = dir.path().join("scaler.json");

    let model = serde_json::json!({ "coefficients": COEFFICIENTS, "intercept": 0.17 });
    let scaler = serde_json::json!({ "mean": MEANS, "scale": SCALES });

    fs::write(&model_path, model.to_string()).unwrap();
    fs::write(&scaler_path, scaler.to_string()).unwrap();
    (model_path, scaler_path)
}

fn sample_patient() -> FeatureVector {
    FeatureVectorBuilder::new()
        .age(52.0)
        .sex(1.0)
        .cp(0.0)
        .trestbps(120.0)
        .chol(200.0)
        .fbs(0.0)
        .restecg(1.0)
        .thalach(150.0)
        .exang(0.0)
        .oldpeak(1.0)
        .slope(2.0)
        .ca(0.0)
        .thal(2.0)
        .build()
}

#[test]
fn test_load_artifacts_missing_model() {
    let dir = tempdir().unwrap();
    let (_, scaler_path) = write_artifacts(&dir);

    let err = load_artifacts(&dir.path().join("absent.json"), &scaler_path).err().unwrap();
    assert!(matches!(err, ArtifactError::ArtifactNotFound(_)));
}

#[test]
fn test_load_artifacts_missing_scaler() {
    let dir = tempdir().unwrap();
    let (model_path, _) = write_artifacts(&dir);

    let err = InferenceEngine::load(&model_path, &dir.path().join("absent.json")).err().unwrap();
    assert!(matches!(err, ArtifactError::ArtifactNotFound(_)));
}

#[test]
fn test_missing_onnx_model() {
    let dir = tempdir().unwrap();
    let err = load_classifier(&dir.path().join("model.onnx")).err().unwrap();
    assert!(matches!(err, ArtifactError::ArtifactNotFound(_)));
}

#[test]
fn test_prediction_is_reproducible() {
    let dir = tempdir().unwrap();
    let (model_path, scaler_path) = write_artifacts(&dir);
    let engine = InferenceEngine::load(&model_path, &scaler_path).unwrap();

    let patient = sample_patient();
    let first = engine.predict(&patient).unwrap();
    for _ in 0..10 {
        let again = engine.predict(&patient).unwrap();
        assert_eq!(again.label, first.label);
        assert_eq!(again.confidence, first.confidence);
    }

    let status = engine.status();
    assert_eq!(status.inference_count, 11);
    assert_eq!(status.metadata.model_kind, "logistic_regression");
}

#[test]
fn test_confidence_is_predicted_class_probability() {
    let (model, scaler) = (
        LogisticModel::new(COEFFICIENTS.to_vec(), 0.17).unwrap(),
        StandardScaler::new(MEANS.to_vec(), SCALES.to_vec()).unwrap(),
    );
    let patient = sample_patient();

    let probs = model.predict_proba(&scaler.transform(&patient)).unwrap();
    let result = predict(&model, &scaler, &patient).unwrap();

    let expected = probs[result.class_index] * 100.0;
    assert!(result.confidence >= 50.0);
    assert!((result.confidence - expected).abs() <= 0.005 + 1e-9);
    assert_eq!(result.label, RiskLabel::from_class(result.class_index));
}

#[test]
fn test_label_and_confidence_bounds_over_grid() {
    let model = LogisticModel::new(COEFFICIENTS.to_vec(), 0.17).unwrap();
    let scaler = StandardScaler::new(MEANS.to_vec(), SCALES.to_vec()).unwrap();

    for age in [1.0, 30.0, 60.0, 120.0] {
        for cp in [0.0, 1.0, 2.0, 3.0] {
            for thalach in [60.0, 140.0, 220.0] {
                for oldpeak in [0.0, 4.5, 10.0] {
                    let patient = FeatureVectorBuilder::new()
                        .age(age)
                        .cp(cp)
                        .trestbps(130.0)
                        .chol(240.0)
                        .thalach(thalach)
                        .oldpeak(oldpeak)
                        .thal(2.0)
                        .build();
                    let result = predict(&model, &scaler, &patient).unwrap();
                    assert!(matches!(result.label, RiskLabel::AtRisk | RiskLabel::LowRisk));
                    assert!((0.0..=100.0).contains(&result.confidence));
                }
            }
        }
    }
}

#[test]
fn test_out_of_domain_input_is_accepted() {
    let model = LogisticModel::new(COEFFICIENTS.to_vec(), 0.17).unwrap();
    let scaler = StandardScaler::new(MEANS.to_vec(), SCALES.to_vec()).unwrap();
    let patient = FeatureVectorBuilder::new().age(-40.0).chol(5000.0).thal(9.0).build();

    assert!(predict(&model, &scaler, &patient).is_ok());
}

#[test]
fn test_tie_goes_to_low_risk() {
    let model = LogisticModel::new(vec![0.0; FEATURE_COUNT], 0.0).unwrap();
    let result = predict(&model, &StandardScaler::identity(), &sample_patient()).unwrap();
    assert_eq!(result.label, RiskLabel::LowRisk);
    assert_eq!(result.confidence, 50.0);
}

#[test]
fn test_risk_label_text() {
    assert_eq!(RiskLabel::AtRisk.to_string(), "At Risk");
    assert_eq!("Low Risk".parse::<RiskLabel>().unwrap(), RiskLabel::LowRisk);
    assert!("Maybe".parse::<RiskLabel>().is_err());
    assert_eq!(serde_json::to_string(&RiskLabel::AtRisk).unwrap(), "\"At Risk\"");
}
