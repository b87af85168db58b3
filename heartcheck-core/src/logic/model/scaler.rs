//! Standard Scaler - per-feature centering and scaling
//!
//! Parameters come from the fitted scaler artifact:
//! `{"mean": [..13], "scale": [..13]}` (sklearn's `mean_` / `scale_`
//! spellings are accepted too).

use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::logic::features::{FeatureVector, FEATURE_COUNT};
use super::inference::ArtifactError;

/// Fitted standardization parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    #[serde(alias = "mean_")]
    pub mean: Vec<f64>,
    #[serde(alias = "scale_")]
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Build from explicit parameters, checking their length
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, String> {
        let scaler = Self { mean, scale };
        scaler.check_shape()?;
        Ok(scaler)
    }

    /// Identity transform (mean 0, scale 1)
    pub fn identity() -> Self {
        Self {
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
        }
    }

    /// Load scaler parameters from a JSON artifact
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let content = super::inference::read_artifact(path)?;
        let scaler: StandardScaler = serde_json::from_slice(&content)
            .map_err(|e| ArtifactError::invalid(path, e.to_string()))?;
        scaler
            .check_shape()
            .map_err(|reason| ArtifactError::invalid(path, reason))?;
        Ok(scaler)
    }

    fn check_shape(&self) -> Result<(), String> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(format!(
                "expected {} means and scales, got {} and {}",
                FEATURE_COUNT,
                self.mean.len(),
                self.scale.len()
            ));
        }
        Ok(())
    }

    /// Apply `(x - mean) / scale` to every feature.
    /// A zero scale is treated as 1, as sklearn does for constant columns.
    pub fn transform(&self, features: &FeatureVector) -> [f64; FEATURE_COUNT] {
        let mut scaled = [0.0f64; FEATURE_COUNT];

        for (i, value) in features.as_array().iter().enumerate() {
            let scale = if self.scale[i] == 0.0 { 1.0 } else { self.scale[i] };
            scaled[i] = (value - self.mean[i]) / scale;
        }

        scaled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::FeatureVectorBuilder;

    #[test]
    fn test_identity_transform_is_noop() {
        let vector = FeatureVectorBuilder::new().age(52.0).chol(200.0).build();
        let scaled = StandardScaler::identity().transform(&vector);
        assert_eq!(&scaled, vector.as_array());
    }

    #[test]
    fn test_transform_centers_and_scales() {
        let mut mean = vec![0.0; FEATURE_COUNT];
        let mut scale = vec![1.0; FEATURE_COUNT];
        mean[0] = 50.0;
        scale[0] = 10.0;
        scale[4] = 0.0;
        let scaler = StandardScaler::new(mean, scale).unwrap();

        let vector = FeatureVectorBuilder::new().age(70.0).chol(240.0).build();
        let scaled = scaler.transform(&vector);
        assert_eq!(scaled[0], 2.0);
        assert_eq!(scaled[4], 240.0);
    }

    #[test]
    fn test_rejects_wrong_shape() {
        assert!(StandardScaler::new(vec![0.0; 3], vec![1.0; 3]).is_err());
    }

    #[test]
    fn test_accepts_sklearn_field_names() {
        let json = serde_json::json!({
            "mean_": vec![1.0; FEATURE_COUNT],
            "scale_": vec![2.0; FEATURE_COUNT],
        });
        let scaler: StandardScaler = serde_json::from_value(json).unwrap();
        assert_eq!(scaler.mean[0], 1.0);
        assert_eq!(scaler.scale[12], 2.0);
    }
}
