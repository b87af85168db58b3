//! Feature Vector - Core data structure for model input
//!
//! Fixed-size, ordered by `FEATURE_LAYOUT`. The array type guarantees the
//! classifier always sees exactly `FEATURE_COUNT` values.

use serde::{Deserialize, Serialize};
use super::layout::{
    feature_index, DomainViolation, FEATURE_COUNT, FEATURE_LAYOUT, FIELD_SPECS,
};

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// One patient's input, in layout order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create from raw values in layout order
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Get values as array reference
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_index(name).and_then(|i| self.get(i))
    }

    /// `(name, value)` pairs in layout order
    pub fn iter_named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_LAYOUT.iter().copied().zip(self.values.iter().copied())
    }

    /// Fields whose value falls outside the schema domain.
    ///
    /// Inference never calls this; it is for callers that accept raw input.
    pub fn domain_violations(&self) -> Vec<DomainViolation> {
        FIELD_SPECS
            .iter()
            .zip(self.values.iter())
            .filter(|(spec, value)| !spec.domain.contains(**value))
            .map(|(spec, value)| DomainViolation {
                field: spec.name.to_string(),
                value: *value,
                expected: spec.domain.describe(),
            })
            .collect()
    }

    /// Ordered `(key, display value)` pairs for reports
    pub fn to_report_fields(&self) -> Vec<(String, String)> {
        self.iter_named()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self::from_values(values)
    }
}

// ============================================================================
// BUILDER PATTERN
// ============================================================================

/// Builder for creating FeatureVector with named setters.
/// Unset fields stay at 0.
#[derive(Debug, Default)]
pub struct FeatureVectorBuilder {
    values: [f64; FEATURE_COUNT],
}

macro_rules! named_setters {
    ($($name:ident => $index:expr),* $(,)?) => {
        $(
            pub fn $name(mut self, value: f64) -> Self {
                self.values[$index] = value;
                self
            }
        )*
    };
}

impl FeatureVectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    named_setters! {
        age => 0,
        sex => 1,
        cp => 2,
        trestbps => 3,
        chol => 4,
        fbs => 5,
        restecg => 6,
        thalach => 7,
        exang => 8,
        oldpeak => 9,
        slope => 10,
        ca => 11,
        thal => 12,
    }

    /// Set feature by name dynamically. Unknown names are ignored.
    pub fn set(mut self, name: &str, value: f64) -> Self {
        if let Some(index) = feature_index(name) {
            self.values[index] = value;
        }
        self
    }

    pub fn build(self) -> FeatureVector {
        FeatureVector::from_values(self.values)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_named_fields() {
        let vector = FeatureVectorBuilder::new()
            .age(52.0)
            .chol(200.0)
            .thal(2.0)
            .build();

        assert_eq!(vector.get_by_name("age"), Some(52.0));
        assert_eq!(vector.get_by_name("chol"), Some(200.0));
        assert_eq!(vector.get_by_name("thal"), Some(2.0));
        assert_eq!(vector.get_by_name("cp"), Some(0.0));
        assert_eq!(vector.get_by_name("unknown"), None);
    }

    #[test]
    fn test_builder_set_by_name_matches_setter() {
        let a = FeatureVectorBuilder::new().oldpeak(1.5).build();
        let b = FeatureVectorBuilder::new().set("oldpeak", 1.5).set("bogus", 9.0).build();
        assert_eq!(a, b);
    }

    #[test]
    fn test_iter_named_follows_layout() {
        let vector = FeatureVector::from_values([
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0,
        ]);
        let named: Vec<_> = vector.iter_named().collect();
        assert_eq!(named.len(), FEATURE_COUNT);
        assert_eq!(named[0], ("age", 1.0));
        assert_eq!(named[12], ("thal", 13.0));
    }

    #[test]
    fn test_domain_violations() {
        let vector = FeatureVectorBuilder::new()
            .age(0.0)
            .trestbps(120.0)
            .chol(200.0)
            .thalach(150.0)
            .thal(5.0)
            .build();

        let fields: Vec<String> = vector
            .domain_violations()
            .into_iter()
            .map(|v| v.field)
            .collect();
        assert_eq!(fields, vec!["age".to_string(), "thal".to_string()]);
    }

    #[test]
    fn test_report_fields_keep_order_and_format() {
        let vector = FeatureVectorBuilder::new().age(52.0).oldpeak(1.5).build();
        let fields = vector.to_report_fields();
        assert_eq!(fields[0], ("age".to_string(), "52".to_string()));
        assert_eq!(fields[9], ("oldpeak".to_string(), "1.5".to_string()));
    }
}
