//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the model input schema.**
//!
//! ## Rules:
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Change a domain → increment FEATURE_VERSION
//!
//! The order below is the column order the classifier and scaler were
//! fitted on. Every field is numeric: categorical inputs use their integer
//! codes (e.g. `sex` 0 = female, 1 = male).

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    "age",       // 0
    "sex",       // 1
    "cp",        // 2
    "trestbps",  // 3
    "chol",      // 4
    "fbs",       // 5
    "restecg",   // 6
    "thalach",   // 7
    "exang",     // 8
    "oldpeak",   // 9
    "slope",     // 10
    "ca",        // 11
    "thal",      // 12
];

/// Total number of features
/// Must match FEATURE_LAYOUT.len()
pub const FEATURE_COUNT: usize = 13;

// ============================================================================
// FIELD DOMAINS
// ============================================================================

/// Valid values for one input field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldDomain {
    /// Inclusive numeric range
    Range { min: f64, max: f64 },
    /// Closed set of integer codes
    Choices { values: &'static [i64] },
}

impl FieldDomain {
    /// Whether `value` lies inside this domain
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            FieldDomain::Range { min, max } => value >= min && value <= max,
            FieldDomain::Choices { values } => {
                value.fract() == 0.0 && values.iter().any(|&v| v as f64 == value)
            }
        }
    }

    /// Short human form, e.g. `[80, 220]` or `{0, 1}`
    pub fn describe(&self) -> String {
        match *self {
            FieldDomain::Range { min, max } => format!("[{}, {}]", min, max),
            FieldDomain::Choices { values } => {
                let codes: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                format!("{{{}}}", codes.join(", "))
            }
        }
    }
}

/// Schema entry for one input field
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub domain: FieldDomain,
}

/// Per-field labels, descriptions and domains, in layout order
pub const FIELD_SPECS: [FieldSpec; FEATURE_COUNT] = [
    FieldSpec {
        name: "age",
        label: "Age",
        description: "Age in years",
        domain: FieldDomain::Range { min: 1.0, max: 120.0 },
    },
    FieldSpec {
        name: "sex",
        label: "Sex",
        description: "0 = Female, 1 = Male",
        domain: FieldDomain::Choices { values: &[0, 1] },
    },
    FieldSpec {
        name: "cp",
        label: "Chest Pain Type",
        description: "0: Typical Angina, 1: Atypical, 2: Non-anginal, 3: Asymptomatic",
        domain: FieldDomain::Choices { values: &[0, 1, 2, 3] },
    },
    FieldSpec {
        name: "trestbps",
        label: "Resting Blood Pressure",
        description: "Resting blood pressure (mm Hg)",
        domain: FieldDomain::Range { min: 80.0, max: 220.0 },
    },
    FieldSpec {
        name: "chol",
        label: "Serum Cholesterol",
        description: "Serum cholesterol (mg/dl)",
        domain: FieldDomain::Range { min: 100.0, max: 600.0 },
    },
    FieldSpec {
        name: "fbs",
        label: "Fasting Blood Sugar",
        description: "Fasting blood sugar > 120 mg/dl (1 = True, 0 = False)",
        domain: FieldDomain::Choices { values: &[0, 1] },
    },
    FieldSpec {
        name: "restecg",
        label: "Resting ECG",
        description: "0 = Normal, 1 = ST-T abnormality, 2 = LV hypertrophy",
        domain: FieldDomain::Choices { values: &[0, 1, 2] },
    },
    FieldSpec {
        name: "thalach",
        label: "Maximum Heart Rate",
        description: "Maximum heart rate achieved",
        domain: FieldDomain::Range { min: 60.0, max: 220.0 },
    },
    FieldSpec {
        name: "exang",
        label: "Exercise Induced Angina",
        description: "Exercise-induced angina (1 = Yes, 0 = No)",
        domain: FieldDomain::Choices { values: &[0, 1] },
    },
    FieldSpec {
        name: "oldpeak",
        label: "ST Depression",
        description: "ST depression induced by exercise relative to rest",
        domain: FieldDomain::Range { min: 0.0, max: 10.0 },
    },
    FieldSpec {
        name: "slope",
        label: "ST Slope",
        description: "Slope of the peak exercise ST segment (0-2)",
        domain: FieldDomain::Choices { values: &[0, 1, 2] },
    },
    FieldSpec {
        name: "ca",
        label: "Major Vessels",
        description: "Major vessels colored by fluoroscopy (0-4)",
        domain: FieldDomain::Choices { values: &[0, 1, 2, 3, 4] },
    },
    FieldSpec {
        name: "thal",
        label: "Thalassemia",
        description: "0 = Unknown, 1 = Normal, 2 = Fixed defect, 3 = Reversible defect",
        domain: FieldDomain::Choices { values: &[0, 1, 2, 3] },
    },
];

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
/// Used to detect layout mismatches between server and clients
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

/// Get layout hash
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for clients
#[derive(Debug, Clone, Serialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub fields: Vec<FieldSpec>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            fields: FIELD_SPECS.to_vec(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

/// One field whose value lies outside its domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainViolation {
    pub field: String,
    pub value: f64,
    pub expected: String,
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

/// Get schema entry by name
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    feature_index(name).map(|i| &FIELD_SPECS[i])
}

// ============================================================================
// TESTS
// ============================================================================
