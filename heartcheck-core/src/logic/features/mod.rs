//! Features Module - Model input schema
//!
//! Canonical 13-field layout, per-field domains and the typed vector
//! handed to the inference engine.

pub mod layout;
pub mod vector;

// Re-export common types
pub use layout::{
    DomainViolation, FieldDomain, FieldSpec, LayoutInfo, FEATURE_COUNT, FEATURE_LAYOUT,
    FEATURE_VERSION, FIELD_SPECS,
};
pub use vector::{FeatureVector, FeatureVectorBuilder};
