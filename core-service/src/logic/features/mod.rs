//! Features Module - Feature Schemas & Vectors
//!
//! Extraction (PE parsing, Sysmon parsing) happens upstream; this module
//! only defines what a classifier expects and checks that it got it.

pub mod layout;
pub mod vector;
pub mod behavior;

#[cfg(test)]
mod tests;

// Re-export common types
pub use layout::{
    behavioral_schema, static_schema, FeatureSchema, LayoutInfo, BEHAVIORAL_FEATURES,
    FEATURE_VERSION, STATIC_FEATURES,
};
pub use vector::{FeatureEntry, FeatureVector};
pub use behavior::{BehaviorEvent, BehaviorSummary};
