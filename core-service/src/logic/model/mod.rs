//! Model Module - Branch classifiers
//!
//! Artifact loading, estimator backends (logistic, rules, optional ONNX)
//! and the registry that owns one classifier per branch.

pub mod types;
pub mod linear;
pub mod rules;
pub mod artifact;
pub mod classifier;
pub mod registry;

#[cfg(feature = "onnx")]
pub mod onnx;

// Re-export common types
pub use types::{Branch, ProbabilityScore};
pub use artifact::{ArtifactInfo, ArtifactManifest, Estimator, ModelArtifact, ModelSpec};
pub use classifier::BranchClassifier;
pub use registry::ModelRegistry;
