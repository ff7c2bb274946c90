//! Model Artifacts
//!
//! An artifact is a JSON manifest describing one trained branch model:
//!
//! ```json
//! {
//!   "name": "static-logistic-v1",
//!   "branch": "static",
//!   "threshold": 0.5,
//!   "schema": { "name": "static", "version": 1, "features": ["Machine", "..."] },
//!   "feature_importances": { "Machine": 0.12 },
//!   "model": { "type": "logistic", "intercept": -1.2, "coefficients": [0.4, "..."] }
//! }
//! ```
//!
//! `model.type` is one of `logistic`, `rules` or `onnx` (the latter needs
//! the `onnx` feature). Any defect found here is an `ArtifactLoadFailure`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::linear::LogisticModel;
use super::rules::RuleModel;
use super::types::Branch;
use crate::logic::error::{CoreResult, DetectionError};
use crate::logic::features::{FeatureSchema, LayoutInfo};

#[cfg(feature = "onnx")]
use super::onnx::OnnxModel;

// ============================================================================
// MANIFEST
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub name: String,
    pub branch: Branch,
    pub threshold: f64,
    pub schema: FeatureSchema,
    #[serde(default)]
    pub feature_importances: Option<BTreeMap<String, f32>>,
    pub model: ModelSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModelSpec {
    Logistic(LogisticModel),
    Rules(RuleModel),
    Onnx(OnnxSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnnxSpec {
    /// Model file, relative to the manifest
    pub path: String,
    /// Probability output; the last output when omitted
    #[serde(default)]
    pub output: Option<String>,
}

// ============================================================================
// ESTIMATOR
// ============================================================================

/// Loaded scoring backend
#[derive(Debug)]
pub enum Estimator {
    Logistic(LogisticModel),
    Rules(RuleModel),
    #[cfg(feature = "onnx")]
    Onnx(OnnxModel),
}

impl Estimator {
    pub fn kind(&self) -> &'static str {
        match self {
            Estimator::Logistic(_) => "logistic",
            Estimator::Rules(_) => "rules",
            #[cfg(feature = "onnx")]
            Estimator::Onnx(_) => "onnx",
        }
    }

    /// Raw probability; range checking happens in the classifier
    pub fn predict(&self, values: &[f32]) -> CoreResult<f64> {
        match self {
            Estimator::Logistic(m) => Ok(m.predict(values)),
            Estimator::Rules(m) => Ok(m.predict(values)),
            #[cfg(feature = "onnx")]
            Estimator::Onnx(m) => m.predict(values),
        }
    }

    /// Descriptions of matching rules; other backends have none
    pub fn fired_rules(&self, values: &[f32]) -> Vec<String> {
        match self {
            Estimator::Rules(m) => m.fired(values).into_iter().map(str::to_string).collect(),
            _ => Vec::new(),
        }
    }

    /// Per-feature signed attribution, when the backend supports it
    pub fn attributions(&self, values: &[f32]) -> Option<Vec<f32>> {
        match self {
            Estimator::Logistic(m) => Some(m.attributions(values)),
            Estimator::Rules(m) => Some(m.attributions(values, values.len())),
            #[cfg(feature = "onnx")]
            Estimator::Onnx(_) => None,
        }
    }

    fn check(&mut self, schema: &FeatureSchema) -> Result<(), String> {
        match self {
            Estimator::Logistic(m) => {
                if m.feature_count() != schema.len() {
                    return Err(format!(
                        "{} coefficients for {} features",
                        m.feature_count(),
                        schema.len()
                    ));
                }
                if let Some(baseline) = &m.baseline {
                    if baseline.len() != schema.len() {
                        return Err(format!(
                            "baseline has {} values for {} features",
                            baseline.len(),
                            schema.len()
                        ));
                    }
                }
                let finite = m.intercept.is_finite() && m.coefficients.iter().all(|w| w.is_finite());
                if !finite {
                    return Err("non-finite logistic parameters".to_string());
                }
                Ok(())
            }
            Estimator::Rules(m) => m.bind(schema).map_err(|e| e.to_string()),
            #[cfg(feature = "onnx")]
            Estimator::Onnx(_) => Ok(()),
        }
    }
}

// ============================================================================
// ARTIFACT
// ============================================================================

/// A validated, ready-to-score branch model
#[derive(Debug)]
pub struct ModelArtifact {
    name: String,
    branch: Branch,
    threshold: f64,
    schema: FeatureSchema,
    importances: Option<Vec<f32>>,
    estimator: Estimator,
    digest: String,
}

/// Artifact metadata for logs and the config endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactInfo {
    pub name: String,
    pub branch: Branch,
    pub threshold: f64,
    pub estimator: String,
    pub digest: String,
    pub schema: LayoutInfo,
}

impl ModelArtifact {
    /// Build an artifact in memory. The digest covers name, branch,
    /// threshold and schema layout.
    pub fn new(
        name: impl Into<String>,
        branch: Branch,
        threshold: f64,
        schema: FeatureSchema,
        estimator: Estimator,
    ) -> CoreResult<Self> {
        let name = name.into();
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        hasher.update(branch.as_str().as_bytes());
        hasher.update(threshold.to_le_bytes());
        hasher.update(schema.hash().to_le_bytes());
        let digest = hex::encode(hasher.finalize());

        Self::assemble(name, branch, threshold, schema, estimator, digest)
    }

    fn assemble(
        name: String,
        branch: Branch,
        threshold: f64,
        schema: FeatureSchema,
        mut estimator: Estimator,
        digest: String,
    ) -> CoreResult<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(DetectionError::artifact(
                &name,
                format!("threshold {} outside [0, 1]", threshold),
            ));
        }
        estimator
            .check(&schema)
            .map_err(|reason| DetectionError::artifact(&name, reason))?;

        Ok(Self {
            name,
            branch,
            threshold,
            schema,
            importances: None,
            estimator,
            digest,
        })
    }

    /// Attach model-wide importances, aligned with the schema
    pub fn with_importances(mut self, importances: Vec<f32>) -> CoreResult<Self> {
        if importances.len() != self.schema.len() {
            return Err(DetectionError::artifact(
                &self.name,
                format!(
                    "{} importances for {} features",
                    importances.len(),
                    self.schema.len()
                ),
            ));
        }
        self.importances = Some(importances);
        Ok(self)
    }

    /// Load and validate a manifest from disk
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let bytes = std::fs::read(path).map_err(|e| DetectionError::artifact(&display, e.to_string()))?;
        let digest = hex::encode(Sha256::digest(&bytes));

        let manifest: ArtifactManifest = serde_json::from_slice(&bytes)
            .map_err(|e| DetectionError::artifact(&display, format!("invalid manifest: {}", e)))?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let artifact = Self::from_manifest(manifest, base_dir, digest)
            .map_err(|e| match e {
                DetectionError::ArtifactLoadFailure { reason, .. } => {
                    DetectionError::artifact(&display, reason)
                }
                other => other,
            })?;

        log::info!(
            "Loaded {} model '{}' ({}, {} features, threshold {:.2}, sha256 {})",
            artifact.branch,
            artifact.name,
            artifact.estimator.kind(),
            artifact.schema.len(),
            artifact.threshold,
            &artifact.digest[..12]
        );

        Ok(artifact)
    }

    pub fn from_manifest(
        manifest: ArtifactManifest,
        base_dir: &Path,
        digest: String,
    ) -> CoreResult<Self> {
        let ArtifactManifest {
            name,
            branch,
            threshold,
            schema,
            feature_importances,
            model,
        } = manifest;

        let estimator = match model {
            ModelSpec::Logistic(m) => Estimator::Logistic(m),
            ModelSpec::Rules(m) => Estimator::Rules(m),
            ModelSpec::Onnx(spec) => load_onnx(&name, base_dir, &spec)?,
        };

        let artifact = Self::assemble(name, branch, threshold, schema, estimator, digest)?;

        match feature_importances {
            Some(map) => {
                let importances = align_importances(&artifact.schema, &map)
                    .map_err(|reason| DetectionError::artifact(&artifact.name, reason))?;
                artifact.with_importances(importances)
            }
            None => Ok(artifact),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn branch(&self) -> Branch {
        self.branch
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn importances(&self) -> Option<&[f32]> {
        self.importances.as_deref()
    }

    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn info(&self) -> ArtifactInfo {
        ArtifactInfo {
            name: self.name.clone(),
            branch: self.branch,
            threshold: self.threshold,
            estimator: self.estimator.kind().to_string(),
            digest: self.digest.clone(),
            schema: self.schema.info(),
        }
    }
}

fn align_importances(schema: &FeatureSchema, map: &BTreeMap<String, f32>) -> Result<Vec<f32>, String> {
    if let Some(unknown) = map.keys().find(|k| schema.index_of(k).is_none()) {
        return Err(format!("importance given for unknown feature '{}'", unknown));
    }
    if let Some((feature, _)) = map.iter().find(|(_, v)| !v.is_finite()) {
        return Err(format!("non-finite importance for '{}'", feature));
    }
    Ok(schema
        .names()
        .iter()
        .map(|name| map.get(name).copied().unwrap_or(0.0))
        .collect())
}

#[cfg(feature = "onnx")]
fn load_onnx(_name: &str, base_dir: &Path, spec: &OnnxSpec) -> CoreResult<Estimator> {
    let path = base_dir.join(&spec.path);
    Ok(Estimator::Onnx(OnnxModel::load(&path, spec.output.as_deref())?))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(name: &str, _base_dir: &Path, spec: &OnnxSpec) -> CoreResult<Estimator> {
    Err(DetectionError::artifact(
        name,
        format!("'{}' needs ONNX support (build with feature \"onnx\")", spec.path),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::{behavioral_schema, static_schema};
    use serde_json::json;
    use tempfile::TempDir;

    fn write_manifest(dir: &TempDir, file: &str, manifest: serde_json::Value) -> std::path::PathBuf {
        let path = dir.path().join(file);
        std::fs::write(&path, serde_json::to_vec_pretty(&manifest).unwrap()).unwrap();
        path
    }

    fn rules_manifest() -> serde_json::Value {
        json!({
            "name": "behavior-rules-v1",
            "branch": "behavioral",
            "threshold": 0.6,
            "schema": {
                "name": "behavioral",
                "version": 1,
                "features": behavioral_schema().names()
            },
            "model": {
                "type": "rules",
                "rules": [{
                    "description": "mass file creation",
                    "any": [{ "feature": "ratio_file_create", "op": "gt", "value": 0.5 }],
                    "weight": 0.6
                }]
            }
        })
    }

    #[test]
    fn test_load_rules_manifest() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, "behavioral_model.json", rules_manifest());

        let artifact = ModelArtifact::load(&path).unwrap();
        assert_eq!(artifact.branch(), Branch::Behavioral);
        assert_eq!(artifact.threshold(), 0.6);
        assert_eq!(artifact.estimator().kind(), "rules");
        assert_eq!(artifact.digest().len(), 64);
        assert_eq!(artifact.schema(), &behavioral_schema());
    }

    #[test]
    fn test_missing_file_is_load_failure() {
        let dir = TempDir::new().unwrap();
        let err = ModelArtifact::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, DetectionError::ArtifactLoadFailure { .. }));
    }

    #[test]
    fn test_corrupt_manifest_is_load_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("static_model.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let err = ModelArtifact::load(&path).unwrap_err();
        match err {
            DetectionError::ArtifactLoadFailure { path: p, reason } => {
                assert!(p.ends_with("static_model.json"));
                assert!(reason.contains("invalid manifest"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_coefficient_count_must_match_schema() {
        let dir = TempDir::new().unwrap();
        let manifest = json!({
            "name": "static-logistic",
            "branch": "static",
            "threshold": 0.5,
            "schema": { "name": "static", "features": static_schema().names() },
            "model": { "type": "logistic", "intercept": 0.0, "coefficients": [1.0, 2.0] }
        });
        let path = write_manifest(&dir, "static_model.json", manifest);

        let err = ModelArtifact::load(&path).unwrap_err();
        assert!(err.to_string().contains("2 coefficients for 15 features"));
    }

    #[test]
    fn test_threshold_out_of_range() {
        let dir = TempDir::new().unwrap();
        let mut manifest = rules_manifest();
        manifest["threshold"] = json!(1.5);
        let path = write_manifest(&dir, "behavioral_model.json", manifest);

        assert!(matches!(
            ModelArtifact::load(&path),
            Err(DetectionError::ArtifactLoadFailure { .. })
        ));
    }

    #[test]
    fn test_duplicate_schema_feature_rejected() {
        let dir = TempDir::new().unwrap();
        let mut manifest = rules_manifest();
        manifest["schema"]["features"] = json!(["total_events", "total_events"]);
        let path = write_manifest(&dir, "behavioral_model.json", manifest);

        assert!(ModelArtifact::load(&path).is_err());
    }

    #[test]
    fn test_importances_aligned_to_schema() {
        let dir = TempDir::new().unwrap();
        let mut manifest = rules_manifest();
        manifest["feature_importances"] = json!({ "n_file_create": 0.7, "total_events": 0.1 });
        let path = write_manifest(&dir, "behavioral_model.json", manifest);

        let artifact = ModelArtifact::load(&path).unwrap();
        let importances = artifact.importances().unwrap();
        assert_eq!(importances.len(), 7);
        assert_eq!(importances[0], 0.1);
        assert_eq!(importances[2], 0.7);
        assert_eq!(importances[6], 0.0);
    }

    #[test]
    fn test_unknown_importance_feature_rejected() {
        let dir = TempDir::new().unwrap();
        let mut manifest = rules_manifest();
        manifest["feature_importances"] = json!({ "entropy_mean": 0.4 });
        let path = write_manifest(&dir, "behavioral_model.json", manifest);

        let err = ModelArtifact::load(&path).unwrap_err();
        assert!(err.to_string().contains("entropy_mean"));
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn test_onnx_needs_feature() {
        let dir = TempDir::new().unwrap();
        let mut manifest = rules_manifest();
        manifest["model"] = json!({ "type": "onnx", "path": "static.onnx" });
        let path = write_manifest(&dir, "behavioral_model.json", manifest);

        let err = ModelArtifact::load(&path).unwrap_err();
        assert!(err.to_string().contains("onnx"));
    }

    #[test]
    fn test_in_memory_digest_is_stable() {
        let build = || {
            ModelArtifact::new(
                "static-test",
                Branch::Static,
                0.5,
                static_schema(),
                Estimator::Logistic(LogisticModel::new(0.0, vec![0.0; 15])),
            )
            .unwrap()
        };
        assert_eq!(build().digest(), build().digest());
    }
}
