//! Model Registry
//!
//! Holds the two branch classifiers for the lifetime of the process.
//! Both artifacts load at startup; a missing or corrupt one is fatal.

use std::path::Path;

use super::artifact::{ArtifactInfo, ModelArtifact};
use super::classifier::BranchClassifier;
use super::types::Branch;
use crate::logic::error::{CoreResult, DetectionError};

pub const STATIC_ARTIFACT_FILE: &str = "static_model.json";
pub const BEHAVIORAL_ARTIFACT_FILE: &str = "behavioral_model.json";

#[derive(Debug)]
pub struct ModelRegistry {
    static_model: BranchClassifier,
    behavioral_model: BranchClassifier,
}

impl ModelRegistry {
    pub fn new(static_model: BranchClassifier, behavioral_model: BranchClassifier) -> CoreResult<Self> {
        for (expected, classifier) in [
            (Branch::Static, &static_model),
            (Branch::Behavioral, &behavioral_model),
        ] {
            if classifier.branch() != expected {
                return Err(DetectionError::artifact(
                    classifier.artifact().name(),
                    format!("artifact is tagged {} but used as the {} model", classifier.branch(), expected),
                ));
            }
        }

        Ok(Self {
            static_model,
            behavioral_model,
        })
    }

    /// Load `static_model.json` and `behavioral_model.json` from `dir`
    pub fn load_dir(dir: impl AsRef<Path>) -> CoreResult<Self> {
        let dir = dir.as_ref();
        log::info!("Loading model artifacts from {}", dir.display());

        let static_model = BranchClassifier::new(ModelArtifact::load(dir.join(STATIC_ARTIFACT_FILE))?);
        let behavioral_model =
            BranchClassifier::new(ModelArtifact::load(dir.join(BEHAVIORAL_ARTIFACT_FILE))?);

        Self::new(static_model, behavioral_model)
    }

    pub fn classifier(&self, branch: Branch) -> &BranchClassifier {
        match branch {
            Branch::Static => &self.static_model,
            Branch::Behavioral => &self.behavioral_model,
        }
    }

    pub fn models(&self) -> Vec<ArtifactInfo> {
        Branch::ALL
            .iter()
            .map(|b| self.classifier(*b).artifact().info())
            .collect()
    }
}
