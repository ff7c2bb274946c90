//! Branch Classifier
//!
//! Wraps one artifact: checks the incoming vector against the artifact
//! schema, scores it, applies the branch threshold and produces per-feature
//! contributions for the explanation engine.

use super::artifact::ModelArtifact;
use super::types::{Branch, ProbabilityScore};
use crate::logic::error::CoreResult;
use crate::logic::explain::Contribution;
use crate::logic::features::{FeatureSchema, FeatureVector};

#[derive(Debug)]
pub struct BranchClassifier {
    artifact: ModelArtifact,
}

impl BranchClassifier {
    pub fn new(artifact: ModelArtifact) -> Self {
        Self { artifact }
    }

    pub fn branch(&self) -> Branch {
        self.artifact.branch()
    }

    pub fn threshold(&self) -> f64 {
        self.artifact.threshold()
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.artifact.schema()
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Score one feature vector.
    ///
    /// A vector that does not match the schema exactly never reaches the
    /// estimator.
    pub fn score(&self, features: &FeatureVector) -> CoreResult<ProbabilityScore> {
        self.schema().validate(features)?;
        features.ensure_finite()?;
        log::trace!("{} branch input: {}", self.branch(), features.to_log_entry());

        let raw = self.artifact.estimator().predict(features.values())?;
        let score = ProbabilityScore::new(self.branch(), raw)?;

        log::debug!(
            "{} branch scored {:.4} (threshold {:.2}) with '{}'",
            self.branch(),
            score.value(),
            self.threshold(),
            self.artifact.name()
        );

        Ok(score)
    }

    /// Branch-level decision, inclusive at the threshold
    pub fn decide(&self, score: &ProbabilityScore) -> bool {
        score.value() >= self.threshold()
    }

    /// Rules that matched this vector, for the audit trail.
    ///
    /// Call after `score`; a vector that fails the schema yields nothing.
    pub fn fired_rules(&self, features: &FeatureVector) -> Vec<String> {
        if self.schema().validate(features).is_err() {
            return Vec::new();
        }
        self.artifact.estimator().fired_rules(features.values())
    }

    /// Non-zero contributions, by magnitude desc then feature name.
    ///
    /// Signed local attributions when the estimator supports them, otherwise
    /// the artifact's global importances, otherwise nothing.
    pub fn explain(&self, features: &FeatureVector) -> CoreResult<Vec<Contribution>> {
        self.schema().validate(features)?;
        features.ensure_finite()?;

        let branch = self.branch();
        let names = self.schema().names();

        let mut out: Vec<Contribution> =
            match self.artifact.estimator().attributions(features.values()) {
                Some(scores) => names
                    .iter()
                    .zip(scores)
                    .filter(|(_, s)| *s != 0.0)
                    .map(|(name, s)| Contribution::local(name.as_str(), branch, s))
                    .collect(),
                None => match self.artifact.importances() {
                    Some(importances) => names
                        .iter()
                        .zip(importances)
                        .filter(|(_, s)| **s != 0.0)
                        .map(|(name, s)| Contribution::global(name.as_str(), branch, *s))
                        .collect(),
                    None => Vec::new(),
                },
            };

        out.sort_by(|a, b| {
            b.magnitude()
                .total_cmp(&a.magnitude())
                .then_with(|| a.feature.cmp(&b.feature))
        });
        Ok(out)
    }
}
