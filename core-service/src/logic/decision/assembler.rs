//! Decision Assembler
//!
//! One scan, start to finish:
//! ```text
//! BranchInputs ─► BranchClassifier::score/explain (per available branch)
//!              ─► fusion::combine ─► fusion::band_with ─► explain::explain
//!              ─► FusionResult
//! ```
//! Synchronous and side-effect free. Shared across request workers via `Arc`.

use std::sync::Arc;

use super::types::{BranchDiagnostics, BranchInputs, FusionDebug, FusionResult};
use crate::logic::config::DetectionConfig;
use crate::logic::error::{CoreResult, DetectionError};
use crate::logic::explain::{self, Contribution};
use crate::logic::fusion;
use crate::logic::model::{Branch, ModelRegistry, ProbabilityScore};

pub struct DecisionAssembler {
    registry: Arc<ModelRegistry>,
    config: DetectionConfig,
}

impl DecisionAssembler {
    pub fn new(registry: Arc<ModelRegistry>, config: DetectionConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    /// Read-only view for the boundary layer
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn decide(&self, inputs: &BranchInputs) -> CoreResult<FusionResult> {
        if inputs.is_empty() {
            return Err(DetectionError::NoBranchAvailable);
        }

        let mut static_score: Option<ProbabilityScore> = None;
        let mut behavioral_score: Option<ProbabilityScore> = None;
        let mut contributions: Vec<Contribution> = Vec::new();
        let mut branches = Vec::new();
        let mut unavailable = Vec::new();

        for branch in Branch::ALL {
            let Some(features) = inputs.get(branch) else {
                unavailable.push(branch);
                continue;
            };

            let classifier = self.registry.classifier(branch);
            let score = classifier.score(features)?;
            let branch_contributions = classifier.explain(features)?;
            let fired_rules = classifier.fired_rules(features);
            if !fired_rules.is_empty() {
                log::debug!("{} rules fired: {}", branch, fired_rules.join("; "));
            }

            branches.push(BranchDiagnostics {
                branch,
                probability: score.value(),
                threshold: classifier.threshold(),
                decision: classifier.decide(&score),
                model: classifier.artifact().name().to_string(),
                model_digest: classifier.artifact().digest().to_string(),
                top_contributions: branch_contributions
                    .iter()
                    .take(self.config.explanation.max_reasons)
                    .cloned()
                    .collect(),
                fired_rules,
            });
            contributions.extend(branch_contributions);

            match branch {
                Branch::Static => static_score = Some(score),
                Branch::Behavioral => behavioral_score = Some(score),
            }
        }

        let fused = fusion::combine(static_score.as_ref(), behavioral_score.as_ref(), &self.config)?;
        if fused.mode.is_degraded() {
            log::warn!(
                "Degraded fusion ({:?}): no {} input for this scan",
                fused.mode,
                unavailable
                    .iter()
                    .map(|b| b.as_str())
                    .collect::<Vec<_>>()
                    .join("/")
            );
        }

        let risk_band = fusion::band_with(fused.probability, &self.config.cut_points);
        let reasons = explain::explain(fused.verdict, risk_band, &contributions, &self.config.explanation);

        log::debug!(
            "Decision: p={:.4} verdict={} band={:?} reasons={}",
            fused.probability,
            fused.verdict,
            risk_band,
            reasons.len()
        );

        Ok(FusionResult::new(
            fused.probability,
            fused.verdict,
            risk_band,
            reasons,
            FusionDebug {
                mode: fused.mode,
                applied_weights: fused.applied_weights,
                decision_threshold: self.config.decision_threshold,
                cut_points: self.config.cut_points,
                branches,
                unavailable,
            },
        ))
    }
}
