//! Test fixtures: registries whose branches score a fixed probability.

use std::sync::Arc;

use crate::logic::config::DetectionConfig;
use crate::logic::features::{behavioral_schema, static_schema, BehaviorSummary, FeatureVector};
use crate::logic::model::rules::{Comparison, Condition, Rule, RuleModel};
use crate::logic::model::{Branch, BranchClassifier, Estimator, ModelArtifact, ModelRegistry};

use super::{BranchInputs, DecisionAssembler, FusionResult};

/// A classifier that always fires one rule of weight `p` on two features
fn fixed_classifier(branch: Branch, p: f64, threshold: f64) -> BranchClassifier {
    let (schema, features) = match branch {
        Branch::Static => (static_schema(), ["BitcoinAddresses", "NumberOfSections"]),
        Branch::Behavioral => (behavioral_schema(), ["n_file_create", "ratio_file_create"]),
    };
    let rule = Rule {
        description: format!("fixed {}", branch),
        any: features
            .iter()
            .map(|f| Condition::new(*f, Comparison::Ge, 0.0))
            .collect(),
        weight: p,
    };
    let artifact = ModelArtifact::new(
        format!("{}-fixed", branch),
        branch,
        threshold,
        schema,
        Estimator::Rules(RuleModel::new(vec![rule])),
    )
    .unwrap();
    BranchClassifier::new(artifact)
}

pub fn fixed_registry(p_static: f64, p_behavioral: f64) -> Arc<ModelRegistry> {
    Arc::new(
        ModelRegistry::new(
            fixed_classifier(Branch::Static, p_static, 0.5),
            fixed_classifier(Branch::Behavioral, p_behavioral, 0.6),
        )
        .unwrap(),
    )
}

pub fn static_vector() -> FeatureVector {
    FeatureVector::from_pairs(static_schema().names().iter().map(|n| (n.as_str(), 0.0)))
}

pub fn behavioral_vector() -> FeatureVector {
    BehaviorSummary::default().to_vector()
}

pub fn assembler(p_static: f64, p_behavioral: f64) -> DecisionAssembler {
    DecisionAssembler::new(fixed_registry(p_static, p_behavioral), DetectionConfig::default()).unwrap()
}

/// Result of a hybrid scan with the given branch probabilities
pub fn hybrid_result(p_static: f64, p_behavioral: f64) -> FusionResult {
    let inputs = BranchInputs::new()
        .with_static(static_vector())
        .with_behavioral(behavioral_vector());
    assembler(p_static, p_behavioral).decide(&inputs).unwrap()
}
