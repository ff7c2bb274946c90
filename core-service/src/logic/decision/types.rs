//! Decision Types
//!
//! `FusionResult` is the unit handed to the boundary layer: returned to the
//! caller, persisted (minus reasons and debug) and fed to report generation.

use serde::{Deserialize, Serialize};

use crate::logic::config::{FusionWeights, RiskCutPoints};
use crate::logic::explain::Contribution;
use crate::logic::features::FeatureVector;
use crate::logic::fusion::{FusionMode, RiskBand, Verdict};
use crate::logic::model::Branch;

// ============================================================================
// BRANCH INPUTS
// ============================================================================

/// Feature vectors of one scan. A missing vector means that branch did not
/// run; availability is never inferred from vector content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BranchInputs {
    #[serde(default)]
    static_features: Option<FeatureVector>,
    #[serde(default)]
    behavioral_features: Option<FeatureVector>,
}

impl BranchInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_static(mut self, features: FeatureVector) -> Self {
        self.static_features = Some(features);
        self
    }

    pub fn with_behavioral(mut self, features: FeatureVector) -> Self {
        self.behavioral_features = Some(features);
        self
    }

    pub fn get(&self, branch: Branch) -> Option<&FeatureVector> {
        match branch {
            Branch::Static => self.static_features.as_ref(),
            Branch::Behavioral => self.behavioral_features.as_ref(),
        }
    }

    pub fn available(&self) -> Vec<Branch> {
        Branch::ALL
            .into_iter()
            .filter(|b| self.get(*b).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.static_features.is_none() && self.behavioral_features.is_none()
    }
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

/// Audit data for one branch that ran
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchDiagnostics {
    pub branch: Branch,
    pub probability: f64,
    /// Branch-specific calibrated threshold from the artifact
    pub threshold: f64,
    /// `probability >= threshold`
    pub decision: bool,
    pub model: String,
    pub model_digest: String,
    #[serde(default)]
    pub top_contributions: Vec<Contribution>,
    /// Rule descriptions that matched, empty for non-rule models
    #[serde(default)]
    pub fired_rules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionDebug {
    pub mode: FusionMode,
    pub applied_weights: FusionWeights,
    pub decision_threshold: f64,
    pub cut_points: RiskCutPoints,
    pub branches: Vec<BranchDiagnostics>,
    #[serde(default)]
    pub unavailable: Vec<Branch>,
}

impl FusionDebug {
    pub fn branch(&self, branch: Branch) -> Option<&BranchDiagnostics> {
        self.branches.iter().find(|d| d.branch == branch)
    }
}

// ============================================================================
// FUSION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionResult {
    #[serde(rename = "final_prob")]
    final_probability: f64,
    verdict: Verdict,
    risk_band: RiskBand,
    #[serde(default)]
    reasons: Vec<String>,
    debug: FusionDebug,
}

impl FusionResult {
    pub(crate) fn new(
        final_probability: f64,
        verdict: Verdict,
        risk_band: RiskBand,
        reasons: Vec<String>,
        debug: FusionDebug,
    ) -> Self {
        Self {
            final_probability,
            verdict,
            risk_band,
            reasons,
            debug,
        }
    }

    pub fn final_probability(&self) -> f64 {
        self.final_probability
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn risk_band(&self) -> RiskBand {
        self.risk_band
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    pub fn debug(&self) -> &FusionDebug {
        &self.debug
    }

    /// Probability of one branch, if it ran
    pub fn branch_probability(&self, branch: Branch) -> Option<f64> {
        self.debug.branch(branch).map(|d| d.probability)
    }
}
