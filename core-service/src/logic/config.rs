//! Detection Configuration
//!
//! Fusion weights, verdict threshold, risk cut points and explanation limits
//! live in one structure. The boundary layer reads it (never writes it) so
//! client-side recomputation uses the same numbers as the core.

use serde::{Deserialize, Serialize};

use crate::constants::{self, WEIGHT_SUM_TOLERANCE};
use super::error::{CoreResult, DetectionError};

// ============================================================================
// FUSION WEIGHTS
// ============================================================================

/// Two-branch fusion weights (must sum to 1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionWeights {
    pub static_weight: f64,
    pub behavioral_weight: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            static_weight: constants::DEFAULT_STATIC_WEIGHT,
            behavioral_weight: constants::DEFAULT_BEHAVIORAL_WEIGHT,
        }
    }
}

impl FusionWeights {
    pub fn new(static_weight: f64, behavioral_weight: f64) -> CoreResult<Self> {
        let weights = Self { static_weight, behavioral_weight };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> CoreResult<()> {
        for (name, w) in [("static", self.static_weight), ("behavioral", self.behavioral_weight)] {
            if !(0.0..=1.0).contains(&w) {
                return Err(DetectionError::InvalidConfig(format!(
                    "{} weight {} outside [0, 1]",
                    name, w
                )));
            }
        }

        let sum = self.static_weight + self.behavioral_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(DetectionError::InvalidConfig(format!(
                "fusion weights must sum to 1, got {}",
                sum
            )));
        }

        Ok(())
    }
}

// ============================================================================
// RISK CUT POINTS
// ============================================================================

/// Lower bounds of the Caution and High Risk bands.
/// Each band is closed on its lower bound: `p == caution_min` is Caution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskCutPoints {
    pub caution_min: f64,
    pub high_risk_min: f64,
}

impl Default for RiskCutPoints {
    fn default() -> Self {
        Self {
            caution_min: constants::DEFAULT_CAUTION_MIN,
            high_risk_min: constants::DEFAULT_HIGH_RISK_MIN,
        }
    }
}

impl RiskCutPoints {
    pub fn validate(&self) -> CoreResult<()> {
        let ordered = 0.0 < self.caution_min
            && self.caution_min < self.high_risk_min
            && self.high_risk_min <= 1.0;

        if !ordered {
            return Err(DetectionError::InvalidConfig(format!(
                "risk cut points must satisfy 0 < caution ({}) < high risk ({}) <= 1",
                self.caution_min, self.high_risk_min
            )));
        }
        Ok(())
    }
}

// ============================================================================
// EXPLANATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplanationConfig {
    /// Max contribution phrases after the framing sentence (K)
    pub max_reasons: usize,
    /// Contributions with a smaller magnitude are not phrased
    pub min_magnitude: f32,
}

impl Default for ExplanationConfig {
    fn default() -> Self {
        Self {
            max_reasons: constants::DEFAULT_MAX_REASONS,
            min_magnitude: constants::DEFAULT_MIN_CONTRIBUTION,
        }
    }
}

// ============================================================================
// DETECTION CONFIG
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    pub weights: FusionWeights,
    /// Fused probability at or above this = Malicious
    pub decision_threshold: f64,
    pub cut_points: RiskCutPoints,
    pub explanation: ExplanationConfig,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            weights: FusionWeights::default(),
            decision_threshold: constants::DEFAULT_DECISION_THRESHOLD,
            cut_points: RiskCutPoints::default(),
            explanation: ExplanationConfig::default(),
        }
    }
}

impl DetectionConfig {
    /// Load from environment, falling back to the reference policy for
    /// unset variables. A set but unparsable variable is `InvalidConfig`.
    pub fn from_env() -> CoreResult<Self> {
        let config = Self {
            weights: FusionWeights {
                static_weight: constants::get_static_weight()?,
                behavioral_weight: constants::get_behavioral_weight()?,
            },
            decision_threshold: constants::get_decision_threshold()?,
            cut_points: RiskCutPoints {
                caution_min: constants::get_caution_min()?,
                high_risk_min: constants::get_high_risk_min()?,
            },
            explanation: ExplanationConfig {
                max_reasons: constants::get_max_reasons()?,
                min_magnitude: constants::get_min_contribution()?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CoreResult<()> {
        self.weights.validate()?;
        self.cut_points.validate()?;

        if !(0.0..=1.0).contains(&self.decision_threshold) {
            return Err(DetectionError::InvalidConfig(format!(
                "decision threshold {} outside [0, 1]",
                self.decision_threshold
            )));
        }
        if !(self.explanation.min_magnitude >= 0.0) {
            return Err(DetectionError::InvalidConfig(format!(
                "explanation min magnitude {} must be >= 0",
                self.explanation.min_magnitude
            )));
        }

        Ok(())
    }

    pub fn with_decision_threshold(mut self, threshold: f64) -> Self {
        self.decision_threshold = threshold;
        self
    }

    pub fn with_weights(mut self, weights: FusionWeights) -> Self {
        self.weights = weights;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_reference_policy() {
        let config = DetectionConfig::default();
        assert_eq!(config.weights.static_weight, 0.6);
        assert_eq!(config.weights.behavioral_weight, 0.4);
        assert_eq!(config.decision_threshold, 0.5);
        assert_eq!(config.cut_points.caution_min, 0.3);
        assert_eq!(config.cut_points.high_risk_min, 0.7);
        assert_eq!(config.explanation.max_reasons, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        assert!(FusionWeights::new(0.7, 0.3).is_ok());
        assert!(matches!(
            FusionWeights::new(0.6, 0.6),
            Err(DetectionError::InvalidConfig(_))
        ));
        assert!(FusionWeights::new(1.2, -0.2).is_err());
    }

    #[test]
    fn test_cut_points_must_be_ordered() {
        let bad = RiskCutPoints { caution_min: 0.7, high_risk_min: 0.3 };
        assert!(bad.validate().is_err());

        let zero = RiskCutPoints { caution_min: 0.0, high_risk_min: 0.5 };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let config = DetectionConfig::default().with_decision_threshold(1.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unchecked_weights_caught_by_validate() {
        let weights = FusionWeights { static_weight: 0.5, behavioral_weight: 0.6 };
        let config = DetectionConfig::default().with_weights(weights);
        assert!(config.validate().is_err());

        let weights = FusionWeights { static_weight: 0.5, behavioral_weight: 0.5 };
        assert!(DetectionConfig::default().with_weights(weights).validate().is_ok());
    }

    // All policy variables are read in this one test so parallel tests never
    // observe each other's environment.
    #[test]
    fn test_from_env_rejects_unparsable_values() {
        let keys = [
            "FUSION_STATIC_WEIGHT",
            "FUSION_BEHAVIORAL_WEIGHT",
            "FUSION_DECISION_THRESHOLD",
            "RISK_CAUTION_MIN",
            "RISK_HIGH_MIN",
            "EXPLAIN_MAX_REASONS",
            "EXPLAIN_MIN_MAGNITUDE",
        ];
        for key in keys {
            std::env::remove_var(key);
        }

        assert_eq!(DetectionConfig::from_env().unwrap(), DetectionConfig::default());

        std::env::set_var("FUSION_DECISION_THRESHOLD", "0.9x");
        assert!(matches!(
            DetectionConfig::from_env(),
            Err(DetectionError::InvalidConfig(msg)) if msg.contains("FUSION_DECISION_THRESHOLD")
        ));

        std::env::set_var("FUSION_DECISION_THRESHOLD", " 0.4 ");
        assert_eq!(DetectionConfig::from_env().unwrap().decision_threshold, 0.4);
        std::env::remove_var("FUSION_DECISION_THRESHOLD");

        std::env::set_var("EXPLAIN_MAX_REASONS", "five");
        assert!(DetectionConfig::from_env().is_err());
        std::env::remove_var("EXPLAIN_MAX_REASONS");

        // Parsable but invalid policy still fails validation
        std::env::set_var("FUSION_STATIC_WEIGHT", "0.9");
        assert!(matches!(
            DetectionConfig::from_env(),
            Err(DetectionError::InvalidConfig(msg)) if msg.contains("sum to 1")
        ));
        std::env::remove_var("FUSION_STATIC_WEIGHT");

        std::env::set_var("RISK_CAUTION_MIN", "");
        assert_eq!(DetectionConfig::from_env().unwrap().cut_points.caution_min, 0.3);
        std::env::remove_var("RISK_CAUTION_MIN");
    }
}
