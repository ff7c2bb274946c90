//! Fusion Engine
//!
//! Stateless combination of branch probabilities:
//! - both branches: `w_static·p_static + w_behavioral·p_behavioral`
//! - one branch: that branch's probability, unchanged (degraded mode)
//! - none: `NoBranchAvailable`
//!
//! Verdict is Malicious iff the fused probability is at or above the
//! configured decision threshold.
//!
//! The weighted sum is computed in f64 and rounded to `FUSED_DECIMALS`
//! places, so a sum that is exactly a cut point or the threshold in decimal
//! compares equal to it.

use super::types::{FusedScore, FusionMode, Verdict};
use crate::constants::FUSED_DECIMALS;
use crate::logic::config::{DetectionConfig, FusionWeights};
use crate::logic::error::{CoreResult, DetectionError};
use crate::logic::model::ProbabilityScore;

/// Rounding slack on the weighted sum; anything further out is a defect
const ROUNDING_SLACK: f64 = 1e-9;

pub fn combine(
    static_score: Option<&ProbabilityScore>,
    behavioral_score: Option<&ProbabilityScore>,
    config: &DetectionConfig,
) -> CoreResult<FusedScore> {
    let weights = config.weights;

    let (raw, mode, applied_weights) = match (static_score, behavioral_score) {
        (Some(s), Some(b)) => (
            round_fused(weights.static_weight * s.value() + weights.behavioral_weight * b.value()),
            FusionMode::Hybrid,
            weights,
        ),
        (Some(s), None) => (
            s.value(),
            FusionMode::StaticOnly,
            FusionWeights { static_weight: 1.0, behavioral_weight: 0.0 },
        ),
        (None, Some(b)) => (
            b.value(),
            FusionMode::BehavioralOnly,
            FusionWeights { static_weight: 0.0, behavioral_weight: 1.0 },
        ),
        (None, None) => return Err(DetectionError::NoBranchAvailable),
    };

    let probability = check_fused(raw)?;
    let verdict = verdict_for(probability, config.decision_threshold);

    log::debug!(
        "Fused probability {:.4} ({:?}) -> {}",
        probability,
        mode,
        verdict
    );

    Ok(FusedScore {
        probability,
        verdict,
        mode,
        applied_weights,
    })
}

/// Closed on the malicious side: `p == threshold` is Malicious
pub fn verdict_for(probability: f64, threshold: f64) -> Verdict {
    if probability >= threshold {
        Verdict::Malicious
    } else {
        Verdict::Benign
    }
}

fn round_fused(raw: f64) -> f64 {
    let scale = 10f64.powi(FUSED_DECIMALS);
    (raw * scale).round() / scale
}

fn check_fused(raw: f64) -> CoreResult<f64> {
    if (0.0..=1.0).contains(&raw) {
        return Ok(raw);
    }
    if raw.is_finite() && raw >= -ROUNDING_SLACK && raw <= 1.0 + ROUNDING_SLACK {
        return Ok(raw.clamp(0.0, 1.0));
    }
    Err(DetectionError::out_of_range("fused", raw))
}
