//! Central Configuration Constants
//!
//! Single source of truth for all detection defaults.
//! The fusion weights, verdict threshold and risk cut points defined here are
//! the reference policy; deployments override them through the environment.

use crate::logic::error::{CoreResult, DetectionError};

/// Weight of the static (file metadata) branch in two-branch fusion
pub const DEFAULT_STATIC_WEIGHT: f64 = 0.6;

/// Weight of the behavioral (event telemetry) branch in two-branch fusion
pub const DEFAULT_BEHAVIORAL_WEIGHT: f64 = 0.4;

/// Fused probability at or above which the verdict is Malicious
pub const DEFAULT_DECISION_THRESHOLD: f64 = 0.5;

/// Lower bound (inclusive) of the Caution band
pub const DEFAULT_CAUTION_MIN: f64 = 0.3;

/// Lower bound (inclusive) of the High Risk band
pub const DEFAULT_HIGH_RISK_MIN: f64 = 0.7;

/// Maximum number of contribution phrases appended after the framing sentence
pub const DEFAULT_MAX_REASONS: usize = 5;

/// Contributions weaker than this are never phrased
pub const DEFAULT_MIN_CONTRIBUTION: f32 = 0.01;

/// Allowed drift when checking that fusion weights sum to one
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Engine version, reported next to the loaded models
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Decimal places kept on a weighted fused sum, enough to strip binary
/// rounding residue so `0.6 * 0.04 + 0.4 * 0.69` lands exactly on 0.3
pub const FUSED_DECIMALS: i32 = 12;

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Unset (or blank) falls back to `default`; set but unparsable is an error
fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> CoreResult<T> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|_| {
            DetectionError::InvalidConfig(format!("{} has unparsable value '{}'", key, raw))
        }),
        Ok(_) | Err(std::env::VarError::NotPresent) => Ok(default),
        Err(std::env::VarError::NotUnicode(_)) => Err(DetectionError::InvalidConfig(format!(
            "{} is not valid unicode",
            key
        ))),
    }
}

/// Get static branch weight from environment or use default
pub fn get_static_weight() -> CoreResult<f64> {
    env_parse("FUSION_STATIC_WEIGHT", DEFAULT_STATIC_WEIGHT)
}

/// Get behavioral branch weight from environment or use default
pub fn get_behavioral_weight() -> CoreResult<f64> {
    env_parse("FUSION_BEHAVIORAL_WEIGHT", DEFAULT_BEHAVIORAL_WEIGHT)
}

/// Get fused verdict threshold from environment or use default
pub fn get_decision_threshold() -> CoreResult<f64> {
    env_parse("FUSION_DECISION_THRESHOLD", DEFAULT_DECISION_THRESHOLD)
}

/// Get Caution band lower bound from environment or use default
pub fn get_caution_min() -> CoreResult<f64> {
    env_parse("RISK_CAUTION_MIN", DEFAULT_CAUTION_MIN)
}

/// Get High Risk band lower bound from environment or use default
pub fn get_high_risk_min() -> CoreResult<f64> {
    env_parse("RISK_HIGH_MIN", DEFAULT_HIGH_RISK_MIN)
}

/// Get explanation length cap from environment or use default
pub fn get_max_reasons() -> CoreResult<usize> {
    env_parse("EXPLAIN_MAX_REASONS", DEFAULT_MAX_REASONS)
}

/// Get minimum phrased contribution magnitude from environment or use default
pub fn get_min_contribution() -> CoreResult<f32> {
    env_parse("EXPLAIN_MIN_MAGNITUDE", DEFAULT_MIN_CONTRIBUTION)
}
