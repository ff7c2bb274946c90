//! Fusion Types
//!
//! Verdict and risk band vocabulary shared by the core, the history log and
//! every client that recomputes a band from a stored probability.

use serde::{Deserialize, Serialize};

use crate::logic::config::FusionWeights;
use crate::logic::error::DetectionError;

// ============================================================================
// VERDICT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Benign,
    Malicious,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Benign => "Benign",
            Verdict::Malicious => "Malicious",
        }
    }

    pub fn is_malicious(&self) -> bool {
        matches!(self, Verdict::Malicious)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Older history rows stored `Safe` for benign scans
impl std::str::FromStr for Verdict {
    type Err = DetectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Benign" | "Safe" => Ok(Verdict::Benign),
            "Malicious" => Ok(Verdict::Malicious),
            other => Err(DetectionError::History(format!("unknown verdict '{}'", other))),
        }
    }
}

// ============================================================================
// RISK BAND
// ============================================================================

/// Ordinal: Safe < Caution < HighRisk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskBand {
    Safe,
    Caution,
    HighRisk,
}

impl RiskBand {
    /// Human label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Safe => "Safe",
            RiskBand::Caution => "Caution",
            RiskBand::HighRisk => "High Risk",
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// FUSED SCORE
// ============================================================================

/// Which branches contributed to the fused probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionMode {
    Hybrid,
    StaticOnly,
    BehavioralOnly,
}

impl FusionMode {
    pub fn is_degraded(&self) -> bool {
        !matches!(self, FusionMode::Hybrid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusedScore {
    pub probability: f64,
    pub verdict: Verdict,
    pub mode: FusionMode,
    /// Weights actually applied; the full weight sits on the available
    /// branch in degraded mode
    pub applied_weights: FusionWeights,
}
