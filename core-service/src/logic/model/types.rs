//! Model Types
//!
//! Branch tags and branch probabilities. No logic beyond range checks.

use serde::{Deserialize, Serialize};

use crate::logic::error::{CoreResult, DetectionError};

// ============================================================================
// BRANCH
// ============================================================================

/// One of the two independent detection signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    /// File metadata (PE header) classifier
    Static,
    /// Aggregated runtime-event classifier
    Behavioral,
}

impl Branch {
    pub const ALL: [Branch; 2] = [Branch::Static, Branch::Behavioral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Static => "static",
            Branch::Behavioral => "behavioral",
        }
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Branch {
    type Err = DetectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(Branch::Static),
            "behavioral" | "behavioural" => Ok(Branch::Behavioral),
            other => Err(DetectionError::InvalidConfig(format!("unknown branch '{}'", other))),
        }
    }
}

// ============================================================================
// PROBABILITY SCORE
// ============================================================================

/// Maliciousness probability of one branch, always within [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbabilityScore {
    branch: Branch,
    value: f64,
}

impl ProbabilityScore {
    /// Out-of-range (or NaN) values are a model defect, reported as such
    pub fn new(branch: Branch, value: f64) -> CoreResult<Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(DetectionError::out_of_range(branch.as_str(), value));
        }
        Ok(Self { branch, value })
    }

    pub fn branch(&self) -> Branch {
        self.branch
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}
