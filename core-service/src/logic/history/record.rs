use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::config::RiskCutPoints;
use crate::logic::decision::FusionResult;
use crate::logic::fusion::{band_with, RiskBand, Verdict};

/// One persisted scan: what the log keeps of a FusionResult
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionLogRecord {
    /// Assigned by the store on insert
    pub id: Option<i64>,
    pub filename: String,
    pub verdict: Verdict,
    pub probability: f64,
    pub timestamp: DateTime<Utc>,
}

impl DetectionLogRecord {
    pub fn from_result(filename: impl Into<String>, result: &FusionResult, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: None,
            filename: filename.into(),
            verdict: result.verdict(),
            probability: result.final_probability(),
            timestamp,
        }
    }

    /// Band recomputed from the stored probability
    pub fn risk_band(&self, cut_points: &RiskCutPoints) -> RiskBand {
        band_with(self.probability, cut_points)
    }
}
