//! Detection log models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use hybrid_scan_core::{DetectionLogRecord, RiskBand, RiskCutPoints, Verdict};

#[derive(Debug, Serialize)]
pub struct LogEntry {
    pub id: Option<i64>,
    pub filename: String,
    pub verdict: Verdict,
    pub probability: f64,
    /// Recomputed from the stored probability
    pub risk_band: RiskBand,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn from_record(record: DetectionLogRecord, cut_points: &RiskCutPoints) -> Self {
        Self {
            risk_band: record.risk_band(cut_points),
            id: record.id,
            filename: record.filename,
            verdict: record.verdict,
            probability: record.probability,
            timestamp: record.timestamp,
        }
    }
}

#[derive(Debug, Deserialize, Default, Validate)]
pub struct LogsQuery {
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<usize>,
}
