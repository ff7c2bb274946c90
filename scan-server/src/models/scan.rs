//! Scan request/response models

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use hybrid_scan_core::logic::features::BehaviorEvent;
use hybrid_scan_core::{FusionResult, RiskCutPoints};

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_scan_sources"))]
pub struct ScanRequest {
    #[validate(length(min = 1, max = 255))]
    pub filename: String,

    /// PE header features by column name
    #[serde(default)]
    pub static_features: Option<HashMap<String, f32>>,

    /// Pre-aggregated behavioral features by name
    #[serde(default)]
    pub behavioral_features: Option<HashMap<String, f32>>,

    /// Raw per-event flags, aggregated server-side (at most 1M events)
    #[serde(default)]
    #[validate(length(max = 1_000_000))]
    pub behavioral_events: Option<Vec<BehaviorEvent>>,
}

fn validate_scan_sources(req: &ScanRequest) -> Result<(), ValidationError> {
    if req.behavioral_features.is_some() && req.behavioral_events.is_some() {
        let mut err = ValidationError::new("behavioral_source");
        err.message = Some("send behavioral_features or behavioral_events, not both".into());
        return Err(err);
    }
    Ok(())
}

/// Band boundaries in the form clients use for local recomputation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DecisionThresholds {
    pub safe_max: f64,
    pub caution_max: f64,
}

impl From<&RiskCutPoints> for DecisionThresholds {
    fn from(cut_points: &RiskCutPoints) -> Self {
        Self {
            safe_max: cut_points.caution_min,
            caution_max: cut_points.high_risk_min,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub status: &'static str,
    pub scan_id: Uuid,
    /// Detection log row, absent when persisting failed
    pub log_id: Option<i64>,
    pub filename: String,
    pub timestamp: DateTime<Utc>,
    pub decision_thresholds: DecisionThresholds,
    #[serde(flatten)]
    pub result: FusionResult,
}

/// A scan response (or any FusionResult-shaped payload) to report on
#[derive(Debug, Deserialize, Validate)]
pub struct ReportRequest {
    #[validate(length(min = 1, max = 255))]
    pub filename: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub result: FusionResult,
}
