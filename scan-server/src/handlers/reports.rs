//! Report handler

use axum::Json;
use chrono::Utc;
use validator::Validate;

use hybrid_scan_core::logic::fusion::verdict_for;
use hybrid_scan_core::{band_with, ScanReport};

use crate::models::ReportRequest;
use crate::{AppError, AppResult};

/// Build a report from a caller-supplied scan result.
///
/// Band and verdict are recomputed from `final_prob` under the policy the
/// result carries; a result whose labels disagree is rejected.
pub async fn generate(Json(req): Json<ReportRequest>) -> AppResult<Json<ScanReport>> {
    req.validate()?;

    let result = &req.result;
    let p = result.final_probability();
    if !(0.0..=1.0).contains(&p) {
        return Err(AppError::ValidationError(format!(
            "final_prob {} outside [0, 1]",
            p
        )));
    }

    let debug = result.debug();
    debug
        .cut_points
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let band = band_with(p, &debug.cut_points);
    if band != result.risk_band() {
        return Err(AppError::ValidationError(format!(
            "risk_band {:?} does not match final_prob {} (expected {:?})",
            result.risk_band(),
            p,
            band
        )));
    }

    let verdict = verdict_for(p, debug.decision_threshold);
    if verdict != result.verdict() {
        return Err(AppError::ValidationError(format!(
            "verdict {} does not match final_prob {} at threshold {}",
            result.verdict(),
            p,
            debug.decision_threshold
        )));
    }

    Ok(Json(ScanReport::from_result(
        req.filename.as_str(),
        result,
        req.timestamp,
        Utc::now(),
    )))
}
