//! Scan handler

use axum::{extract::State, Json};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use hybrid_scan_core::logic::features::BehaviorSummary;
use hybrid_scan_core::{Branch, BranchInputs, DetectionLogRecord, FeatureVector, HistoryStore};

use crate::models::{DecisionThresholds, ScanRequest, ScanResponse};
use crate::{AppResult, AppState};

/// Run one hybrid scan and log it
pub async fn scan(
    State(state): State<AppState>,
    Json(req): Json<ScanRequest>,
) -> AppResult<Json<ScanResponse>> {
    req.validate()?;

    let inputs = build_inputs(&state, &req)?;
    let scan_id = Uuid::new_v4();
    let available: Vec<&str> = inputs.available().iter().map(|b| b.as_str()).collect();
    tracing::info!(%scan_id, filename = %req.filename, branches = ?available, "Scan requested");

    // CPU-bound: keep it off the async workers
    let assembler = state.assembler.clone();
    let result = tokio::task::spawn_blocking(move || assembler.decide(&inputs)).await??;

    let timestamp = Utc::now();
    let record = DetectionLogRecord::from_result(req.filename.clone(), &result, timestamp);
    let history = state.history.clone();
    let log_id = match tokio::task::spawn_blocking(move || history.append(&record)).await? {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::warn!(%scan_id, "Failed to persist scan: {}", e);
            None
        }
    };

    tracing::info!(
        %scan_id,
        verdict = %result.verdict(),
        probability = result.final_probability(),
        band = ?result.risk_band(),
        "Scan complete"
    );

    Ok(Json(ScanResponse {
        status: "ok",
        scan_id,
        log_id,
        filename: req.filename,
        timestamp,
        decision_thresholds: DecisionThresholds::from(&state.assembler.config().cut_points),
        result,
    }))
}

/// Named request features → vectors in each classifier's schema order
fn build_inputs(state: &AppState, req: &ScanRequest) -> AppResult<BranchInputs> {
    let registry = state.assembler.registry();
    let mut inputs = BranchInputs::new();

    if let Some(values) = &req.static_features {
        let schema = registry.classifier(Branch::Static).schema();
        inputs = inputs.with_static(FeatureVector::for_schema(schema, values)?);
    }

    if let Some(values) = &req.behavioral_features {
        let schema = registry.classifier(Branch::Behavioral).schema();
        inputs = inputs.with_behavioral(FeatureVector::for_schema(schema, values)?);
    } else if let Some(events) = &req.behavioral_events {
        inputs = inputs.with_behavioral(BehaviorSummary::aggregate(events).to_vector());
    }

    Ok(inputs)
}
