//! Detection policy handler

use axum::{extract::State, Json};
use serde::Serialize;

use hybrid_scan_core::logic::model::ArtifactInfo;
use hybrid_scan_core::constants::APP_VERSION;
use hybrid_scan_core::DetectionConfig;

use crate::models::DecisionThresholds;
use crate::AppState;

#[derive(Serialize)]
pub struct ConfigResponse {
    engine_version: &'static str,
    detection: DetectionConfig,
    decision_thresholds: DecisionThresholds,
    models: Vec<ArtifactInfo>,
}

/// Read-only view of the active policy, so clients band results the same way
pub async fn get(State(state): State<AppState>) -> Json<ConfigResponse> {
    let detection = *state.assembler.config();

    Json(ConfigResponse {
        engine_version: APP_VERSION,
        decision_thresholds: DecisionThresholds::from(&detection.cut_points),
        models: state.assembler.registry().models(),
        detection,
    })
}
