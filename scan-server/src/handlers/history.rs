//! Detection log handlers

use axum::{extract::{Path, Query, State}, Json};
use chrono::Utc;
use validator::Validate;

use hybrid_scan_core::{HistoryStore, ScanReport};

use crate::models::{LogEntry, LogsQuery};
use crate::{AppError, AppResult, AppState};

/// Most recent scans, newest first
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> AppResult<Json<Vec<LogEntry>>> {
    query.validate()?;
    let limit = query.limit.unwrap_or(state.config.history_limit);

    let history = state.history.clone();
    let records = tokio::task::spawn_blocking(move || history.recent(limit)).await??;

    let cut_points = state.assembler.config().cut_points;
    Ok(Json(
        records
            .into_iter()
            .map(|r| LogEntry::from_record(r, &cut_points))
            .collect(),
    ))
}

/// Report for one stored scan
pub async fn report(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ScanReport>> {
    let history = state.history.clone();
    let record = tokio::task::spawn_blocking(move || history.get(id))
        .await??
        .ok_or_else(|| AppError::NotFound(format!("Scan log {} not found", id)))?;

    let cut_points = state.assembler.config().cut_points;
    Ok(Json(ScanReport::from_history(&record, &cut_points, Utc::now())))
}
