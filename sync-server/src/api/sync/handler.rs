//! Sync API handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Serialize;
use shared::models::SyncRunSummary;

use crate::core::{AppResult, AppState};
use crate::sync_log::{SyncLogEntry, SyncLogQuery};

#[derive(Serialize)]
pub struct SyncRunResponse {
    status: String,
    message: String,
    summary: SyncRunSummary,
}

/// POST /api/sync/run - execute one sync run and return its summary
pub async fn run_sync(State(state): State<AppState>) -> AppResult<Json<SyncRunResponse>> {
    let summary = state.coordinator.run_sync().await?;
    Ok(Json(SyncRunResponse {
        status: summary.status.to_string(),
        message: format!(
            "{} created, {} updated, {} skipped, {} failed",
            summary.created, summary.updated, summary.skipped, summary.failed
        ),
        summary,
    }))
}

#[derive(Serialize)]
pub struct SyncStatusResponse {
    /// Unix millis of the last completed run, 0 = never ran
    last_sync: i64,
    sync_status: String,
    created: u32,
    updated: u32,
    skipped: u32,
    failed: u32,
}

/// GET /api/sync/status - latest persisted run snapshot
pub async fn get_sync_status(State(state): State<AppState>) -> AppResult<Json<SyncStatusResponse>> {
    let snapshot = state.coordinator.status().await?;
    Ok(Json(SyncStatusResponse {
        last_sync: snapshot.last_sync,
        sync_status: snapshot.sync_status,
        created: snapshot.created,
        updated: snapshot.updated,
        skipped: snapshot.skipped,
        failed: snapshot.failed,
    }))
}

#[derive(Serialize)]
pub struct SyncLogsResponse {
    entries: Vec<SyncLogEntry>,
    total: u64,
}

/// GET /api/sync/logs - query the sync log, newest first
pub async fn get_sync_logs(
    State(state): State<AppState>,
    Query(query): Query<SyncLogQuery>,
) -> AppResult<Json<SyncLogsResponse>> {
    let (entries, total) = state.log.query(&query).await?;
    Ok(Json(SyncLogsResponse { entries, total }))
}
