//! Sync API module
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/sync/run | POST | execute one sync run |
//! | /api/sync/status | GET | latest run snapshot |
//! | /api/sync/logs | GET | query the sync log |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/sync", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/run", post(handler::run_sync))
        .route("/status", get(handler::get_sync_status))
        .route("/logs", get(handler::get_sync_logs))
}
