//! Config API module
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/config | GET | current storefront settings |
//! | /api/config | PUT | partial settings update |

mod handler;

use axum::{Router, routing::get};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/config", routes())
}

fn routes() -> Router<AppState> {
    Router::new().route("/", get(handler::get_settings).put(handler::update_settings))
}
