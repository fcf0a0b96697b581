//! Invoices API module
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/invoices/{key}/push | POST | push invoice completion to the storefront |
//! | /api/invoices/{key}/status | GET | invoice linking and push state |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/invoices", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/{key}/push", post(handler::push_invoice))
        .route("/{key}/status", get(handler::invoice_status))
}
