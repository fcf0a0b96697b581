//! Invoices API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::core::{AppResult, AppState};
use crate::sync::PropagationOutcome;
use crate::sync::invoice::InvoiceSyncStatus;

#[derive(Serialize)]
pub struct PushInvoiceResponse {
    invoice: String,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

/// POST /api/invoices/{key}/push - push the invoice's completion status and
/// reference back to the originating storefront order
pub async fn push_invoice(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<PushInvoiceResponse>> {
    let outcome = state.propagator.propagate(&key).await?;
    let (outcome, detail) = match outcome {
        PropagationOutcome::Success => ("pushed", None),
        PropagationOutcome::Skipped(reason) => ("skipped", Some(reason)),
        PropagationOutcome::Failed(reason) => ("failed", Some(reason)),
    };
    Ok(Json(PushInvoiceResponse {
        invoice: key,
        outcome,
        detail,
    }))
}

/// GET /api/invoices/{key}/status - linking and push state of an invoice
pub async fn invoice_status(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<InvoiceSyncStatus>> {
    let status = state.propagator.status(&key).await?;
    Ok(Json(status))
}
