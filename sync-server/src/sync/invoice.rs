//! Invoice Propagator
//!
//! Reverse-direction notification: when an invoice is raised against a
//! synced sales order, push the `completed` status and the invoice reference
//! back to the storefront. Invoices without a storefront-linked sales order
//! are skipped, not failed.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use shared::models::{LogStatus, LogType};
use shared::order::MetaEntry;
use tracing::{info, warn};

use crate::db::repository::{InvoiceRepository, SalesOrderRepository, SettingsRepository};
use crate::storefront::StorefrontClientFactory;
use crate::sync_log::SyncLogService;

use super::SyncError;

/// Order metadata key the invoice reference is written under
const INVOICE_META_KEY: &str = "erp_invoice";

const COMPLETED_STATUS: &str = "completed";

/// Linking and push state of one invoice.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceSyncStatus {
    pub invoice: String,
    /// Whether the invoice resolves to a storefront order
    pub linked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storefront_order_id: Option<String>,
    /// Unix millis of the completed push, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pushed_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropagationOutcome {
    /// Status and reference pushed, invoice marked
    Success,
    /// Invoice has no storefront-linked sales order, nothing to push
    Skipped(String),
    /// Push attempted and failed
    Failed(String),
}

pub struct InvoicePropagator {
    invoices: InvoiceRepository,
    sales_orders: SalesOrderRepository,
    settings: SettingsRepository,
    factory: Arc<dyn StorefrontClientFactory>,
    log: SyncLogService,
}

impl InvoicePropagator {
    pub fn new(
        invoices: InvoiceRepository,
        sales_orders: SalesOrderRepository,
        settings: SettingsRepository,
        factory: Arc<dyn StorefrontClientFactory>,
        log: SyncLogService,
    ) -> Self {
        Self {
            invoices,
            sales_orders,
            settings,
            factory,
            log,
        }
    }

    /// Linking state of one invoice, for the status endpoint.
    pub async fn status(&self, invoice_key: &str) -> Result<InvoiceSyncStatus, SyncError> {
        let invoice = self
            .invoices
            .find_by_key(invoice_key)
            .await?
            .ok_or_else(|| {
                SyncError::PropagationFailed(format!("invoice {invoice_key} not found"))
            })?;

        let storefront_order_id = match &invoice.sales_order {
            Some(order_id) => self
                .sales_orders
                .find_by_id(order_id)
                .await?
                .map(|o| o.storefront_order_id)
                .filter(|id| !id.is_empty()),
            None => None,
        };

        Ok(InvoiceSyncStatus {
            invoice: invoice_key.to_string(),
            linked: storefront_order_id.is_some(),
            storefront_order_id,
            pushed_at: invoice.pushed_at,
        })
    }

    /// Push one invoice's completion back to the storefront.
    ///
    /// Returns an error only for missing invoices and configuration
    /// problems; a failed push is reported in the outcome and logged.
    pub async fn propagate(&self, invoice_key: &str) -> Result<PropagationOutcome, SyncError> {
        let invoice = self
            .invoices
            .find_by_key(invoice_key)
            .await?
            .ok_or_else(|| {
                SyncError::PropagationFailed(format!("invoice {invoice_key} not found"))
            })?;

        if invoice.pushed_at.is_some() {
            return Ok(PropagationOutcome::Skipped(
                "invoice already pushed to storefront".into(),
            ));
        }

        let Some(order_id) = invoice.sales_order else {
            return Ok(PropagationOutcome::Skipped(
                "invoice is not linked to a sales order".into(),
            ));
        };

        let order = self
            .sales_orders
            .find_by_id(&order_id)
            .await?
            .ok_or_else(|| {
                SyncError::PropagationFailed(format!("sales order {order_id} not found"))
            })?;

        if order.storefront_order_id.is_empty() {
            return Ok(PropagationOutcome::Skipped(
                "sales order has no storefront counterpart".into(),
            ));
        }

        let settings = self.settings.load().await?;
        if !settings.is_complete() {
            return Err(SyncError::ConfigurationIncomplete);
        }
        let client = self.factory.build(&settings)?;

        let metadata = vec![MetaEntry::new(INVOICE_META_KEY, invoice_key)];
        match client
            .update_order_status(&order.storefront_order_id, COMPLETED_STATUS, metadata)
            .await
        {
            Ok(()) => {
                self.invoices.mark_pushed(&invoice.id).await?;
                self.log
                    .log(
                        LogType::Invoice,
                        LogStatus::Success,
                        &format!("Pushed invoice {invoice_key} to storefront"),
                        json!({ "invoice": invoice_key, "order": order.storefront_order_id }),
                        Some(invoice_key.to_string()),
                        Some(order.storefront_order_id.clone()),
                        None,
                    )
                    .await;
                info!(invoice = invoice_key, order = %order.storefront_order_id, "Invoice pushed to storefront");
                Ok(PropagationOutcome::Success)
            }
            Err(e) => {
                let reason = e.to_string();
                warn!(invoice = invoice_key, error = %reason, "Invoice push failed");
                self.log
                    .log(
                        LogType::Invoice,
                        LogStatus::Failed,
                        &format!("Failed to push invoice {invoice_key}: {reason}"),
                        json!({ "invoice": invoice_key, "order": order.storefront_order_id }),
                        Some(invoice_key.to_string()),
                        Some(order.storefront_order_id.clone()),
                        Some(reason.clone()),
                    )
                    .await;
                Ok(PropagationOutcome::Failed(reason))
            }
        }
    }
}
