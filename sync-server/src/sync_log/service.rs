//! Sync log service
//!
//! Convenience layer over the storage: message truncation and the standard
//! entry shapes for runs, orders, customers and items. Logging must never
//! fail the sync, so every method swallows storage errors after tracing
//! them.

use serde_json::json;
use shared::models::{LogStatus, LogType};

use super::storage::SyncLogStorage;
use super::types::{SyncLogEntry, SyncLogQuery};

/// Sink messages are capped so one oversized payload cannot poison a run.
const MAX_MESSAGE_LEN: usize = 140;

#[derive(Clone)]
pub struct SyncLogService {
    storage: SyncLogStorage,
}

impl SyncLogService {
    pub fn new(storage: SyncLogStorage) -> Self {
        Self { storage }
    }

    fn truncate(message: &str) -> String {
        if message.len() > MAX_MESSAGE_LEN {
            let mut cut = MAX_MESSAGE_LEN - 3;
            while !message.is_char_boundary(cut) {
                cut -= 1;
            }
            format!("{}...", &message[..cut])
        } else {
            message.to_string()
        }
    }

    /// Append one entry; storage failures are traced and dropped.
    #[allow(clippy::too_many_arguments)]
    pub async fn log(
        &self,
        log_type: LogType,
        status: LogStatus,
        message: &str,
        details: serde_json::Value,
        reference: Option<String>,
        storefront_order_id: Option<String>,
        traceback: Option<String>,
    ) {
        if let Err(e) = self
            .storage
            .append(
                log_type,
                status,
                Self::truncate(message),
                details,
                reference,
                storefront_order_id,
                traceback,
            )
            .await
        {
            tracing::error!(error = %e, "Failed to write sync log entry");
        }
    }

    pub async fn log_sync_start(&self) {
        self.log(
            LogType::Sync,
            LogStatus::Info,
            "Starting storefront sync run",
            json!({ "timestamp": shared::util::now_millis() }),
            None,
            None,
            None,
        )
        .await;
    }

    pub async fn log_sync_end(&self, success: bool, message: &str) {
        self.log(
            LogType::Sync,
            if success {
                LogStatus::Success
            } else {
                LogStatus::Failed
            },
            message,
            json!({ "timestamp": shared::util::now_millis() }),
            None,
            None,
            None,
        )
        .await;
    }

    pub async fn log_order(
        &self,
        order_id: i64,
        success: bool,
        reference: Option<String>,
        error: Option<&str>,
    ) {
        let message = match (success, error) {
            (true, _) => format!("Synced order: {order_id}"),
            (false, Some(e)) => format!("Failed to sync order {order_id}: {e}"),
            (false, None) => format!("Failed to sync order {order_id}"),
        };
        self.log(
            LogType::Order,
            if success {
                LogStatus::Success
            } else {
                LogStatus::Failed
            },
            &message,
            json!({ "order_id": order_id }),
            reference,
            Some(order_id.to_string()),
            error.map(str::to_string),
        )
        .await;
    }

    pub async fn log_customer_creation(&self, customer_name: &str, error: Option<&str>) {
        let message = match error {
            None => format!("Created customer: {customer_name}"),
            Some(e) => format!("Failed to create customer {customer_name}: {e}"),
        };
        self.log(
            LogType::Customer,
            if error.is_none() {
                LogStatus::Success
            } else {
                LogStatus::Failed
            },
            &message,
            json!({ "customer_name": customer_name }),
            None,
            None,
            error.map(str::to_string),
        )
        .await;
    }

    pub async fn log_item_creation(&self, item_code: &str, error: Option<&str>) {
        let message = match error {
            None => format!("Created item: {item_code}"),
            Some(e) => format!("Failed to create item {item_code}: {e}"),
        };
        self.log(
            LogType::Item,
            if error.is_none() {
                LogStatus::Success
            } else {
                LogStatus::Failed
            },
            &message,
            json!({ "item_code": item_code }),
            None,
            None,
            error.map(str::to_string),
        )
        .await;
    }

    pub async fn log_error(&self, message: &str, details: serde_json::Value) {
        self.log(
            LogType::Sync,
            LogStatus::Failed,
            message,
            details,
            None,
            None,
            None,
        )
        .await;
    }

    pub async fn query(&self, query: &SyncLogQuery) -> Result<(Vec<SyncLogEntry>, u64), crate::core::AppError> {
        self.storage
            .query(query)
            .await
            .map_err(|e| crate::core::AppError::database(e.to_string()))
    }
}
