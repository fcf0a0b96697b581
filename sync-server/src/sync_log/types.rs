//! Sync log entry and query types

use serde::{Deserialize, Serialize};
use shared::models::{LogStatus, LogType};

/// One sync log record as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncLogEntry {
    pub log_type: LogType,
    pub status: LogStatus,
    pub message: String,
    /// Structured detail payload (free-form JSON)
    #[serde(default)]
    pub details: serde_json::Value,
    /// Back-office record this entry refers to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Storefront order id, when the entry concerns one order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storefront_order_id: Option<String>,
    /// Error chain for failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traceback: Option<String>,
    /// Unix millis
    pub logged_at: i64,
}

/// Filters for the log query endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncLogQuery {
    pub log_type: Option<LogType>,
    pub status: Option<LogStatus>,
    /// Unix millis range, inclusive
    pub from: Option<i64>,
    pub to: Option<i64>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    50
}
