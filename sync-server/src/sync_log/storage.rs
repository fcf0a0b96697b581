//! Sync log SurrealDB storage
//!
//! Append-only: only `append` and `query`, no update or delete.

use serde::{Deserialize, Serialize};
use shared::models::{LogStatus, LogType};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use super::types::{SyncLogEntry, SyncLogQuery};

#[derive(Debug, Error)]
pub enum SyncLogStorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<surrealdb::Error> for SyncLogStorageError {
    fn from(err: surrealdb::Error) -> Self {
        SyncLogStorageError::Database(err.to_string())
    }
}

pub type SyncLogResult<T> = Result<T, SyncLogStorageError>;

/// Stored record shape (includes the SurrealDB record id).
#[derive(Debug, Clone, Deserialize)]
struct SyncLogRecord {
    #[allow(dead_code)]
    id: surrealdb::RecordId,
    log_type: LogType,
    status: LogStatus,
    message: String,
    #[serde(default)]
    details: serde_json::Value,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    storefront_order_id: Option<String>,
    #[serde(default)]
    traceback: Option<String>,
    logged_at: i64,
}

impl From<SyncLogRecord> for SyncLogEntry {
    fn from(r: SyncLogRecord) -> Self {
        SyncLogEntry {
            log_type: r.log_type,
            status: r.status,
            message: r.message,
            details: r.details,
            reference: r.reference,
            storefront_order_id: r.storefront_order_id,
            traceback: r.traceback,
            logged_at: r.logged_at,
        }
    }
}

/// Insert shape (no record id).
#[derive(Debug, Serialize)]
struct SyncLogInsert {
    log_type: LogType,
    status: LogStatus,
    message: String,
    details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    storefront_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    traceback: Option<String>,
    logged_at: i64,
}

#[derive(Debug, Deserialize)]
struct CountResult {
    total: u64,
}

/// Sync log storage (SurrealDB).
#[derive(Clone)]
pub struct SyncLogStorage {
    db: Surreal<Db>,
}

impl SyncLogStorage {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    /// Append one log entry.
    #[allow(clippy::too_many_arguments)]
    pub async fn append(
        &self,
        log_type: LogType,
        status: LogStatus,
        message: String,
        details: serde_json::Value,
        reference: Option<String>,
        storefront_order_id: Option<String>,
        traceback: Option<String>,
    ) -> SyncLogResult<()> {
        let insert = SyncLogInsert {
            log_type,
            status,
            message,
            details,
            reference,
            storefront_order_id,
            traceback,
            logged_at: shared::util::now_millis(),
        };

        let mut res = self
            .db
            .query("CREATE sync_log CONTENT $data")
            .bind(("data", insert))
            .await?;
        let _: Vec<SyncLogRecord> = res.take(0)?;
        Ok(())
    }

    /// Query log entries, newest first, with a total count for paging.
    pub async fn query(&self, q: &SyncLogQuery) -> SyncLogResult<(Vec<SyncLogEntry>, u64)> {
        let mut conditions = Vec::new();

        if q.log_type.is_some() {
            conditions.push("log_type = $log_type");
        }
        if q.status.is_some() {
            conditions.push("status = $status");
        }
        if q.from.is_some() {
            conditions.push("logged_at >= $from");
        }
        if q.to.is_some() {
            conditions.push("logged_at <= $to");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT count() as total FROM sync_log{where_clause} GROUP ALL");
        let select_sql = format!(
            "SELECT * FROM sync_log{} ORDER BY logged_at DESC LIMIT {} START {}",
            where_clause, q.limit, q.offset
        );
        let sql = format!("{count_sql}; {select_sql}");

        let mut qb = self.db.query(&sql);

        if let Some(log_type) = q.log_type {
            let value = serde_json::to_value(log_type)?
                .as_str()
                .unwrap_or_default()
                .to_string();
            qb = qb.bind(("log_type", value));
        }
        if let Some(status) = q.status {
            let value = serde_json::to_value(status)?
                .as_str()
                .unwrap_or_default()
                .to_string();
            qb = qb.bind(("status", value));
        }
        if let Some(from) = q.from {
            qb = qb.bind(("from", from));
        }
        if let Some(to) = q.to {
            qb = qb.bind(("to", to));
        }

        let mut result = qb.await?;

        let count_result: Vec<CountResult> = result.take(0)?;
        let total = count_result.first().map(|c| c.total).unwrap_or(0);

        let records: Vec<SyncLogRecord> = result.take(1)?;
        let entries = records.into_iter().map(SyncLogEntry::from).collect();

        Ok((entries, total))
    }
}
