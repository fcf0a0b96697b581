//! Sync Log Module
//!
//! Append-only persistent log of sync activity: run start/end, per-order
//! outcomes, entity creations and failures with tracebacks. Queryable by
//! type, status and date from the dashboard layer.

pub mod service;
pub mod storage;
pub mod types;

pub use service::SyncLogService;
pub use storage::SyncLogStorage;
pub use types::{SyncLogEntry, SyncLogQuery};
