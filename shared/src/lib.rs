//! Shared types for the storefront sync service
//!
//! Common types used across crates: storefront order payloads, back-office
//! model enums, sync run summaries, log record types, and utility helpers.

pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{ErpOrderStatus, LogStatus, LogType, OrderOutcome, OutcomeKind, SyncRunStatus, SyncRunSummary};
pub use order::{BillingInfo, LineItem, MetaEntry, OrderPayload, TaxLine};
