//! Sync engine error taxonomy
//!
//! Run-fatal errors (`ConfigurationIncomplete`, `SyncDisabled`,
//! `FetchFailed`) abort `run_sync`; everything else is order- or
//! invoice-level and is absorbed into that unit's outcome.

use thiserror::Error;

use crate::db::repository::RepoError;
use crate::storefront::ClientError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Storefront configuration is incomplete. Check the connection settings.")]
    ConfigurationIncomplete,

    #[error("Storefront sync is disabled")]
    SyncDisabled,

    #[error("Failed to fetch orders from storefront: {0}")]
    FetchFailed(String),

    #[error("Unrecognized order status: {0}")]
    UnrecognizedStatus(String),

    #[error("Order validation failed: {0}")]
    ValidationFailed(String),

    #[error("Entity resolution failed: {0}")]
    ResolutionFailed(String),

    #[error("Store conflict: {0}")]
    StoreConflict(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invoice propagation failed: {0}")]
    PropagationFailed(String),
}

impl From<RepoError> for SyncError {
    fn from(err: RepoError) -> Self {
        match err {
            // A conflict that survived the bounded re-lookup loop
            RepoError::Duplicate(msg) => SyncError::StoreConflict(msg),
            other => SyncError::Store(other.to_string()),
        }
    }
}

impl From<ClientError> for SyncError {
    fn from(err: ClientError) -> Self {
        SyncError::FetchFailed(err.to_string())
    }
}
