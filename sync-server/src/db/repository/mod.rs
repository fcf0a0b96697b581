//! Repository Module
//!
//! CRUD access to the back-office document store. Each entity with a
//! correlation key exposes an atomic find-or-create built on the table's
//! unique index: losing a creation race downgrades to re-reading the
//! winner's row.

pub mod customer;
pub mod invoice;
pub mod item;
pub mod sales_order;
pub mod settings;
pub mod sync_state;

// Re-exports
pub use customer::CustomerRepository;
pub use invoice::InvoiceRepository;
pub use item::ItemRepository;
pub use sales_order::SalesOrderRepository;
pub use settings::SettingsRepository;
pub use sync_state::SyncStateRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Attempts for a find-or-create before surfacing a store conflict
pub const FIND_OR_CREATE_ATTEMPTS: u32 = 3;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique index violations read "Database index `x` already contains ..."
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
