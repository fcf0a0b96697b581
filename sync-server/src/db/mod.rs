//! Database Module
//!
//! Embedded SurrealDB store and entity repositories. Every correlation key
//! (storefront order id, item code, customer email, classification names)
//! carries a UNIQUE index so find-or-create cannot produce duplicates even
//! when two runs overlap.

pub mod repository;

use crate::core::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "backoffice";
const DATABASE: &str = "sync";

/// Schema bootstrap: tables plus the uniqueness constraints the sync's
/// duplicate-prevention invariants rely on.
const SCHEMA: &str = "
    DEFINE TABLE IF NOT EXISTS settings SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS customer SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS customer_email_idx ON TABLE customer COLUMNS email UNIQUE;
    DEFINE TABLE IF NOT EXISTS customer_group SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS customer_group_name_idx ON TABLE customer_group COLUMNS name UNIQUE;
    DEFINE TABLE IF NOT EXISTS territory SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS territory_name_idx ON TABLE territory COLUMNS name UNIQUE;
    DEFINE TABLE IF NOT EXISTS item SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS item_code_idx ON TABLE item COLUMNS code UNIQUE;
    DEFINE TABLE IF NOT EXISTS sales_order SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS sales_order_storefront_idx ON TABLE sales_order COLUMNS storefront_order_id UNIQUE;
    DEFINE TABLE IF NOT EXISTS invoice SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS sync_state SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS sync_log SCHEMALESS;
";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database and apply the schema.
    pub async fn open(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::init(db).await
    }

    /// In-memory database for tests.
    #[cfg(test)]
    pub async fn open_in_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<surrealdb::engine::local::Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::init(db).await
    }

    async fn init(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;

        tracing::info!("Database ready (SurrealDB embedded)");
        Ok(Self { db })
    }
}
