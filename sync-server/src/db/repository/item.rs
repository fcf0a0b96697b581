//! Item Repository
//!
//! Items are correlated by code (resolved SKU or deterministic fallback).
//! The unique index on `code` makes find-or-create safe under overlapping
//! runs.

use super::{BaseRepository, FIND_OR_CREATE_ATTEMPTS, RepoError, RepoResult};
use serde::{Deserialize, Serialize};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const ITEM_TABLE: &str = "item";

/// Stored item record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: RecordId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub item_group: String,
    pub stock_uom: String,
    pub is_stock_item: bool,
    pub is_sales_item: bool,
    pub is_purchase_item: bool,
    pub created_at: i64,
}

/// Insert payload.
#[derive(Debug, Clone, Serialize)]
pub struct ItemCreate {
    pub code: String,
    pub name: String,
    pub description: String,
    pub item_group: String,
    pub stock_uom: String,
    pub is_stock_item: bool,
    pub is_sales_item: bool,
    pub is_purchase_item: bool,
    pub created_at: i64,
}

impl ItemCreate {
    /// New item with the default stock/sales/purchase flags.
    pub fn with_defaults(code: String, name: String, description: String) -> Self {
        Self {
            code,
            name,
            description,
            item_group: "All Item Groups".into(),
            stock_uom: "Nos".into(),
            is_stock_item: true,
            is_sales_item: true,
            is_purchase_item: true,
            created_at: shared::util::now_millis(),
        }
    }
}

#[derive(Clone)]
pub struct ItemRepository {
    base: BaseRepository,
}

impl ItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<Item>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM item WHERE code = $code LIMIT 1")
            .bind(("code", code.to_string()))
            .await?;
        let items: Vec<Item> = result.take(0)?;
        Ok(items.into_iter().next())
    }

    /// Create the item, or return the existing record on a lost race.
    pub async fn find_or_create(&self, data: ItemCreate) -> RepoResult<Item> {
        for _ in 0..FIND_OR_CREATE_ATTEMPTS {
            if let Some(existing) = self.find_by_code(&data.code).await? {
                return Ok(existing);
            }

            match self.try_create(data.clone()).await {
                Ok(item) => return Ok(item),
                Err(RepoError::Duplicate(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(RepoError::Duplicate(format!(
            "item {} still conflicting after {} attempts",
            data.code, FIND_OR_CREATE_ATTEMPTS
        )))
    }

    async fn try_create(&self, data: ItemCreate) -> RepoResult<Item> {
        let created: Option<Item> = self.base.db().create(ITEM_TABLE).content(data).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create item".into()))
    }
}
