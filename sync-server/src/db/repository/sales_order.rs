//! Sales Order Repository
//!
//! The storefront order id lives in a dedicated linking field with a unique
//! index — for any storefront order at most one sales order record exists.
//! Subsequent syncs of the same order only ever mutate status (and, while
//! still a draft, the store location).

use super::{BaseRepository, FIND_OR_CREATE_ATTEMPTS, RepoError, RepoResult};
use serde::{Deserialize, Serialize};
use shared::models::ErpOrderStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const SALES_ORDER_TABLE: &str = "sales_order";

/// One resolved line on a sales order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrderItem {
    pub item: RecordId,
    pub item_code: String,
    pub qty: f64,
    pub rate: f64,
    pub amount: f64,
}

/// One tax row on a sales order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrderTax {
    pub charge_type: String,
    pub account_head: String,
    pub rate: f64,
    pub description: String,
}

/// Stored sales order record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrder {
    pub id: RecordId,
    /// Linking field: the storefront order id (unique)
    pub storefront_order_id: String,
    pub customer: RecordId,
    pub status: ErpOrderStatus,
    /// Submission flag: false = mutable draft, true = locked in
    pub submitted: bool,
    pub items: Vec<SalesOrderItem>,
    pub taxes: Vec<SalesOrderTax>,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub store_location: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Insert payload. Orders are always persisted as drafts first; submission
/// is a separate step.
#[derive(Debug, Clone, Serialize)]
pub struct SalesOrderCreate {
    pub storefront_order_id: String,
    pub customer: RecordId,
    pub status: ErpOrderStatus,
    pub submitted: bool,
    pub items: Vec<SalesOrderItem>,
    pub taxes: Vec<SalesOrderTax>,
    pub currency: String,
    pub store_location: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Clone)]
pub struct SalesOrderRepository {
    base: BaseRepository,
}

impl SalesOrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_storefront_id(&self, storefront_order_id: &str) -> RepoResult<Option<SalesOrder>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM sales_order WHERE storefront_order_id = $oid LIMIT 1")
            .bind(("oid", storefront_order_id.to_string()))
            .await?;
        let orders: Vec<SalesOrder> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<SalesOrder>> {
        let order: Option<SalesOrder> = self.base.db().select(id.clone()).await?;
        Ok(order)
    }

    /// Persist a new draft. A concurrent run that already inserted the same
    /// storefront order id wins; the caller re-reads and takes the update
    /// path instead.
    pub async fn create_draft(&self, data: SalesOrderCreate) -> RepoResult<SalesOrder> {
        for _ in 0..FIND_OR_CREATE_ATTEMPTS {
            match self.try_create(data.clone()).await {
                Ok(order) => return Ok(order),
                Err(RepoError::Duplicate(_)) => {
                    if let Some(existing) =
                        self.find_by_storefront_id(&data.storefront_order_id).await?
                    {
                        return Ok(existing);
                    }
                    // Winner not visible yet; retry the lookup
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
        Err(RepoError::Duplicate(format!(
            "sales order {} still conflicting after {} attempts",
            data.storefront_order_id, FIND_OR_CREATE_ATTEMPTS
        )))
    }

    async fn try_create(&self, data: SalesOrderCreate) -> RepoResult<SalesOrder> {
        let created: Option<SalesOrder> = self
            .base
            .db()
            .create(SALES_ORDER_TABLE)
            .content(data)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create sales order".into()))
    }

    /// Submit a draft: lock it in and apply the mapped status in the same
    /// write.
    pub async fn submit(&self, id: &RecordId, status: ErpOrderStatus) -> RepoResult<SalesOrder> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $order SET submitted = true, status = $status, updated_at = $now RETURN AFTER")
            .bind(("order", id.clone()))
            .bind(("status", status))
            .bind(("now", shared::util::now_millis()))
            .await?;
        let orders: Vec<SalesOrder> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Sales order {id} not found")))
    }

    pub async fn update_status(&self, id: &RecordId, status: ErpOrderStatus) -> RepoResult<SalesOrder> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $order SET status = $status, updated_at = $now RETURN AFTER")
            .bind(("order", id.clone()))
            .bind(("status", status))
            .bind(("now", shared::util::now_millis()))
            .await?;
        let orders: Vec<SalesOrder> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Sales order {id} not found")))
    }

    /// Refresh the store location on a record that is still a draft.
    pub async fn update_store_location(&self, id: &RecordId, location: &str) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $order SET store_location = $loc, updated_at = $now WHERE submitted = false")
            .bind(("order", id.clone()))
            .bind(("loc", location.to_string()))
            .bind(("now", shared::util::now_millis()))
            .await?;
        Ok(())
    }

    /// Total number of sales order records (test and diagnostics helper).
    pub async fn count(&self) -> RepoResult<u64> {
        #[derive(Deserialize)]
        struct CountResult {
            total: u64,
        }
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM sales_order GROUP ALL")
            .await?;
        let counts: Vec<CountResult> = result.take(0)?;
        Ok(counts.first().map(|c| c.total).unwrap_or(0))
    }
}
