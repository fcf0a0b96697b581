//! Invoice Repository
//!
//! Minimal read/mark access to back-office invoices. Invoices are created by
//! the billing workflow, not by this service; the propagator only follows
//! their sales-order link back to the storefront.

use super::{BaseRepository, RepoResult};
use serde::{Deserialize, Serialize};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const INVOICE_TABLE: &str = "invoice";

/// Stored invoice record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: RecordId,
    /// Linked sales order; absent for invoices unrelated to storefront orders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_order: Option<RecordId>,
    #[serde(default)]
    pub total: f64,
    pub created_at: i64,
    /// Set once the completion status has been pushed to the storefront
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pushed_at: Option<i64>,
}

#[derive(Clone)]
pub struct InvoiceRepository {
    base: BaseRepository,
}

impl InvoiceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_key(&self, key: &str) -> RepoResult<Option<Invoice>> {
        let invoice: Option<Invoice> = self.base.db().select((INVOICE_TABLE, key)).await?;
        Ok(invoice)
    }

    /// Record that the invoice reference reached the storefront.
    pub async fn mark_pushed(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $invoice SET pushed_at = $now")
            .bind(("invoice", id.clone()))
            .bind(("now", shared::util::now_millis()))
            .await?;
        Ok(())
    }

    /// Test/bootstrap helper: insert an invoice with a fixed key.
    pub async fn create_with_key(
        &self,
        key: &str,
        sales_order: Option<RecordId>,
        total: f64,
    ) -> RepoResult<Invoice> {
        #[derive(Serialize)]
        struct InvoiceCreate {
            #[serde(skip_serializing_if = "Option::is_none")]
            sales_order: Option<RecordId>,
            total: f64,
            created_at: i64,
        }

        let created: Option<Invoice> = self
            .base
            .db()
            .create((INVOICE_TABLE, key))
            .content(InvoiceCreate {
                sales_order,
                total,
                created_at: shared::util::now_millis(),
            })
            .await?;
        created.ok_or_else(|| super::RepoError::Database("Failed to create invoice".into()))
    }
}
