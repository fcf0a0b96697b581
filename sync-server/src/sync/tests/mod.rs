use super::*;
use async_trait::async_trait;
use shared::order::{BillingInfo, LineItem, MetaEntry, OrderPayload, TaxLine};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;

use crate::db::DbService;
use crate::db::repository::settings::{SettingsUpdate, StorefrontSettings};
use crate::db::repository::{
    CustomerRepository, InvoiceRepository, ItemRepository, SalesOrderRepository,
    SettingsRepository, SyncStateRepository,
};
use crate::storefront::{ClientError, StorefrontApi, StorefrontClientFactory};
use crate::sync_log::{SyncLogService, SyncLogStorage};

// ========================================================================
// Harness: in-memory store with every repository wired up
// ========================================================================

pub struct Harness {
    pub customers: CustomerRepository,
    pub items: ItemRepository,
    pub sales_orders: SalesOrderRepository,
    pub invoices: InvoiceRepository,
    pub settings: SettingsRepository,
    pub sync_state: SyncStateRepository,
    pub log: SyncLogService,
}

impl Harness {
    pub async fn new() -> Self {
        let db = DbService::open_in_memory().await.unwrap();
        let handle = db.db.clone();
        let settings = SettingsRepository::new(handle.clone());
        settings.ensure_exists().await.unwrap();
        Self {
            customers: CustomerRepository::new(handle.clone()),
            items: ItemRepository::new(handle.clone()),
            sales_orders: SalesOrderRepository::new(handle.clone()),
            invoices: InvoiceRepository::new(handle.clone()),
            settings,
            sync_state: SyncStateRepository::new(handle.clone()),
            log: SyncLogService::new(SyncLogStorage::new(handle)),
        }
    }

    /// Store a complete, enabled storefront configuration.
    pub async fn configure(&self) -> StorefrontSettings {
        self.settings
            .update(SettingsUpdate {
                url: Some("https://shop.example.com".into()),
                consumer_key: Some("ck_test".into()),
                consumer_secret: Some("cs_test".into()),
                enable_sync: Some(true),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    pub fn resolver(&self) -> EntityResolver {
        EntityResolver::new(self.customers.clone(), self.items.clone(), self.log.clone())
    }

    pub fn reconciler(&self) -> OrderReconciler {
        OrderReconciler::new(self.sales_orders.clone(), self.resolver(), self.log.clone())
    }

    pub fn coordinator(&self, client: Arc<StubStorefront>) -> SyncCoordinator {
        SyncCoordinator::new(
            self.settings.clone(),
            self.sync_state.clone(),
            Arc::new(StubFactory::new(client)),
            self.reconciler(),
            self.log.clone(),
        )
    }

    pub fn propagator(&self, client: Arc<StubStorefront>) -> InvoicePropagator {
        InvoicePropagator::new(
            self.invoices.clone(),
            self.sales_orders.clone(),
            self.settings.clone(),
            Arc::new(StubFactory::new(client)),
            self.log.clone(),
        )
    }
}

// ========================================================================
// Storefront stub
// ========================================================================

#[derive(Default)]
pub struct StubStorefront {
    pub orders: Vec<OrderPayload>,
    pub fail_fetch: bool,
    pub fail_update: bool,
    /// Recorded (order_id, status, metadata) pushes
    pub updates: StdMutex<Vec<(String, String, Vec<MetaEntry>)>>,
}

impl StubStorefront {
    pub fn with_orders(orders: Vec<OrderPayload>) -> Arc<Self> {
        Arc::new(Self {
            orders,
            ..Default::default()
        })
    }

    pub fn failing_fetch() -> Arc<Self> {
        Arc::new(Self {
            fail_fetch: true,
            ..Default::default()
        })
    }
}

#[async_trait]
impl StorefrontApi for StubStorefront {
    async fn fetch_orders(&self, _statuses: &[&str]) -> Result<Vec<OrderPayload>, ClientError> {
        if self.fail_fetch {
            return Err(ClientError::Status {
                status: 503,
                body: "maintenance".into(),
            });
        }
        Ok(self.orders.clone())
    }

    async fn update_order_status(
        &self,
        order_id: &str,
        status: &str,
        metadata: Vec<MetaEntry>,
    ) -> Result<(), ClientError> {
        if self.fail_update {
            return Err(ClientError::Status {
                status: 500,
                body: "boom".into(),
            });
        }
        self.updates
            .lock()
            .unwrap()
            .push((order_id.to_string(), status.to_string(), metadata));
        Ok(())
    }
}

pub struct StubFactory {
    client: Arc<StubStorefront>,
}

impl StubFactory {
    pub fn new(client: Arc<StubStorefront>) -> Self {
        Self { client }
    }
}

impl StorefrontClientFactory for StubFactory {
    fn build(&self, _settings: &StorefrontSettings) -> Result<Arc<dyn StorefrontApi>, ClientError> {
        Ok(self.client.clone())
    }
}

/// Factory whose `build` always fails, for client-construction error paths.
pub struct FailingFactory;

impl StorefrontClientFactory for FailingFactory {
    fn build(&self, _settings: &StorefrontSettings) -> Result<Arc<dyn StorefrontApi>, ClientError> {
        Err(ClientError::Config("no client for you".into()))
    }
}

// ========================================================================
// Payload builders
// ========================================================================

pub fn line(name: &str, sku: Option<&str>, qty: f64, price: f64) -> LineItem {
    LineItem {
        name: name.into(),
        quantity: qty,
        price,
        total: format!("{:.2}", qty * price),
        sku: sku.map(str::to_string),
        ..Default::default()
    }
}

/// A valid order with one line item and a unique billing email.
pub fn order(id: i64, status: &str) -> OrderPayload {
    OrderPayload {
        id,
        status: status.into(),
        customer_id: Some(id + 1000),
        billing: BillingInfo {
            first_name: "Test".into(),
            last_name: format!("Buyer{id}"),
            email: format!("buyer{id}@example.com"),
            ..Default::default()
        },
        line_items: vec![line("Espresso Beans 1kg", Some("BEAN-1KG"), 2.0, 24.15)],
        tax_lines: vec![TaxLine {
            rate_percent: 5.0,
            label: "GST".into(),
            tax_total: "2.42".into(),
        }],
        currency: "CAD".into(),
        total: "50.72".into(),
        ..Default::default()
    }
}

mod test_coordinator;
mod test_invoice;
mod test_reconciler;
