//! Application state - holds shared references to every service

use std::sync::Arc;
use std::time::Duration;

use crate::core::{AppError, Config};
use crate::db::DbService;
use crate::db::repository::{
    CustomerRepository, InvoiceRepository, ItemRepository, SalesOrderRepository,
    SettingsRepository, SyncStateRepository,
};
use crate::storefront::{StorefrontClientFactory, WooClientFactory};
use crate::sync::{EntityResolver, InvoicePropagator, OrderReconciler, SyncCoordinator};
use crate::sync_log::{SyncLogService, SyncLogStorage};

/// Shared application state. Cheap to clone; every service sits behind an
/// `Arc` or holds only a database handle.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: DbService,
    pub settings: SettingsRepository,
    pub coordinator: Arc<SyncCoordinator>,
    pub propagator: Arc<InvoicePropagator>,
    pub log: SyncLogService,
}

impl AppState {
    /// Open the database, wire up repositories and services.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.work_dir).map_err(|e| {
            AppError::internal(format!(
                "Failed to create work dir {}: {e}",
                config.work_dir
            ))
        })?;

        let db = DbService::open(&config.database_path()).await?;
        let handle = db.db.clone();

        let settings = SettingsRepository::new(handle.clone());
        settings.ensure_exists().await?;
        let customers = CustomerRepository::new(handle.clone());
        let items = ItemRepository::new(handle.clone());
        let sales_orders = SalesOrderRepository::new(handle.clone());
        let invoices = InvoiceRepository::new(handle.clone());
        let sync_state = SyncStateRepository::new(handle.clone());
        let log = SyncLogService::new(SyncLogStorage::new(handle));

        let factory: Arc<dyn StorefrontClientFactory> = Arc::new(WooClientFactory::new(
            Duration::from_secs(config.client_timeout_secs),
        ));

        let resolver = EntityResolver::new(customers, items, log.clone());
        let reconciler = OrderReconciler::new(sales_orders.clone(), resolver, log.clone());
        let coordinator = Arc::new(SyncCoordinator::new(
            settings.clone(),
            sync_state,
            factory.clone(),
            reconciler,
            log.clone(),
        ));
        let propagator = Arc::new(InvoicePropagator::new(
            invoices,
            sales_orders,
            settings.clone(),
            factory,
            log.clone(),
        ));

        tracing::info!("Application state initialized");

        Ok(Self {
            config: Arc::new(config.clone()),
            db,
            settings,
            coordinator,
            propagator,
            log,
        })
    }
}
