//! Sync Coordinator
//!
//! Owns one full reconciliation run: gate on configuration, fetch the open
//! orders from the storefront, reconcile each one, then persist the run
//! snapshot. Runs are serialized by an internal lock; a second trigger waits
//! rather than interleaving writes with an in-flight run.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use shared::models::{OutcomeKind, SyncRunStatus, SyncRunSummary};
use shared::order::SUPPORTED_STATUSES;

use crate::db::repository::{SettingsRepository, SyncStateRepository};
use crate::db::repository::sync_state::SyncState;
use crate::storefront::StorefrontClientFactory;
use crate::sync_log::SyncLogService;

use super::reconciler::OrderReconciler;
use super::SyncError;

pub struct SyncCoordinator {
    settings: SettingsRepository,
    sync_state: SyncStateRepository,
    factory: Arc<dyn StorefrontClientFactory>,
    reconciler: OrderReconciler,
    log: SyncLogService,
    run_lock: Mutex<()>,
}

impl SyncCoordinator {
    pub fn new(
        settings: SettingsRepository,
        sync_state: SyncStateRepository,
        factory: Arc<dyn StorefrontClientFactory>,
        reconciler: OrderReconciler,
        log: SyncLogService,
    ) -> Self {
        Self {
            settings,
            sync_state,
            factory,
            reconciler,
            log,
            run_lock: Mutex::new(()),
        }
    }

    /// Execute one sync run end to end.
    ///
    /// Run-fatal failures (disabled sync, incomplete configuration, a failed
    /// fetch) return an error and leave local order state untouched.
    pub async fn run_sync(&self) -> Result<SyncRunSummary, SyncError> {
        let _guard = self.run_lock.lock().await;

        let settings = match self.settings.load().await {
            Ok(settings) => settings,
            Err(e) => {
                let err = SyncError::from(e);
                self.record_fatal(&err).await;
                return Err(err);
            }
        };

        if !settings.enable_sync {
            // Refusal, not a failure: logged, but the run snapshot is
            // left untouched
            let err = SyncError::SyncDisabled;
            warn!("Sync run refused: sync is disabled");
            self.log.log_sync_end(false, &err.to_string()).await;
            return Err(err);
        }
        if !settings.is_complete() {
            let err = SyncError::ConfigurationIncomplete;
            self.record_fatal(&err).await;
            return Err(err);
        }

        self.log.log_sync_start().await;
        info!("Starting storefront sync run");

        let client = match self.factory.build(&settings) {
            Ok(client) => client,
            Err(e) => {
                let err = SyncError::from(e);
                self.record_fatal(&err).await;
                return Err(err);
            }
        };

        let orders = match client.fetch_orders(&SUPPORTED_STATUSES).await {
            Ok(orders) => orders,
            Err(e) => {
                let err = SyncError::from(e);
                self.record_fatal(&err).await;
                return Err(err);
            }
        };
        info!(count = orders.len(), "Fetched storefront orders");

        let mut summary = SyncRunSummary::default();
        for order in &orders {
            let outcome = self.reconciler.reconcile(order, &settings).await;
            if outcome.kind == OutcomeKind::Failed {
                warn!(
                    order_id = order.id,
                    detail = outcome.detail.as_deref().unwrap_or(""),
                    "Order sync failed"
                );
            }
            summary.record(outcome.kind);
        }

        summary.last_sync = shared::util::now_millis();
        summary.compute_status();

        if let Err(e) = self.sync_state.store(SyncState::from(&summary)).await {
            error!(error = %e, "Failed to persist sync state snapshot");
        }

        let message = format!(
            "Sync run finished: {} created, {} updated, {} skipped, {} failed",
            summary.created, summary.updated, summary.skipped, summary.failed
        );
        self.log
            .log_sync_end(summary.status != SyncRunStatus::Failed, &message)
            .await;
        info!(status = %summary.status, "{message}");

        Ok(summary)
    }

    /// Latest persisted run snapshot.
    pub async fn status(&self) -> Result<SyncState, SyncError> {
        self.sync_state.load().await.map_err(SyncError::from)
    }

    async fn record_fatal(&self, err: &SyncError) {
        error!(error = %err, "Sync run aborted");
        self.log.log_sync_end(false, &err.to_string()).await;
        if let Err(e) = self.sync_state.mark_failed(&err.to_string()).await {
            error!(error = %e, "Failed to record sync failure state");
        }
    }
}
