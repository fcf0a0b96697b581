use super::*;
use crate::sync_log::SyncLogQuery;
use shared::models::{LogStatus, LogType, SyncRunStatus};

/// Sync-type Failed entries currently in the log sink.
async fn failed_sync_log_count(h: &Harness) -> u64 {
    let (_, total) = h
        .log
        .query(&SyncLogQuery {
            log_type: Some(LogType::Sync),
            status: Some(LogStatus::Failed),
            ..Default::default()
        })
        .await
        .unwrap();
    total
}

#[tokio::test]
async fn run_is_rejected_while_sync_is_disabled() {
    let h = Harness::new().await;
    // Settings exist but enable_sync stays false
    let coordinator = h.coordinator(StubStorefront::with_orders(vec![order(1, "processing")]));

    let result = coordinator.run_sync().await;
    assert!(matches!(result, Err(SyncError::SyncDisabled)));
    assert_eq!(h.sales_orders.count().await.unwrap(), 0);

    // The refusal is recorded in the log sink but the run snapshot is
    // left untouched
    assert_eq!(failed_sync_log_count(&h).await, 1);
    let state = h.sync_state.load().await.unwrap();
    assert_eq!(state.last_sync, 0);
    assert_eq!(state.sync_status, "");
}

#[tokio::test]
async fn client_build_failure_is_recorded_as_a_failed_run() {
    let h = Harness::new().await;
    h.configure().await;
    let coordinator = SyncCoordinator::new(
        h.settings.clone(),
        h.sync_state.clone(),
        Arc::new(FailingFactory),
        h.reconciler(),
        h.log.clone(),
    );

    let result = coordinator.run_sync().await;
    assert!(matches!(result, Err(SyncError::FetchFailed(_))));
    assert_eq!(h.sales_orders.count().await.unwrap(), 0);

    assert!(failed_sync_log_count(&h).await >= 1);
    let state = h.sync_state.load().await.unwrap();
    assert!(state.sync_status.starts_with("Failed:"));
}

#[tokio::test]
async fn incomplete_configuration_aborts_before_fetching() {
    let h = Harness::new().await;
    h.settings
        .update(crate::db::repository::settings::SettingsUpdate {
            enable_sync: Some(true),
            url: Some("https://shop.example.com".into()),
            // No credentials
            ..Default::default()
        })
        .await
        .unwrap();
    let coordinator = h.coordinator(StubStorefront::with_orders(vec![order(1, "processing")]));

    let result = coordinator.run_sync().await;
    assert!(matches!(result, Err(SyncError::ConfigurationIncomplete)));
    assert_eq!(h.sales_orders.count().await.unwrap(), 0);

    let state = h.sync_state.load().await.unwrap();
    assert!(state.sync_status.starts_with("Failed:"));
    assert_eq!(state.last_sync, 0);
}

#[tokio::test]
async fn fetch_failure_is_run_fatal_and_leaves_no_writes() {
    let h = Harness::new().await;
    h.configure().await;
    let coordinator = h.coordinator(StubStorefront::failing_fetch());

    let result = coordinator.run_sync().await;
    assert!(matches!(result, Err(SyncError::FetchFailed(_))));
    assert_eq!(h.sales_orders.count().await.unwrap(), 0);

    let state = h.sync_state.load().await.unwrap();
    assert!(state.sync_status.starts_with("Failed:"));
}

#[tokio::test]
async fn successful_run_persists_the_summary_snapshot() {
    let h = Harness::new().await;
    h.configure().await;
    let coordinator = h.coordinator(StubStorefront::with_orders(vec![
        order(1, "processing"),
        order(2, "pending"),
    ]));

    let summary = coordinator.run_sync().await.unwrap();
    assert_eq!(summary.created, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.status, SyncRunStatus::Success);
    assert!(summary.last_sync > 0);

    let state = h.sync_state.load().await.unwrap();
    assert_eq!(state.created, 2);
    assert_eq!(state.sync_status, "Success");
    assert_eq!(state.last_sync, summary.last_sync);

    assert_eq!(h.sales_orders.count().await.unwrap(), 2);
}

#[tokio::test]
async fn one_bad_order_does_not_sink_the_run() {
    let h = Harness::new().await;
    h.configure().await;

    let mut bad = order(5, "processing");
    bad.line_items.clear();
    let coordinator = h.coordinator(StubStorefront::with_orders(vec![
        order(1, "processing"),
        order(2, "processing"),
        order(3, "pending"),
        order(4, "completed"),
        bad,
    ]));

    let summary = coordinator.run_sync().await.unwrap();
    assert_eq!(summary.created, 4);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.status, SyncRunStatus::PartialSuccess);

    let state = h.sync_state.load().await.unwrap();
    assert_eq!(state.sync_status, "Partial Success");
    assert_eq!(h.sales_orders.count().await.unwrap(), 4);
}

#[tokio::test]
async fn run_of_only_failures_is_reported_failed() {
    let h = Harness::new().await;
    h.configure().await;

    let mut bad = order(9, "processing");
    bad.billing.email.clear();
    bad.customer_id = None;
    let coordinator = h.coordinator(StubStorefront::with_orders(vec![bad]));

    let summary = coordinator.run_sync().await.unwrap();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.status, SyncRunStatus::Failed);
}

#[tokio::test]
async fn empty_fetch_is_a_successful_run() {
    let h = Harness::new().await;
    h.configure().await;
    let coordinator = h.coordinator(StubStorefront::with_orders(vec![]));

    let summary = coordinator.run_sync().await.unwrap();
    assert_eq!(summary.status, SyncRunStatus::Success);
    assert_eq!(summary.created + summary.updated + summary.skipped + summary.failed, 0);
}

#[tokio::test]
async fn second_run_over_same_orders_only_skips() {
    let h = Harness::new().await;
    h.configure().await;
    let client = StubStorefront::with_orders(vec![order(1, "processing"), order(2, "pending")]);
    let coordinator = h.coordinator(client);

    let first = coordinator.run_sync().await.unwrap();
    assert_eq!(first.created, 2);

    let second = coordinator.run_sync().await.unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.skipped, 2);
    assert_eq!(second.status, SyncRunStatus::Success);
    assert_eq!(h.sales_orders.count().await.unwrap(), 2);
}
