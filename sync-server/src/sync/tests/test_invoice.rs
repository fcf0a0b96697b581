use super::*;
use shared::models::OutcomeKind;

/// Sync one order in so an invoice has something to link to.
async fn synced_order_id(h: &Harness, storefront_id: i64) -> surrealdb::RecordId {
    let settings = h.settings.load().await.unwrap();
    let outcome = h
        .reconciler()
        .reconcile(&order(storefront_id, "processing"), &settings)
        .await;
    assert_eq!(outcome.kind, OutcomeKind::Created);
    h.sales_orders
        .find_by_storefront_id(&storefront_id.to_string())
        .await
        .unwrap()
        .unwrap()
        .id
}

#[tokio::test]
async fn pushes_completion_and_invoice_reference() {
    let h = Harness::new().await;
    h.configure().await;
    let order_id = synced_order_id(&h, 200).await;
    h.invoices
        .create_with_key("INV-0001", Some(order_id), 50.72)
        .await
        .unwrap();

    let client = StubStorefront::with_orders(vec![]);
    let propagator = h.propagator(client.clone());

    let outcome = propagator.propagate("INV-0001").await.unwrap();
    assert_eq!(outcome, PropagationOutcome::Success);

    let updates = client.updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    let (pushed_order, status, metadata) = &updates[0];
    assert_eq!(pushed_order, "200");
    assert_eq!(status, "completed");
    assert_eq!(metadata[0].key, "erp_invoice");
    assert_eq!(metadata[0].value.as_str(), Some("INV-0001"));
    drop(updates);

    let invoice = h.invoices.find_by_key("INV-0001").await.unwrap().unwrap();
    assert!(invoice.pushed_at.is_some());
}

#[tokio::test]
async fn invoice_without_sales_order_is_skipped() {
    let h = Harness::new().await;
    h.configure().await;
    h.invoices
        .create_with_key("INV-0002", None, 10.0)
        .await
        .unwrap();

    let client = StubStorefront::with_orders(vec![]);
    let propagator = h.propagator(client.clone());

    let outcome = propagator.propagate("INV-0002").await.unwrap();
    assert!(matches!(outcome, PropagationOutcome::Skipped(_)));
    assert!(client.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn already_pushed_invoice_is_not_pushed_again() {
    let h = Harness::new().await;
    h.configure().await;
    let order_id = synced_order_id(&h, 201).await;
    let invoice = h
        .invoices
        .create_with_key("INV-0003", Some(order_id), 50.72)
        .await
        .unwrap();
    h.invoices.mark_pushed(&invoice.id).await.unwrap();

    let client = StubStorefront::with_orders(vec![]);
    let propagator = h.propagator(client.clone());

    let outcome = propagator.propagate("INV-0003").await.unwrap();
    assert!(matches!(outcome, PropagationOutcome::Skipped(_)));
    assert!(client.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn push_failure_is_reported_not_raised() {
    let h = Harness::new().await;
    h.configure().await;
    let order_id = synced_order_id(&h, 202).await;
    h.invoices
        .create_with_key("INV-0004", Some(order_id), 50.72)
        .await
        .unwrap();

    let client = Arc::new(StubStorefront {
        fail_update: true,
        ..Default::default()
    });
    let propagator = h.propagator(client);

    let outcome = propagator.propagate("INV-0004").await.unwrap();
    assert!(matches!(outcome, PropagationOutcome::Failed(_)));

    // The invoice stays unmarked so the push can be retried
    let invoice = h.invoices.find_by_key("INV-0004").await.unwrap().unwrap();
    assert!(invoice.pushed_at.is_none());
}

#[tokio::test]
async fn status_reports_linking_and_push_state() {
    let h = Harness::new().await;
    h.configure().await;
    let order_id = synced_order_id(&h, 203).await;
    h.invoices
        .create_with_key("INV-0005", Some(order_id), 50.72)
        .await
        .unwrap();
    h.invoices.create_with_key("INV-0006", None, 5.0).await.unwrap();

    let client = StubStorefront::with_orders(vec![]);
    let propagator = h.propagator(client);

    let linked = propagator.status("INV-0005").await.unwrap();
    assert!(linked.linked);
    assert_eq!(linked.storefront_order_id.as_deref(), Some("203"));
    assert!(linked.pushed_at.is_none());

    propagator.propagate("INV-0005").await.unwrap();
    let pushed = propagator.status("INV-0005").await.unwrap();
    assert!(pushed.pushed_at.is_some());

    let unlinked = propagator.status("INV-0006").await.unwrap();
    assert!(!unlinked.linked);
    assert_eq!(unlinked.storefront_order_id, None);
}

#[tokio::test]
async fn missing_invoice_is_an_error() {
    let h = Harness::new().await;
    h.configure().await;
    let propagator = h.propagator(StubStorefront::with_orders(vec![]));

    let result = propagator.propagate("INV-MISSING").await;
    assert!(matches!(result, Err(SyncError::PropagationFailed(_))));
}
