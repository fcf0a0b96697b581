use super::*;
use shared::models::{ErpOrderStatus, OutcomeKind};
use shared::order::MetaEntry;

#[tokio::test]
async fn creates_sales_order_with_resolved_entities() {
    let h = Harness::new().await;
    let settings = h.configure().await;
    let reconciler = h.reconciler();

    let outcome = reconciler.reconcile(&order(100, "processing"), &settings).await;
    assert_eq!(outcome.kind, OutcomeKind::Created);

    let stored = h
        .sales_orders
        .find_by_storefront_id("100")
        .await
        .unwrap()
        .expect("sales order persisted");
    assert_eq!(stored.status, ErpOrderStatus::ToDeliverAndBill);
    assert!(stored.submitted);
    assert_eq!(stored.items.len(), 1);
    assert_eq!(stored.items[0].item_code, "BEAN-1KG");
    assert_eq!(stored.items[0].amount, 48.30);
    assert_eq!(stored.taxes[0].charge_type, "On Net Total");
    assert_eq!(stored.taxes[0].account_head, "Sales Tax Payable");

    let customer = h
        .customers
        .find_by_email("buyer100@example.com")
        .await
        .unwrap()
        .expect("customer created");
    assert_eq!(customer.storefront_customer_id.as_deref(), Some("1100"));

    let item = h.items.find_by_code("BEAN-1KG").await.unwrap();
    assert!(item.is_some());
}

#[tokio::test]
async fn pending_order_stays_an_unsubmitted_draft() {
    let h = Harness::new().await;
    let settings = h.configure().await;

    let outcome = h.reconciler().reconcile(&order(101, "pending"), &settings).await;
    assert_eq!(outcome.kind, OutcomeKind::Created);

    let stored = h
        .sales_orders
        .find_by_storefront_id("101")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ErpOrderStatus::Draft);
    assert!(!stored.submitted);
}

#[tokio::test]
async fn resync_of_unchanged_order_is_a_skip_not_a_duplicate() {
    let h = Harness::new().await;
    let settings = h.configure().await;
    let reconciler = h.reconciler();
    let payload = order(102, "processing");

    let first = reconciler.reconcile(&payload, &settings).await;
    assert_eq!(first.kind, OutcomeKind::Created);

    let second = reconciler.reconcile(&payload, &settings).await;
    assert_eq!(second.kind, OutcomeKind::Skipped);

    assert_eq!(h.sales_orders.count().await.unwrap(), 1);
}

#[tokio::test]
async fn forward_transition_updates_the_submitted_order() {
    let h = Harness::new().await;
    let settings = h.configure().await;
    let reconciler = h.reconciler();

    reconciler.reconcile(&order(103, "processing"), &settings).await;

    let outcome = reconciler.reconcile(&order(103, "completed"), &settings).await;
    assert_eq!(outcome.kind, OutcomeKind::Updated);

    let stored = h
        .sales_orders
        .find_by_storefront_id("103")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ErpOrderStatus::Completed);
    assert!(stored.submitted);
}

#[tokio::test]
async fn backward_transition_on_submitted_order_is_skipped() {
    let h = Harness::new().await;
    let settings = h.configure().await;
    let reconciler = h.reconciler();

    reconciler.reconcile(&order(104, "completed"), &settings).await;

    let outcome = reconciler.reconcile(&order(104, "processing"), &settings).await;
    assert_eq!(outcome.kind, OutcomeKind::Skipped);

    let stored = h
        .sales_orders
        .find_by_storefront_id("104")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ErpOrderStatus::Completed);
}

#[tokio::test]
async fn cancelled_submitted_order_is_terminal() {
    let h = Harness::new().await;
    let settings = h.configure().await;
    let reconciler = h.reconciler();

    reconciler.reconcile(&order(105, "processing"), &settings).await;
    reconciler.reconcile(&order(105, "cancelled"), &settings).await;

    let outcome = reconciler.reconcile(&order(105, "completed"), &settings).await;
    assert_eq!(outcome.kind, OutcomeKind::Skipped);

    let stored = h
        .sales_orders
        .find_by_storefront_id("105")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ErpOrderStatus::Cancelled);
}

#[tokio::test]
async fn draft_accepts_any_transition_and_submits_when_due() {
    let h = Harness::new().await;
    let settings = h.configure().await;
    let reconciler = h.reconciler();

    reconciler.reconcile(&order(106, "pending"), &settings).await;

    let outcome = reconciler.reconcile(&order(106, "on-hold"), &settings).await;
    assert_eq!(outcome.kind, OutcomeKind::Updated);

    let stored = h
        .sales_orders
        .find_by_storefront_id("106")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ErpOrderStatus::OnHold);
    assert!(stored.submitted);
}

#[tokio::test]
async fn draft_cancelled_stays_unsubmitted() {
    let h = Harness::new().await;
    let settings = h.configure().await;
    let reconciler = h.reconciler();

    reconciler.reconcile(&order(116, "pending"), &settings).await;
    let outcome = reconciler.reconcile(&order(116, "cancelled"), &settings).await;
    assert_eq!(outcome.kind, OutcomeKind::Updated);

    let stored = h
        .sales_orders
        .find_by_storefront_id("116")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ErpOrderStatus::Cancelled);
    assert!(!stored.submitted);
}

#[tokio::test]
async fn transition_follows_an_out_of_band_submission() {
    let h = Harness::new().await;
    let settings = h.configure().await;
    let reconciler = h.reconciler();

    reconciler.reconcile(&order(117, "pending"), &settings).await;
    let draft = h
        .sales_orders
        .find_by_storefront_id("117")
        .await
        .unwrap()
        .unwrap();

    // A competing run submits the record out of band
    h.sales_orders
        .submit(&draft.id, ErpOrderStatus::ToDeliverAndBill)
        .await
        .unwrap();

    let outcome = reconciler.reconcile(&order(117, "completed"), &settings).await;
    assert_eq!(outcome.kind, OutcomeKind::Updated);

    let stored = h
        .sales_orders
        .find_by_storefront_id("117")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ErpOrderStatus::Completed);
    assert!(stored.submitted);
}

#[tokio::test]
async fn invalid_orders_fail_without_writing() {
    let h = Harness::new().await;
    let settings = h.configure().await;
    let reconciler = h.reconciler();

    let mut no_lines = order(107, "processing");
    no_lines.line_items.clear();
    assert_eq!(
        reconciler.reconcile(&no_lines, &settings).await.kind,
        OutcomeKind::Failed
    );

    let mut no_email = order(108, "processing");
    no_email.billing.email.clear();
    assert_eq!(
        reconciler.reconcile(&no_email, &settings).await.kind,
        OutcomeKind::Failed
    );

    let mut zero_qty = order(109, "processing");
    zero_qty.line_items[0].quantity = 0.0;
    assert_eq!(
        reconciler.reconcile(&zero_qty, &settings).await.kind,
        OutcomeKind::Failed
    );

    let unknown = order(110, "trash");
    assert_eq!(
        reconciler.reconcile(&unknown, &settings).await.kind,
        OutcomeKind::Failed
    );

    assert_eq!(h.sales_orders.count().await.unwrap(), 0);
}

#[tokio::test]
async fn repeat_buyer_reuses_customer_by_email() {
    let h = Harness::new().await;
    let settings = h.configure().await;
    let reconciler = h.reconciler();

    // First order carries a storefront customer id
    reconciler.reconcile(&order(111, "processing"), &settings).await;

    // Second order: same email, guest checkout this time
    let mut repeat = order(112, "processing");
    repeat.customer_id = Some(0);
    repeat.billing.email = "buyer111@example.com".into();
    let outcome = reconciler.reconcile(&repeat, &settings).await;
    assert_eq!(outcome.kind, OutcomeKind::Created);

    let first = h
        .sales_orders
        .find_by_storefront_id("111")
        .await
        .unwrap()
        .unwrap();
    let second = h
        .sales_orders
        .find_by_storefront_id("112")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.customer, second.customer);
}

#[tokio::test]
async fn items_without_sku_get_a_deterministic_fallback_code() {
    let h = Harness::new().await;
    let settings = h.configure().await;
    let reconciler = h.reconciler();

    let mut first = order(113, "pending");
    first.line_items = vec![line("Mystery Product", None, 1.0, 10.0)];
    let mut second = order(114, "pending");
    second.line_items = vec![line("Mystery Product", None, 3.0, 10.0)];

    reconciler.reconcile(&first, &settings).await;
    reconciler.reconcile(&second, &settings).await;

    let a = h
        .sales_orders
        .find_by_storefront_id("113")
        .await
        .unwrap()
        .unwrap();
    let b = h
        .sales_orders
        .find_by_storefront_id("114")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(a.items[0].item_code, b.items[0].item_code);
    assert_eq!(a.items[0].item, b.items[0].item);
    assert!(a.items[0].item_code.starts_with("mystery-product-"));
}

#[tokio::test]
async fn store_location_is_captured_and_refreshed_while_draft() {
    let h = Harness::new().await;
    let settings = h.configure().await;
    let reconciler = h.reconciler();

    let mut payload = order(115, "pending");
    payload
        .meta_data
        .push(MetaEntry::new("_selected_store_location", "Montreal"));
    reconciler.reconcile(&payload, &settings).await;

    let stored = h
        .sales_orders
        .find_by_storefront_id("115")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.store_location, "Montreal");

    // Buyer changes the pickup location while the order is still a draft
    payload.meta_data[0] = MetaEntry::new("_selected_store_location", "Laval");
    let outcome = reconciler.reconcile(&payload, &settings).await;
    assert_eq!(outcome.kind, OutcomeKind::Skipped);

    let stored = h
        .sales_orders
        .find_by_storefront_id("115")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.store_location, "Laval");
}
