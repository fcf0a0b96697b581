//! Order Reconciler
//!
//! Drives one storefront order to a per-order outcome: validate, match
//! against the local ledger by storefront order id, then either create a
//! sales order (draft first, submit when the status calls for it) or apply
//! a status transition under the monotonicity rules. Every failure is
//! contained here; reconcile never propagates an error to the run loop.

use shared::models::{ErpOrderStatus, OrderOutcome, OutcomeKind};
use shared::order::{OrderPayload, TaxLine};

use crate::db::repository::sales_order::{
    SalesOrder, SalesOrderCreate, SalesOrderItem, SalesOrderTax,
};
use crate::db::repository::settings::StorefrontSettings;
use crate::db::repository::{RepoError, SalesOrderRepository};
use crate::sync_log::SyncLogService;

use super::resolver::EntityResolver;
use super::status::{is_transition_allowed, map_status};
use super::SyncError;

/// Order-level metadata key carrying the buyer's store location choice
const STORE_LOCATION_META_KEY: &str = "_selected_store_location";

const TAX_CHARGE_TYPE: &str = "On Net Total";

/// Status update attempts before giving an order up as failed
const UPDATE_ATTEMPTS: u32 = 3;

pub struct OrderReconciler {
    sales_orders: SalesOrderRepository,
    resolver: EntityResolver,
    log: SyncLogService,
}

impl OrderReconciler {
    pub fn new(
        sales_orders: SalesOrderRepository,
        resolver: EntityResolver,
        log: SyncLogService,
    ) -> Self {
        Self {
            sales_orders,
            resolver,
            log,
        }
    }

    /// Reconcile one order. Always returns an outcome; failures are logged
    /// with their cause and reported as `Failed`, never raised.
    pub async fn reconcile(
        &self,
        payload: &OrderPayload,
        settings: &StorefrontSettings,
    ) -> OrderOutcome {
        match self.apply(payload, settings).await {
            Ok(outcome) => {
                if matches!(outcome.kind, OutcomeKind::Created | OutcomeKind::Updated) {
                    self.log
                        .log_order(payload.id, true, outcome.detail.clone(), None)
                        .await;
                }
                outcome
            }
            Err(e) => {
                let reason = e.to_string();
                self.log
                    .log_order(payload.id, false, None, Some(&reason))
                    .await;
                OrderOutcome::failed(payload.id, reason)
            }
        }
    }

    async fn apply(
        &self,
        payload: &OrderPayload,
        settings: &StorefrontSettings,
    ) -> Result<OrderOutcome, SyncError> {
        let target = Self::validate(payload)?;
        let order_key = payload.id.to_string();

        match self.sales_orders.find_by_storefront_id(&order_key).await? {
            Some(existing) => self.apply_update(payload, existing, target).await,
            None => self.apply_create(payload, settings, target).await,
        }
    }

    /// Reject orders the engine cannot represent before touching any state.
    fn validate(payload: &OrderPayload) -> Result<ErpOrderStatus, SyncError> {
        if payload.id <= 0 {
            return Err(SyncError::ValidationFailed(
                "order is missing a storefront id".into(),
            ));
        }
        let target = map_status(&payload.status)?;
        if payload.line_items.is_empty() {
            return Err(SyncError::ValidationFailed(format!(
                "order {} has no line items",
                payload.id
            )));
        }
        if payload.billing.email.trim().is_empty() {
            return Err(SyncError::ValidationFailed(format!(
                "order {} has no billing email",
                payload.id
            )));
        }
        for line in &payload.line_items {
            if line.quantity <= 0.0 {
                return Err(SyncError::ValidationFailed(format!(
                    "order {}: line '{}' has non-positive quantity",
                    payload.id, line.name
                )));
            }
            if line.price < 0.0 {
                return Err(SyncError::ValidationFailed(format!(
                    "order {}: line '{}' has negative price",
                    payload.id, line.name
                )));
            }
        }
        Ok(target)
    }

    async fn apply_create(
        &self,
        payload: &OrderPayload,
        settings: &StorefrontSettings,
        target: ErpOrderStatus,
    ) -> Result<OrderOutcome, SyncError> {
        let customer = self.resolver.resolve_customer(payload).await?;

        let mut items = Vec::with_capacity(payload.line_items.len());
        for line in &payload.line_items {
            let item = self.resolver.resolve_item(line).await?;
            items.push(SalesOrderItem {
                item: item.id,
                item_code: item.code,
                qty: line.quantity,
                rate: line.price,
                amount: line.quantity * line.price,
            });
        }

        let taxes = payload
            .tax_lines
            .iter()
            .map(|t| tax_row(t, &settings.default_tax_account))
            .collect();

        let now = shared::util::now_millis();
        let draft = self
            .sales_orders
            .create_draft(SalesOrderCreate {
                storefront_order_id: payload.id.to_string(),
                customer: customer.id,
                status: ErpOrderStatus::Draft,
                submitted: false,
                items,
                taxes,
                currency: payload.currency.clone(),
                store_location: store_location(payload).unwrap_or_default(),
                created_at: now,
                updated_at: now,
            })
            .await?;

        // create_draft can hand back a record another run just inserted;
        // route that through the normal transition rules instead
        if draft.submitted || draft.status != ErpOrderStatus::Draft {
            return self.apply_update(payload, draft, target).await;
        }

        let reference = draft.id.to_string();
        if target.implies_submission() {
            self.sales_orders.submit(&draft.id, target).await?;
        } else if target != ErpOrderStatus::Draft {
            self.sales_orders.update_status(&draft.id, target).await?;
        }

        Ok(OrderOutcome::created(payload.id, reference))
    }

    async fn apply_update(
        &self,
        payload: &OrderPayload,
        existing: SalesOrder,
        target: ErpOrderStatus,
    ) -> Result<OrderOutcome, SyncError> {
        // Store location selection can still change while the record is a
        // draft; refresh it regardless of the status decision
        if !existing.submitted
            && let Some(location) = store_location(payload)
            && location != existing.store_location
        {
            self.sales_orders
                .update_store_location(&existing.id, &location)
                .await?;
        }

        if existing.status == target {
            return Ok(OrderOutcome::skipped(
                payload.id,
                format!("status already {target}"),
            ));
        }

        if !is_transition_allowed(existing.status, target, existing.submitted) {
            return Ok(OrderOutcome::skipped(
                payload.id,
                format!(
                    "transition {} -> {} not allowed after submission",
                    existing.status, target
                ),
            ));
        }

        self.transition(&existing, target).await?;
        Ok(OrderOutcome::updated(
            payload.id,
            format!("{} -> {}", existing.status, target),
        ))
    }

    /// Apply the transition, retrying transient storage errors. Each retry
    /// re-reads the record first: a competing run may have submitted it (or
    /// already applied the target) between attempts, and the submit-vs-update
    /// choice must reflect the current record, not the snapshot.
    async fn transition(
        &self,
        existing: &SalesOrder,
        target: ErpOrderStatus,
    ) -> Result<(), SyncError> {
        let mut submitted = existing.submitted;
        let mut last_err = None;
        for attempt in 0..UPDATE_ATTEMPTS {
            if attempt > 0
                && let Some(latest) = self.sales_orders.find_by_id(&existing.id).await?
            {
                if latest.status == target {
                    return Ok(());
                }
                submitted = latest.submitted;
            }
            let result = if !submitted && target.implies_submission() {
                self.sales_orders.submit(&existing.id, target).await
            } else {
                self.sales_orders.update_status(&existing.id, target).await
            };
            match result {
                Ok(_) => return Ok(()),
                Err(e @ RepoError::Database(_)) => last_err = Some(e),
                Err(e) => return Err(e.into()),
            }
        }
        match last_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

fn tax_row(line: &TaxLine, account: &str) -> SalesOrderTax {
    SalesOrderTax {
        charge_type: TAX_CHARGE_TYPE.into(),
        account_head: account.into(),
        rate: line.rate_percent,
        description: if line.label.is_empty() {
            account.to_string()
        } else {
            line.label.clone()
        },
    }
}

/// The buyer's store location choice, if the order carries one.
fn store_location(payload: &OrderPayload) -> Option<String> {
    payload
        .meta_data
        .iter()
        .find(|m| m.key == STORE_LOCATION_META_KEY)
        .and_then(|m| m.value_str())
        .map(str::to_string)
}
