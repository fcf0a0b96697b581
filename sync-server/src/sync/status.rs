//! Status Mapper
//!
//! Pure mapping from storefront order statuses to back-office statuses,
//! plus the transition-legality table for submitted orders.

use shared::models::ErpOrderStatus;

use super::SyncError;

/// Map a storefront status string to its back-office status.
///
/// Total over the seven supported values; anything else is an
/// order-level validation failure, not a run failure.
pub fn map_status(external: &str) -> Result<ErpOrderStatus, SyncError> {
    match external {
        "pending" => Ok(ErpOrderStatus::Draft),
        "processing" => Ok(ErpOrderStatus::ToDeliverAndBill),
        "on-hold" => Ok(ErpOrderStatus::OnHold),
        "completed" => Ok(ErpOrderStatus::Completed),
        "cancelled" => Ok(ErpOrderStatus::Cancelled),
        "refunded" => Ok(ErpOrderStatus::Closed),
        "failed" => Ok(ErpOrderStatus::Cancelled),
        other => Err(SyncError::UnrecognizedStatus(other.to_string())),
    }
}

/// Transition table for submitted (locked-in) orders. Any pair not listed
/// here is disallowed once the record is submitted.
const SUBMITTED_TRANSITIONS: [(ErpOrderStatus, &[ErpOrderStatus]); 3] = [
    (
        ErpOrderStatus::ToDeliverAndBill,
        &[ErpOrderStatus::Completed, ErpOrderStatus::Cancelled],
    ),
    (ErpOrderStatus::Completed, &[ErpOrderStatus::Cancelled]),
    (ErpOrderStatus::Cancelled, &[]),
];

/// Whether moving `current -> target` is legal.
///
/// Drafts accept any target. Equal statuses are "allowed" — the reconciler
/// is expected to treat them as a no-op skip, not an update.
pub fn is_transition_allowed(
    current: ErpOrderStatus,
    target: ErpOrderStatus,
    submitted: bool,
) -> bool {
    if current == target {
        return true;
    }
    if !submitted {
        return true;
    }
    SUBMITTED_TRANSITIONS
        .iter()
        .find(|(from, _)| *from == current)
        .map(|(_, targets)| targets.contains(&target))
        .unwrap_or(false)
}
