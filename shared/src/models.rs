//! Back-office model enums and sync aggregates

use serde::{Deserialize, Serialize};

// ============================================================================
// Back-office order status
// ============================================================================

/// Sales order status in the back office.
///
/// Serialized as the human-facing status strings so the stored records read
/// the same way the back office displays them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErpOrderStatus {
    #[serde(rename = "Draft")]
    Draft,
    #[serde(rename = "To Deliver and Bill")]
    ToDeliverAndBill,
    #[serde(rename = "On Hold")]
    OnHold,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Cancelled")]
    Cancelled,
    #[serde(rename = "Closed")]
    Closed,
}

impl ErpOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErpOrderStatus::Draft => "Draft",
            ErpOrderStatus::ToDeliverAndBill => "To Deliver and Bill",
            ErpOrderStatus::OnHold => "On Hold",
            ErpOrderStatus::Completed => "Completed",
            ErpOrderStatus::Cancelled => "Cancelled",
            ErpOrderStatus::Closed => "Closed",
        }
    }

    /// Whether a newly created order in this status should be submitted
    /// straight away. Drafts stay drafts; cancelled orders are never
    /// submitted just to be locked.
    pub fn implies_submission(&self) -> bool {
        !matches!(self, ErpOrderStatus::Draft | ErpOrderStatus::Cancelled)
    }
}

impl std::fmt::Display for ErpOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Per-order reconciliation outcome
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Created,
    Updated,
    Skipped,
    Failed,
}

/// Result of reconciling one storefront order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderOutcome {
    pub order_id: i64,
    pub kind: OutcomeKind,
    /// Human-readable reason, mainly for skipped/failed outcomes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl OrderOutcome {
    pub fn created(order_id: i64, detail: impl Into<String>) -> Self {
        Self {
            order_id,
            kind: OutcomeKind::Created,
            detail: Some(detail.into()),
        }
    }

    pub fn updated(order_id: i64, detail: impl Into<String>) -> Self {
        Self {
            order_id,
            kind: OutcomeKind::Updated,
            detail: Some(detail.into()),
        }
    }

    pub fn skipped(order_id: i64, detail: impl Into<String>) -> Self {
        Self {
            order_id,
            kind: OutcomeKind::Skipped,
            detail: Some(detail.into()),
        }
    }

    pub fn failed(order_id: i64, detail: impl Into<String>) -> Self {
        Self {
            order_id,
            kind: OutcomeKind::Failed,
            detail: Some(detail.into()),
        }
    }
}

// ============================================================================
// Sync run summary
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SyncRunStatus {
    Success,
    #[serde(rename = "Partial Success")]
    PartialSuccess,
    Failed,
}

impl std::fmt::Display for SyncRunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncRunStatus::Success => f.write_str("Success"),
            SyncRunStatus::PartialSuccess => f.write_str("Partial Success"),
            SyncRunStatus::Failed => f.write_str("Failed"),
        }
    }
}

/// Aggregate outcome of one sync run, persisted as the latest snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRunSummary {
    pub created: u32,
    pub updated: u32,
    pub skipped: u32,
    pub failed: u32,
    /// Unix millis of run completion
    pub last_sync: i64,
    pub status: SyncRunStatus,
}

impl SyncRunSummary {
    pub fn record(&mut self, kind: OutcomeKind) {
        match kind {
            OutcomeKind::Created => self.created += 1,
            OutcomeKind::Updated => self.updated += 1,
            OutcomeKind::Skipped => self.skipped += 1,
            OutcomeKind::Failed => self.failed += 1,
        }
    }

    pub fn succeeded(&self) -> u32 {
        self.created + self.updated + self.skipped
    }

    /// Overall status: all good = Success, mixed = Partial Success,
    /// nothing but failures = Failed. An empty run is a Success.
    pub fn compute_status(&mut self) {
        self.status = if self.failed == 0 {
            SyncRunStatus::Success
        } else if self.succeeded() > 0 {
            SyncRunStatus::PartialSuccess
        } else {
            SyncRunStatus::Failed
        };
    }
}

impl Default for SyncRunSummary {
    fn default() -> Self {
        Self {
            created: 0,
            updated: 0,
            skipped: 0,
            failed: 0,
            last_sync: 0,
            status: SyncRunStatus::Success,
        }
    }
}

// ============================================================================
// Log record types (sink entity)
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogType {
    Sync,
    Order,
    Customer,
    Item,
    Invoice,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogStatus {
    Success,
    Failed,
    Info,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_display_strings() {
        let json = serde_json::to_string(&ErpOrderStatus::ToDeliverAndBill).unwrap();
        assert_eq!(json, "\"To Deliver and Bill\"");
        let back: ErpOrderStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ErpOrderStatus::ToDeliverAndBill);
    }

    #[test]
    fn summary_status_rules() {
        let mut all_good = SyncRunSummary::default();
        all_good.record(OutcomeKind::Created);
        all_good.record(OutcomeKind::Skipped);
        all_good.compute_status();
        assert_eq!(all_good.status, SyncRunStatus::Success);

        let mut mixed = SyncRunSummary::default();
        mixed.record(OutcomeKind::Created);
        mixed.record(OutcomeKind::Failed);
        mixed.compute_status();
        assert_eq!(mixed.status, SyncRunStatus::PartialSuccess);

        let mut all_bad = SyncRunSummary::default();
        all_bad.record(OutcomeKind::Failed);
        all_bad.compute_status();
        assert_eq!(all_bad.status, SyncRunStatus::Failed);

        let mut empty = SyncRunSummary::default();
        empty.compute_status();
        assert_eq!(empty.status, SyncRunStatus::Success);
    }
}
