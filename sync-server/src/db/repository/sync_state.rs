//! Sync State Repository
//!
//! One singleton record (`sync_state:current`) holds the latest run summary.
//! Written only by the coordinator at run end; each run overwrites the
//! previous snapshot.

use super::{BaseRepository, RepoResult};
use serde::{Deserialize, Serialize};
use shared::models::SyncRunSummary;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const SYNC_STATE_TABLE: &str = "sync_state";
const SYNC_STATE_ID: &str = "current";

/// Persisted snapshot of the latest sync run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncState {
    /// Unix millis of the last completed run, 0 = never ran
    pub last_sync: i64,
    /// "Success" | "Partial Success" | "Failed: <reason>"
    pub sync_status: String,
    pub created: u32,
    pub updated: u32,
    pub skipped: u32,
    pub failed: u32,
}

impl Default for SyncState {
    fn default() -> Self {
        Self {
            last_sync: 0,
            sync_status: String::new(),
            created: 0,
            updated: 0,
            skipped: 0,
            failed: 0,
        }
    }
}

impl From<&SyncRunSummary> for SyncState {
    fn from(summary: &SyncRunSummary) -> Self {
        Self {
            last_sync: summary.last_sync,
            sync_status: summary.status.to_string(),
            created: summary.created,
            updated: summary.updated,
            skipped: summary.skipped,
            failed: summary.failed,
        }
    }
}

#[derive(Clone)]
pub struct SyncStateRepository {
    base: BaseRepository,
}

impl SyncStateRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn load(&self) -> RepoResult<SyncState> {
        let state: Option<SyncState> = self
            .base
            .db()
            .select((SYNC_STATE_TABLE, SYNC_STATE_ID))
            .await?;
        Ok(state.unwrap_or_default())
    }

    /// Overwrite the snapshot with the given state.
    pub async fn store(&self, state: SyncState) -> RepoResult<()> {
        let _: Option<SyncState> = self
            .base
            .db()
            .upsert((SYNC_STATE_TABLE, SYNC_STATE_ID))
            .content(state)
            .await?;
        Ok(())
    }

    /// Record a failed run with its reason, without touching last_sync.
    pub async fn mark_failed(&self, reason: &str) -> RepoResult<()> {
        let mut state = self.load().await?;
        state.sync_status = format!("Failed: {reason}");
        self.store(state).await
    }
}
