//! Config API handlers

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::{AppResult, AppState};
use crate::db::repository::settings::{SettingsUpdate, StorefrontSettings};

/// Settings as exposed over HTTP. The consumer secret never leaves the
/// server; callers only learn whether one is set.
#[derive(Serialize)]
pub struct SettingsResponse {
    url: String,
    consumer_key: String,
    consumer_secret_set: bool,
    enable_sync: bool,
    sync_interval: String,
    default_tax_account: String,
}

impl From<StorefrontSettings> for SettingsResponse {
    fn from(s: StorefrontSettings) -> Self {
        Self {
            url: s.url,
            consumer_key: s.consumer_key,
            consumer_secret_set: !s.consumer_secret.is_empty(),
            enable_sync: s.enable_sync,
            sync_interval: s.sync_interval,
            default_tax_account: s.default_tax_account,
        }
    }
}

/// GET /api/config - current storefront settings
pub async fn get_settings(State(state): State<AppState>) -> AppResult<Json<SettingsResponse>> {
    let settings = state.settings.load().await?;
    Ok(Json(settings.into()))
}

/// PUT /api/config - apply a partial update, returns the stored result
pub async fn update_settings(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> AppResult<Json<SettingsResponse>> {
    let stored = state.settings.update(update).await?;
    Ok(Json(stored.into()))
}
