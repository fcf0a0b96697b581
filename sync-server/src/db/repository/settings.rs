//! Storefront Settings Repository
//!
//! One persisted settings record (`settings:storefront`) configures the
//! storefront connection and the sync schedule. Managed through the config
//! API only; the coordinator reads it at the start of every run.

use super::{BaseRepository, RepoResult};
use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const SETTINGS_TABLE: &str = "settings";
const SETTINGS_ID: &str = "storefront";

/// Persisted storefront connection and sync settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontSettings {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub consumer_key: String,
    #[serde(default)]
    pub consumer_secret: String,
    #[serde(default)]
    pub enable_sync: bool,
    /// Daily | Weekly | Monthly — consumed by the external scheduler
    #[serde(default = "default_interval")]
    pub sync_interval: String,
    /// Account name placed on generated tax rows
    #[serde(default = "default_tax_account")]
    pub default_tax_account: String,
}

fn default_interval() -> String {
    "Daily".into()
}

fn default_tax_account() -> String {
    "Sales Tax Payable".into()
}

impl Default for StorefrontSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            consumer_key: String::new(),
            consumer_secret: String::new(),
            enable_sync: false,
            sync_interval: default_interval(),
            default_tax_account: default_tax_account(),
        }
    }
}

impl StorefrontSettings {
    /// The three credentials a run cannot start without.
    pub fn is_complete(&self) -> bool {
        !self.url.is_empty() && !self.consumer_key.is_empty() && !self.consumer_secret.is_empty()
    }
}

/// Partial update payload for the config API. Only present fields overwrite.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub url: Option<String>,
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    pub enable_sync: Option<bool>,
    pub sync_interval: Option<String>,
    pub default_tax_account: Option<String>,
}

#[derive(Clone)]
pub struct SettingsRepository {
    base: BaseRepository,
}

impl SettingsRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Load the settings record, falling back to defaults when none exists.
    pub async fn load(&self) -> RepoResult<StorefrontSettings> {
        let settings: Option<StorefrontSettings> =
            self.base.db().select((SETTINGS_TABLE, SETTINGS_ID)).await?;
        Ok(settings.unwrap_or_default())
    }

    /// Create the default settings record if it is missing.
    pub async fn ensure_exists(&self) -> RepoResult<()> {
        let existing: Option<StorefrontSettings> =
            self.base.db().select((SETTINGS_TABLE, SETTINGS_ID)).await?;
        if existing.is_none() {
            let _: Option<StorefrontSettings> = self
                .base
                .db()
                .upsert((SETTINGS_TABLE, SETTINGS_ID))
                .content(StorefrontSettings::default())
                .await?;
        }
        Ok(())
    }

    /// Apply a partial update and return the stored result.
    pub async fn update(&self, update: SettingsUpdate) -> RepoResult<StorefrontSettings> {
        let mut settings = self.load().await?;

        if let Some(url) = update.url {
            settings.url = url;
        }
        if let Some(key) = update.consumer_key {
            settings.consumer_key = key;
        }
        if let Some(secret) = update.consumer_secret {
            settings.consumer_secret = secret;
        }
        if let Some(enable) = update.enable_sync {
            settings.enable_sync = enable;
        }
        if let Some(interval) = update.sync_interval {
            settings.sync_interval = capitalize(&interval);
        }
        if let Some(account) = update.default_tax_account {
            settings.default_tax_account = account;
        }

        let stored: Option<StorefrontSettings> = self
            .base
            .db()
            .upsert((SETTINGS_TABLE, SETTINGS_ID))
            .content(settings.clone())
            .await?;
        Ok(stored.unwrap_or(settings))
    }
}

/// "daily" -> "Daily", matching the stored interval vocabulary.
fn capitalize(value: &str) -> String {
    let mut chars = value.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
