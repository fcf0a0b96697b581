//! Storefront order payload types
//!
//! Wire types for orders fetched from the storefront REST API. Deserialization
//! is deliberately lenient: unknown fields are ignored and the order status is
//! kept as a raw string so a single unrecognized order cannot fail a whole
//! fetch. Per-order validation happens in the reconciler.

use serde::{Deserialize, Serialize};

/// The seven order statuses the sync fetches and understands.
pub const SUPPORTED_STATUSES: [&str; 7] = [
    "pending",
    "processing",
    "on-hold",
    "completed",
    "cancelled",
    "refunded",
    "failed",
];

/// An order as returned by the storefront orders endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPayload {
    /// Storefront order id — the correlation key for idempotent matching
    #[serde(default)]
    pub id: i64,
    /// Raw status string, validated by the status mapper
    #[serde(default)]
    pub status: String,
    /// Storefront customer id, 0 or absent for guest checkout
    #[serde(default)]
    pub customer_id: Option<i64>,
    #[serde(default)]
    pub billing: BillingInfo,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub tax_lines: Vec<TaxLine>,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub total: String,
    /// Order-level metadata (store location selection lives here)
    #[serde(default)]
    pub meta_data: Vec<MetaEntry>,
}

impl OrderPayload {
    /// Storefront customer id as a correlation key, if one is present.
    ///
    /// Guest checkouts come through with `customer_id: 0`, which carries no
    /// identity and is treated as absent.
    pub fn external_customer_id(&self) -> Option<String> {
        match self.customer_id {
            Some(id) if id > 0 => Some(id.to_string()),
            _ => None,
        }
    }
}

/// Billing contact block on a storefront order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingInfo {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address_1: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub country: String,
}

impl BillingInfo {
    /// Display name for customer creation: first/last name joined, falling
    /// back to the email local part when both are empty.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
        self.email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_string()
    }
}

/// One ordered line on a storefront order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub total: String,
    /// Direct SKU field — first stop in SKU resolution
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Free-form metadata; may carry a SKU under a `sku` key or inside a
    /// vendor add-on block
    #[serde(default)]
    pub meta_data: Vec<MetaEntry>,
}

/// A tax row on a storefront order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxLine {
    #[serde(default)]
    pub rate_percent: f64,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub tax_total: String,
}

/// Generic key/value metadata entry attached to orders and line items.
///
/// `value` stays a raw JSON value: plain strings for simple keys, nested
/// arrays/objects for vendor add-on blocks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetaEntry {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub display_key: Option<String>,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl MetaEntry {
    pub fn new(key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            key: key.into(),
            display_key: None,
            value: value.into(),
        }
    }

    /// The entry value as a non-empty trimmed string, if it is one.
    pub fn value_str(&self) -> Option<&str> {
        self.value
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
