//! Entity Resolver
//!
//! Finds-or-creates the back-office customer and item records an order
//! references. Resolution is keyed by correlation keys (storefront customer
//! id / billing email for customers, SKU or deterministic fallback code for
//! items) and rides on the repositories' atomic find-or-create.

use shared::order::{BillingInfo, LineItem, OrderPayload};
use shared::util::{short_hash, slugify};

use crate::db::repository::customer::{Customer, CustomerCreate};
use crate::db::repository::item::{Item, ItemCreate};
use crate::db::repository::{CustomerRepository, ItemRepository};
use crate::sync_log::SyncLogService;

use super::SyncError;

const DEFAULT_CUSTOMER_GROUP: &str = "All Customer Groups";
const DEFAULT_TERRITORY: &str = "All Territories";

/// Vendor add-on metadata block that may carry a SKU
const ADDON_META_KEY: &str = "_ywapo_meta_data";

const ITEM_NAME_MAX: usize = 140;
const ITEM_DESCRIPTION_MAX: usize = 1000;
const FALLBACK_SLUG_MAX: usize = 20;

// ============================================================================
// SKU extraction strategies — fixed precedence, first non-empty match wins
// ============================================================================

type SkuExtractor = fn(&LineItem) -> Option<String>;

const SKU_EXTRACTORS: [SkuExtractor; 3] = [direct_sku, meta_sku, addon_sku];

/// (a) the line item's own SKU field
fn direct_sku(item: &LineItem) -> Option<String> {
    item.sku
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// (b) a generic metadata entry keyed `sku` (key or display key)
fn meta_sku(item: &LineItem) -> Option<String> {
    item.meta_data.iter().find_map(|meta| {
        let key_matches = meta.key.trim().eq_ignore_ascii_case("sku")
            || meta
                .display_key
                .as_deref()
                .is_some_and(|k| k.trim().eq_ignore_ascii_case("sku"));
        if key_matches {
            meta.value_str().map(str::to_string)
        } else {
            None
        }
    })
}

/// (c) the vendor add-on block: entries whose values are objects with a
/// `display_label` of `sku`; the SKU is in `addon_value`
fn addon_sku(item: &LineItem) -> Option<String> {
    let block = item.meta_data.iter().find(|m| m.key == ADDON_META_KEY)?;
    let entries = block.value.as_array()?;
    for entry in entries {
        let fields = entry.as_object()?;
        for sub in fields.values() {
            let Some(sub) = sub.as_object() else { continue };
            let label = sub
                .get("display_label")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .trim();
            if label.eq_ignore_ascii_case("sku")
                && let Some(value) = sub.get("addon_value").and_then(|v| v.as_str())
                && !value.trim().is_empty()
            {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}

/// Resolve a line item's SKU by trying each extraction strategy in order.
pub fn extract_sku(item: &LineItem) -> Option<String> {
    SKU_EXTRACTORS.iter().find_map(|extract| extract(item))
}

/// Deterministic fallback code for items without any SKU: a slug of the
/// display name plus a short content hash. Identical names always converge
/// on the same code.
pub fn fallback_item_code(name: &str) -> String {
    let mut slug = slugify(name);
    slug.truncate(FALLBACK_SLUG_MAX);
    let slug = slug.trim_end_matches('-');
    format!("{}-{}", slug, short_hash(name, 4))
}

fn truncated(value: &str, max: usize) -> String {
    let mut out = value.to_string();
    if out.len() > max {
        let mut cut = max;
        while !out.is_char_boundary(cut) {
            cut -= 1;
        }
        out.truncate(cut);
    }
    out
}

// ============================================================================
// Resolver
// ============================================================================

#[derive(Clone)]
pub struct EntityResolver {
    customers: CustomerRepository,
    items: ItemRepository,
    log: SyncLogService,
}

impl EntityResolver {
    pub fn new(customers: CustomerRepository, items: ItemRepository, log: SyncLogService) -> Self {
        Self {
            customers,
            items,
            log,
        }
    }

    /// Find or create the customer for an order.
    ///
    /// Lookup order: storefront customer id, then billing email. The email
    /// fallback also applies when an id was supplied but matched nothing,
    /// so a known email never produces a second record.
    pub async fn resolve_customer(&self, payload: &OrderPayload) -> Result<Customer, SyncError> {
        let email = payload.billing.email.trim();
        let external_id = payload.external_customer_id();

        if email.is_empty() && external_id.is_none() {
            return Err(SyncError::ResolutionFailed(
                "order has neither billing email nor customer id".into(),
            ));
        }

        if let Some(ref id) = external_id
            && let Some(existing) = self.customers.find_by_storefront_id(id).await?
        {
            return Ok(existing);
        }

        if !email.is_empty()
            && let Some(existing) = self.customers.find_by_email(email).await?
        {
            return Ok(existing);
        }

        // Miss on every key: ensure the default classifications, then create
        self.customers
            .ensure_classification("customer_group", DEFAULT_CUSTOMER_GROUP)
            .await?;
        self.customers
            .ensure_classification("territory", DEFAULT_TERRITORY)
            .await?;

        let name = payload.billing.display_name();
        let create = customer_from_billing(&payload.billing, name.clone(), external_id);

        match self.customers.find_or_create(create).await {
            Ok(customer) => {
                self.log.log_customer_creation(&name, None).await;
                Ok(customer)
            }
            Err(e) => {
                self.log.log_customer_creation(&name, Some(&e.to_string())).await;
                Err(e.into())
            }
        }
    }

    /// Find or create the item record for one line item.
    pub async fn resolve_item(&self, line: &LineItem) -> Result<Item, SyncError> {
        let code = extract_sku(line).unwrap_or_else(|| fallback_item_code(&line.name));

        let create = ItemCreate::with_defaults(
            code.clone(),
            truncated(&line.name, ITEM_NAME_MAX),
            truncated(&line.description, ITEM_DESCRIPTION_MAX),
        );

        match self.items.find_or_create(create).await {
            Ok(item) => Ok(item),
            Err(e) => {
                self.log.log_item_creation(&code, Some(&e.to_string())).await;
                Err(e.into())
            }
        }
    }
}

fn customer_from_billing(
    billing: &BillingInfo,
    name: String,
    storefront_customer_id: Option<String>,
) -> CustomerCreate {
    CustomerCreate {
        name,
        email: billing.email.trim().to_string(),
        storefront_customer_id,
        customer_group: DEFAULT_CUSTOMER_GROUP.into(),
        territory: DEFAULT_TERRITORY.into(),
        phone: billing.phone.clone(),
        address_line1: billing.address_1.clone(),
        city: billing.city.clone(),
        state: billing.state.clone(),
        postcode: billing.postcode.clone(),
        country: billing.country.clone(),
        created_at: shared::util::now_millis(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::order::MetaEntry;

    fn line_with(sku: Option<&str>, meta: Vec<MetaEntry>) -> LineItem {
        LineItem {
            name: "Espresso Beans 1kg".into(),
            quantity: 1.0,
            price: 24.15,
            sku: sku.map(str::to_string),
            meta_data: meta,
            ..Default::default()
        }
    }

    #[test]
    fn direct_sku_wins_over_metadata() {
        let line = line_with(
            Some("BEAN-1KG"),
            vec![MetaEntry::new("sku", "META-SKU")],
        );
        assert_eq!(extract_sku(&line).as_deref(), Some("BEAN-1KG"));
    }

    #[test]
    fn metadata_sku_by_key_or_display_key() {
        let by_key = line_with(None, vec![MetaEntry::new("SKU", "META-1")]);
        assert_eq!(extract_sku(&by_key).as_deref(), Some("META-1"));

        let mut entry = MetaEntry::new("_internal", "META-2");
        entry.display_key = Some("Sku".into());
        let by_display = line_with(None, vec![entry]);
        assert_eq!(extract_sku(&by_display).as_deref(), Some("META-2"));
    }

    #[test]
    fn addon_block_sku_is_the_last_resort_extractor() {
        let addon = MetaEntry::new(
            ADDON_META_KEY,
            json!([{
                "addon_1": {
                    "display_label": "SKU",
                    "addon_value": "ADDON-9"
                }
            }]),
        );
        let line = line_with(None, vec![addon.clone()]);
        assert_eq!(extract_sku(&line).as_deref(), Some("ADDON-9"));

        // A plain metadata SKU still beats the add-on block
        let line = line_with(None, vec![MetaEntry::new("sku", "META-3"), addon]);
        assert_eq!(extract_sku(&line).as_deref(), Some("META-3"));
    }

    #[test]
    fn empty_direct_sku_falls_through() {
        let line = line_with(Some("  "), vec![MetaEntry::new("sku", "META-4")]);
        assert_eq!(extract_sku(&line).as_deref(), Some("META-4"));
    }

    #[test]
    fn fallback_code_is_deterministic_per_name() {
        let a = fallback_item_code("Mystery Product");
        let b = fallback_item_code("Mystery Product");
        let c = fallback_item_code("Other Product");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("mystery-product-"));
    }

    #[test]
    fn fallback_code_truncates_long_names() {
        let code = fallback_item_code(
            "An Extremely Long Product Display Name That Never Ends",
        );
        // slug capped at 20 chars plus "-" and a 4-char hash
        assert!(code.len() <= FALLBACK_SLUG_MAX + 5);
    }
}
