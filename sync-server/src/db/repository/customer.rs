//! Customer Repository
//!
//! Customers are correlated by storefront customer id when the order carries
//! one, with billing email as the fallback key. The unique index on `email`
//! is the duplicate-prevention backstop: a lost creation race is resolved by
//! re-reading the winner's record.

use super::{BaseRepository, FIND_OR_CREATE_ATTEMPTS, RepoError, RepoResult};
use serde::{Deserialize, Serialize};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const CUSTOMER_TABLE: &str = "customer";

/// Stored customer record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storefront_customer_id: Option<String>,
    pub customer_group: String,
    pub territory: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub country: String,
    pub created_at: i64,
}

/// Insert payload (no record id; SurrealDB assigns one).
#[derive(Debug, Clone, Serialize)]
pub struct CustomerCreate {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storefront_customer_id: Option<String>,
    pub customer_group: String,
    pub territory: String,
    pub phone: String,
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub country: String,
    pub created_at: i64,
}

/// Classification record (customer group / territory), keyed by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Classification {
    #[serde(skip_serializing)]
    #[allow(dead_code)]
    id: Option<RecordId>,
    name: String,
}

#[derive(Clone)]
pub struct CustomerRepository {
    base: BaseRepository,
}

impl CustomerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_storefront_id(&self, storefront_id: &str) -> RepoResult<Option<Customer>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM customer WHERE storefront_customer_id = $sid LIMIT 1")
            .bind(("sid", storefront_id.to_string()))
            .await?;
        let customers: Vec<Customer> = result.take(0)?;
        Ok(customers.into_iter().next())
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Customer>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM customer WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?;
        let customers: Vec<Customer> = result.take(0)?;
        Ok(customers.into_iter().next())
    }

    /// Create the customer, or return the existing record when another
    /// writer got there first (unique email index).
    pub async fn find_or_create(&self, data: CustomerCreate) -> RepoResult<Customer> {
        for _ in 0..FIND_OR_CREATE_ATTEMPTS {
            if let Some(existing) = self.find_by_email(&data.email).await? {
                return Ok(existing);
            }

            match self.try_create(data.clone()).await {
                Ok(customer) => return Ok(customer),
                // Lost the race: loop back to the lookup and reuse
                Err(RepoError::Duplicate(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(RepoError::Duplicate(format!(
            "customer {} still conflicting after {} attempts",
            data.email, FIND_OR_CREATE_ATTEMPTS
        )))
    }

    async fn try_create(&self, data: CustomerCreate) -> RepoResult<Customer> {
        let created: Option<Customer> = self.base.db().create(CUSTOMER_TABLE).content(data).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create customer".into()))
    }

    /// Idempotently ensure a classification record (keyed by name) exists.
    /// Shared by customer group and territory bootstrap.
    pub async fn ensure_classification(&self, table: &str, name: &str) -> RepoResult<()> {
        let mut result = self
            .base
            .db()
            .query(format!("SELECT * FROM {table} WHERE name = $name LIMIT 1"))
            .bind(("name", name.to_string()))
            .await?;
        let existing: Vec<Classification> = result.take(0)?;
        if !existing.is_empty() {
            return Ok(());
        }

        let create: Result<Option<Classification>, surrealdb::Error> = self
            .base
            .db()
            .create(table)
            .content(Classification {
                id: None,
                name: name.to_string(),
            })
            .await;

        match create.map_err(RepoError::from) {
            Ok(_) => Ok(()),
            // Another run created it between our lookup and insert
            Err(RepoError::Duplicate(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
