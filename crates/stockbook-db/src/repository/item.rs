//! # Item Repository
//!
//! Database operations for catalog items.
//!
//! ## Key Operations
//! - Tenant-scoped list and lookup
//! - Atomic create (PRIMARY KEY enforces `(tenant_id, item_id)`)
//! - Patch update inside one transaction
//!
//! ## Uniqueness
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Two shells run `stockbook item add HAM-01` at the same time           │
//! │                                                                         │
//! │  INSERT (shop-a, HAM-01) ──► ok                                        │
//! │  INSERT (shop-a, HAM-01) ──► UNIQUE constraint failed                  │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │                         StoreError::DuplicateItemId                     │
//! │                                                                         │
//! │  No read-then-insert window: SQLite serializes the two writes.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use stockbook_core::error::StoreResult;
use stockbook_core::{Item, ItemPatch, ItemStore, Money, TenantId};

const SELECT_ITEM: &str = r#"
    SELECT
        tenant_id,
        item_id,
        item_name,
        brand_name,
        quantity,
        rate_cents,
        mrp_cents,
        taxes_cents,
        created_at_ms,
        updated_at_ms
    FROM items
"#;

/// One row of the `items` table.
#[derive(Debug, FromRow)]
struct ItemRow {
    tenant_id: String,
    item_id: String,
    item_name: String,
    brand_name: String,
    quantity: i64,
    rate_cents: i64,
    mrp_cents: i64,
    taxes_cents: i64,
    created_at_ms: i64,
    updated_at_ms: i64,
}

impl TryFrom<ItemRow> for Item {
    type Error = DbError;

    fn try_from(row: ItemRow) -> DbResult<Item> {
        Ok(Item {
            created_at: from_millis(row.created_at_ms)?,
            updated_at: from_millis(row.updated_at_ms)?,
            item_id: row.item_id,
            item_name: row.item_name,
            brand_name: row.brand_name,
            quantity: row.quantity,
            rate: Money::from_cents(row.rate_cents),
            mrp: Money::from_cents(row.mrp_cents),
            taxes: Money::from_cents(row.taxes_cents),
            owner_id: TenantId::new(row.tenant_id),
        })
    }
}

pub(crate) fn from_millis(ms: i64) -> DbResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| DbError::CorruptRow(format!("timestamp out of range: {ms}")))
}

/// Repository for item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ItemRepository::new(pool);
/// let items = repo.list_for(&tenant).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Every item the tenant owns, by name.
    pub async fn list_for(&self, tenant: &TenantId) -> DbResult<Vec<Item>> {
        debug!(tenant = %tenant, "Listing items");

        let rows: Vec<ItemRow> = sqlx::query_as(&format!(
            "{SELECT_ITEM} WHERE tenant_id = ?1 ORDER BY item_name, item_id"
        ))
        .bind(tenant.as_str())
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed items");
        rows.into_iter().map(Item::try_from).collect()
    }

    /// Looks up one item by `(tenant, item_id)`.
    pub async fn get_by_id(&self, tenant: &TenantId, item_id: &str) -> DbResult<Option<Item>> {
        debug!(tenant = %tenant, item_id = %item_id, "Getting item");

        let row: Option<ItemRow> = sqlx::query_as(&format!(
            "{SELECT_ITEM} WHERE tenant_id = ?1 AND item_id = ?2"
        ))
        .bind(tenant.as_str())
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Item::try_from).transpose()
    }

    /// Inserts an item.
    ///
    /// ## Errors
    /// `UniqueViolation` if the owner already has this `item_id`.
    pub async fn insert(&self, item: &Item) -> DbResult<()> {
        debug!(tenant = %item.owner_id, item_id = %item.item_id, "Inserting item");

        sqlx::query(
            r#"
            INSERT INTO items (
                tenant_id, item_id, item_name, brand_name, quantity,
                rate_cents, mrp_cents, taxes_cents, created_at_ms, updated_at_ms
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(item.owner_id.as_str())
        .bind(&item.item_id)
        .bind(&item.item_name)
        .bind(&item.brand_name)
        .bind(item.quantity)
        .bind(item.rate.cents())
        .bind(item.mrp.cents())
        .bind(item.taxes.cents())
        .bind(item.created_at.timestamp_millis())
        .bind(item.updated_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_as(e, &item.item_id))?;

        info!(tenant = %item.owner_id, item_id = %item.item_id, "Item created");
        Ok(())
    }

    /// Applies `patch` to an item in one transaction and returns the result.
    ///
    /// ## Errors
    /// - `NotFound` if the tenant has no such item
    /// - `UniqueViolation` if `patch.item_id` is already taken
    pub async fn apply_patch(
        &self,
        tenant: &TenantId,
        item_id: &str,
        patch: &ItemPatch,
    ) -> DbResult<Item> {
        debug!(tenant = %tenant, item_id = %item_id, "Updating item");

        let mut tx = self.pool.begin().await?;

        let row: Option<ItemRow> = sqlx::query_as(&format!(
            "{SELECT_ITEM} WHERE tenant_id = ?1 AND item_id = ?2"
        ))
        .bind(tenant.as_str())
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?;

        let mut item = match row {
            Some(row) => Item::try_from(row)?,
            None => return Err(DbError::not_found("Item", item_id)),
        };
        item.apply(patch, Utc::now().trunc_subsecs(3));

        sqlx::query(
            r#"
            UPDATE items SET
                item_id = ?3,
                item_name = ?4,
                brand_name = ?5,
                quantity = ?6,
                rate_cents = ?7,
                mrp_cents = ?8,
                taxes_cents = ?9,
                updated_at_ms = ?10
            WHERE tenant_id = ?1 AND item_id = ?2
            "#,
        )
        .bind(tenant.as_str())
        .bind(item_id)
        .bind(&item.item_id)
        .bind(&item.item_name)
        .bind(&item.brand_name)
        .bind(item.quantity)
        .bind(item.rate.cents())
        .bind(item.mrp.cents())
        .bind(item.taxes.cents())
        .bind(item.updated_at.timestamp_millis())
        .execute(&mut *tx)
        .await
        .map_err(|e| duplicate_as(e, &item.item_id))?;

        tx.commit().await?;

        info!(tenant = %tenant, item_id = %item.item_id, "Item updated");
        Ok(item)
    }

    /// Deletes an item. Returns whether a row was removed.
    pub async fn delete_by_id(&self, tenant: &TenantId, item_id: &str) -> DbResult<bool> {
        debug!(tenant = %tenant, item_id = %item_id, "Deleting item");

        let result = sqlx::query("DELETE FROM items WHERE tenant_id = ?1 AND item_id = ?2")
            .bind(tenant.as_str())
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(tenant = %tenant, item_id = %item_id, "Item deleted");
        }
        Ok(removed)
    }

    /// Number of items across all tenants.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Puts the offending id into a unique violation.
fn duplicate_as(err: sqlx::Error, item_id: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { .. } => DbError::duplicate("item_id", item_id),
        other => other,
    }
}

#[async_trait]
impl ItemStore for ItemRepository {
    async fn list(&self, tenant: &TenantId) -> StoreResult<Vec<Item>> {
        Ok(self.list_for(tenant).await?)
    }

    async fn get(&self, tenant: &TenantId, item_id: &str) -> StoreResult<Option<Item>> {
        Ok(self.get_by_id(tenant, item_id).await?)
    }

    async fn create(&self, item: Item) -> StoreResult<Item> {
        self.insert(&item).await?;
        Ok(item)
    }

    async fn update(&self, tenant: &TenantId, item_id: &str, patch: &ItemPatch) -> StoreResult<Item> {
        Ok(self.apply_patch(tenant, item_id, patch).await?)
    }

    async fn delete(&self, tenant: &TenantId, item_id: &str) -> StoreResult<()> {
        self.delete_by_id(tenant, item_id).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
