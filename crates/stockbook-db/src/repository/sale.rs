//! # Sale Repository
//!
//! Database operations for the append-only sale ledger.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  SaleDraft (validated by the ledger)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  append() → single INSERT, id = UUID v4                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Sale (never updated, never deleted; triggers reject both)             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::item::from_millis;
use stockbook_core::error::StoreResult;
use stockbook_core::{DateRange, Money, Sale, SaleDraft, SaleStore, TenantId};

const SELECT_SALE: &str = r#"
    SELECT
        id,
        tenant_id,
        item_id,
        item_name,
        brand_name,
        quantity_sold,
        sold_price_cents,
        item_cost_cents,
        rate_with_tax_cents,
        sold_at_ms
    FROM sales
"#;

/// One row of the `sales` table.
#[derive(Debug, FromRow)]
struct SaleRow {
    id: String,
    tenant_id: String,
    item_id: String,
    item_name: String,
    brand_name: String,
    quantity_sold: i64,
    sold_price_cents: i64,
    item_cost_cents: i64,
    rate_with_tax_cents: i64,
    sold_at_ms: i64,
}

impl TryFrom<SaleRow> for Sale {
    type Error = DbError;

    fn try_from(row: SaleRow) -> DbResult<Sale> {
        Ok(Sale {
            sold_at: from_millis(row.sold_at_ms)?,
            id: row.id,
            item_id: row.item_id,
            item_name: row.item_name,
            brand_name: row.brand_name,
            quantity_sold: row.quantity_sold,
            sold_price: Money::from_cents(row.sold_price_cents),
            item_cost: Money::from_cents(row.item_cost_cents),
            rate_with_tax: Money::from_cents(row.rate_with_tax_cents),
            owner_id: TenantId::new(row.tenant_id),
        })
    }
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// The tenant's sales, oldest first, optionally limited to `[start, end)`.
    pub async fn list_for(&self, tenant: &TenantId, range: Option<DateRange>) -> DbResult<Vec<Sale>> {
        debug!(tenant = %tenant, ?range, "Listing sales");

        let rows: Vec<SaleRow> = match range {
            Some(r) => {
                sqlx::query_as(&format!(
                    "{SELECT_SALE} WHERE tenant_id = ?1 AND sold_at_ms >= ?2 AND sold_at_ms < ?3 \
                     ORDER BY sold_at_ms, rowid"
                ))
                .bind(tenant.as_str())
                .bind(r.start.timestamp_millis())
                .bind(r.end.timestamp_millis())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "{SELECT_SALE} WHERE tenant_id = ?1 ORDER BY sold_at_ms, rowid"
                ))
                .bind(tenant.as_str())
                .fetch_all(&self.pool)
                .await?
            }
        };

        debug!(count = rows.len(), "Listed sales");
        rows.into_iter().map(Sale::try_from).collect()
    }

    /// Gets a sale by ID, scoped to the tenant.
    pub async fn get_by_id(&self, tenant: &TenantId, id: &str) -> DbResult<Option<Sale>> {
        let row: Option<SaleRow> = sqlx::query_as(&format!(
            "{SELECT_SALE} WHERE tenant_id = ?1 AND id = ?2"
        ))
        .bind(tenant.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Sale::try_from).transpose()
    }

    /// Inserts a sale in a single statement and returns it with its new id.
    /// The returned sale carries `sold_at` exactly as stored (milliseconds).
    pub async fn insert(&self, mut draft: SaleDraft) -> DbResult<Sale> {
        draft.sold_at = from_millis(draft.sold_at.timestamp_millis())?;
        let sale = Sale::from_draft(Uuid::new_v4().to_string(), draft);

        debug!(tenant = %sale.owner_id, id = %sale.id, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, tenant_id, item_id, item_name, brand_name, quantity_sold,
                sold_price_cents, item_cost_cents, rate_with_tax_cents, sold_at_ms
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&sale.id)
        .bind(sale.owner_id.as_str())
        .bind(&sale.item_id)
        .bind(&sale.item_name)
        .bind(&sale.brand_name)
        .bind(sale.quantity_sold)
        .bind(sale.sold_price.cents())
        .bind(sale.item_cost.cents())
        .bind(sale.rate_with_tax.cents())
        .bind(sale.sold_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        info!(
            tenant = %sale.owner_id,
            id = %sale.id,
            item_id = %sale.item_id,
            sold_price = %sale.sold_price,
            "Sale recorded"
        );
        Ok(sale)
    }
}

#[async_trait]
impl SaleStore for SaleRepository {
    async fn list(&self, tenant: &TenantId, range: Option<DateRange>) -> StoreResult<Vec<Sale>> {
        Ok(self.list_for(tenant, range).await?)
    }

    async fn append(&self, draft: SaleDraft) -> StoreResult<Sale> {
        Ok(self.insert(draft).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{DateTime, FixedOffset, Utc};
    use std::sync::Arc;
    use stockbook_core::{CoreError, NewItem, ReportPeriod, SalesLedger};

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    async fn setup() -> (Database, SalesLedger<crate::ItemRepository, SaleRepository>) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ledger = SalesLedger::new(Arc::new(db.items()), Arc::new(db.sales()));

        for tenant in ["shop-a", "shop-b"] {
            ledger
                .catalog()
                .add_item(
                    &TenantId::new(tenant),
                    NewItem {
                        item_id: "HAM-01".into(),
                        item_name: "Claw Hammer".into(),
                        brand_name: "Stanley".into(),
                        quantity: 10,
                        rate: Money::from_cents(1200),
                        mrp: Money::from_cents(1800),
                        taxes: Money::from_cents(100),
                    },
                )
                .await
                .unwrap();
        }

        (db, ledger)
    }

    #[tokio::test]
    async fn test_append_and_list() {
        let (db, ledger) = setup().await;
        let a = TenantId::new("shop-a");

        let sale = ledger
            .record_sale_at(&a, "HAM-01", 2, Money::from_cents(3600), at("2024-01-15T10:30:00Z"))
            .await
            .unwrap();

        let stored = db.sales().get_by_id(&a, &sale.id).await.unwrap().unwrap();
        assert_eq!(stored, sale);
        assert_eq!(stored.rate_with_tax, Money::from_cents(1300));
    }

    #[tokio::test]
    async fn test_recorded_sale_equals_stored_row() {
        let (db, ledger) = setup().await;
        let a = TenantId::new("shop-a");

        // Sub-millisecond precision must not survive into the returned sale
        let sold_at = Utc::now();
        let sale = ledger
            .record_sale_at(&a, "HAM-01", 1, Money::from_cents(1800), sold_at)
            .await
            .unwrap();
        let stored = db.sales().get_by_id(&a, &sale.id).await.unwrap().unwrap();
        assert_eq!(stored, sale);

        // Raw repository insert, bypassing the ledger
        let draft = SaleDraft {
            item_id: "HAM-01".into(),
            item_name: "Claw Hammer".into(),
            brand_name: "Stanley".into(),
            quantity_sold: 1,
            sold_price: Money::from_cents(1800),
            item_cost: Money::from_cents(1200),
            rate_with_tax: Money::from_cents(1300),
            sold_at: Utc::now(),
            owner_id: a.clone(),
        };
        let sale = db.sales().insert(draft).await.unwrap();
        let stored = db.sales().get_by_id(&a, &sale.id).await.unwrap().unwrap();
        assert_eq!(stored, sale);

        let sale = ledger.record_sale(&a, "HAM-01", 1, Money::from_cents(1800)).await.unwrap();
        let listed = ledger.list_sales(&a, None).await.unwrap();
        assert!(listed.contains(&sale));
    }

    #[tokio::test]
    async fn test_tenant_isolation_same_item_id() {
        let (db, ledger) = setup().await;
        let a = TenantId::new("shop-a");
        let b = TenantId::new("shop-b");

        ledger
            .record_sale_at(&a, "HAM-01", 1, Money::from_cents(1800), at("2024-01-15T10:00:00Z"))
            .await
            .unwrap();

        assert!(ledger.list_sales(&b, None).await.unwrap().is_empty());
        assert!(db.sales().list_for(&b, None).await.unwrap().is_empty());

        let report = ledger
            .get_report(&b, None, FixedOffset::east_opt(0).unwrap())
            .await
            .unwrap();
        assert_eq!(report.total_sales, Money::zero());
    }

    #[tokio::test]
    async fn test_range_and_period() {
        let (_db, ledger) = setup().await;
        let a = TenantId::new("shop-a");

        ledger
            .record_sale_at(&a, "HAM-01", 1, Money::from_cents(2000), at("2024-01-15T10:00:00Z"))
            .await
            .unwrap();
        ledger
            .record_sale_at(&a, "HAM-01", 1, Money::from_cents(2500), at("2024-02-10T10:00:00Z"))
            .await
            .unwrap();

        let period = ReportPeriod::new(1, 2024).unwrap();
        let report = ledger
            .get_report(&a, Some(period), FixedOffset::east_opt(0).unwrap())
            .await
            .unwrap();

        assert_eq!(report.total_sales, Money::from_cents(2000));
        assert_eq!(report.total_profit, Money::from_cents(700));
        assert_eq!(report.daily_report.len(), 1);
    }

    #[tokio::test]
    async fn test_sales_survive_item_delete() {
        let (_db, ledger) = setup().await;
        let a = TenantId::new("shop-a");

        ledger.record_sale(&a, "HAM-01", 1, Money::from_cents(1800)).await.unwrap();
        ledger.catalog().delete_item(&a, "HAM-01").await.unwrap();

        assert_eq!(ledger.list_sales(&a, None).await.unwrap().len(), 1);

        let err = ledger
            .record_sale(&a, "HAM-01", 1, Money::from_cents(1800))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ItemNotFound(_)));
    }

    #[tokio::test]
    async fn test_sales_table_rejects_update_and_delete() {
        let (db, ledger) = setup().await;
        let a = TenantId::new("shop-a");
        ledger.record_sale(&a, "HAM-01", 1, Money::from_cents(1800)).await.unwrap();

        let update = sqlx::query("UPDATE sales SET sold_price_cents = 0")
            .execute(db.pool())
            .await;
        assert!(update.is_err());

        let delete = sqlx::query("DELETE FROM sales").execute(db.pool()).await;
        assert!(delete.is_err());
    }
}
