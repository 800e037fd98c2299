//! # Sales Ledger
//!
//! Validates and appends immutable sale records.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_sale(tenant, item_id, quantity_sold, sold_price)               │
//! │       │                                                                 │
//! │       ├── 1. resolve item for (tenant, item_id)   → ItemNotFound        │
//! │       ├── 2. quantity_sold > 0                    → MustBePositive      │
//! │       ├── 3. sold_price >= 0, >= item.rate        → SoldBelowCost       │
//! │       ├── 4. rate_with_tax = rate + taxes         (pricing)             │
//! │       ├── 5. snapshot name/brand/cost/rate, stamp sold_at               │
//! │       ▼                                                                 │
//! │  SaleStore::append (all or nothing)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Recording a sale leaves `Item.quantity` alone. Stock on hand and sale
//! history are separate views.
//!
//! `record_sale` is not idempotent. Callers must not retry it blindly.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, SubsecRound, Utc};

use crate::catalog::ItemCatalog;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::pricing::rate_with_tax;
use crate::report::{aggregate, local_date, ReportPeriod, SalesReport};
use crate::store::{ItemStore, SaleStore};
use crate::types::{DateRange, Sale, SaleDraft, TenantId};
use crate::validation::{validate_amount, validate_quantity_sold, validate_tenant};

/// Append-only sale recording over an item catalog and a sale store.
#[derive(Debug)]
pub struct SalesLedger<I, S> {
    catalog: ItemCatalog<I>,
    sales: Arc<S>,
}

impl<I, S> Clone for SalesLedger<I, S> {
    fn clone(&self) -> Self {
        SalesLedger {
            catalog: self.catalog.clone(),
            sales: Arc::clone(&self.sales),
        }
    }
}

impl<I: ItemStore, S: SaleStore> SalesLedger<I, S> {
    pub fn new(items: Arc<I>, sales: Arc<S>) -> Self {
        SalesLedger {
            catalog: ItemCatalog::new(items),
            sales,
        }
    }

    /// The catalog this ledger resolves items through.
    pub fn catalog(&self) -> &ItemCatalog<I> {
        &self.catalog
    }

    /// Records a sale stamped with the current time.
    ///
    /// ## Errors
    /// - `ItemNotFound` if the tenant has no such item
    /// - `Validation` for a non-positive quantity or a price below cost
    /// - `TransientStore` if the append fails (nothing was written)
    pub async fn record_sale(
        &self,
        tenant: &TenantId,
        item_id: &str,
        quantity_sold: i64,
        sold_price: Money,
    ) -> CoreResult<Sale> {
        self.record_sale_at(tenant, item_id, quantity_sold, sold_price, Utc::now())
            .await
    }

    /// Records a sale with an explicit timestamp. Sale times are kept to the
    /// millisecond; finer precision is truncated.
    pub async fn record_sale_at(
        &self,
        tenant: &TenantId,
        item_id: &str,
        quantity_sold: i64,
        sold_price: Money,
        sold_at: DateTime<Utc>,
    ) -> CoreResult<Sale> {
        let item = self.catalog.get_item(tenant, item_id).await?;

        validate_quantity_sold(quantity_sold)?;
        validate_amount("sold_price", sold_price)?;

        if sold_price < item.rate {
            return Err(ValidationError::SoldBelowCost {
                sold_price,
                item_cost: item.rate,
            }
            .into());
        }

        let rate_with_tax = rate_with_tax(item.rate, item.taxes)?;

        let draft = SaleDraft {
            item_id: item.item_id,
            item_name: item.item_name,
            brand_name: item.brand_name,
            quantity_sold,
            sold_price,
            item_cost: item.rate,
            rate_with_tax,
            sold_at: sold_at.trunc_subsecs(3),
            owner_id: tenant.clone(),
        };

        let sale = self.sales.append(draft).await?;
        ensure_owned(tenant, sale)
    }

    /// Every sale the tenant owns, oldest first, optionally limited to
    /// `range`.
    ///
    /// ## Errors
    /// `ScopeViolation` if the store hands back a sale owned by anyone else.
    pub async fn list_sales(
        &self,
        tenant: &TenantId,
        range: Option<DateRange>,
    ) -> CoreResult<Vec<Sale>> {
        validate_tenant(tenant)?;

        let mut sales = self
            .sales
            .list(tenant, range)
            .await?
            .into_iter()
            .map(|sale| ensure_owned(tenant, sale))
            .collect::<CoreResult<Vec<_>>>()?;

        if let Some(range) = range {
            sales.retain(|s| range.contains(s.sold_at));
        }

        sales.sort_by(|a, b| a.sold_at.cmp(&b.sold_at));
        Ok(sales)
    }

    /// Sales whose local date at `offset` is `today`, newest first.
    pub async fn todays_sales(
        &self,
        tenant: &TenantId,
        today: NaiveDate,
        offset: FixedOffset,
    ) -> CoreResult<Vec<Sale>> {
        let mut sales = self.list_sales(tenant, None).await?;
        sales.retain(|s| local_date(s, offset) == today);
        sales.reverse();
        Ok(sales)
    }

    /// Report over the tenant's sales, optionally limited to one month.
    pub async fn get_report(
        &self,
        tenant: &TenantId,
        period: Option<ReportPeriod>,
        offset: FixedOffset,
    ) -> CoreResult<SalesReport> {
        let range = period.map(|p| p.date_range(offset)).transpose()?;
        let sales = self.list_sales(tenant, range).await?;
        aggregate(&sales, period, offset)
    }
}

fn ensure_owned(tenant: &TenantId, sale: Sale) -> CoreResult<Sale> {
    if &sale.owner_id != tenant {
        return Err(CoreError::scope("sale", sale.id, tenant.as_str()));
    }
    Ok(sale)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StoreError, StoreResult};
    use crate::memory::MemoryStore;
    use crate::types::{ItemPatch, NewItem};
    use async_trait::async_trait;

    struct Fixture {
        store: Arc<MemoryStore>,
        ledger: SalesLedger<MemoryStore, MemoryStore>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let ledger = SalesLedger::new(Arc::clone(&store), Arc::clone(&store));
        Fixture { store, ledger }
    }

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    async fn add(ledger: &SalesLedger<MemoryStore, MemoryStore>, tenant: &str, id: &str, rate: i64, taxes: i64) {
        ledger
            .catalog()
            .add_item(
                &TenantId::new(tenant),
                NewItem {
                    item_id: id.into(),
                    item_name: format!("Item {id}"),
                    brand_name: "Acme".into(),
                    quantity: 10,
                    rate: Money::from_cents(rate),
                    mrp: Money::from_cents(rate * 2),
                    taxes: Money::from_cents(taxes),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_record_sale_snapshots_rate_with_tax() {
        let f = fixture();
        let a = TenantId::new("a");

        for (rate, taxes, qty, price) in [(1000, 150, 1, 1000), (1, 0, 5, 1), (250, 99, 3, 10_000)] {
            add(&f.ledger, "a", "X", rate, taxes).await;

            let sale = f.ledger.record_sale(&a, "X", qty, Money::from_cents(price)).await.unwrap();

            assert_eq!(sale.rate_with_tax.cents(), rate + taxes);
            assert_eq!(sale.item_cost.cents(), rate);
            assert_eq!(sale.quantity_sold, qty);
            assert_eq!(sale.owner_id, a);
            assert!(!sale.id.is_empty());

            f.ledger.catalog().delete_item(&a, "X").await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_sold_below_cost_always_fails() {
        let f = fixture();
        let a = TenantId::new("a");
        add(&f.ledger, "a", "X", 500, 50).await;

        for price in [0, 1, 250, 499] {
            let err = f
                .ledger
                .record_sale(&a, "X", 1, Money::from_cents(price))
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                CoreError::Validation(ValidationError::SoldBelowCost { .. })
            ));
        }

        assert!(f.ledger.list_sales(&a, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_quantity_fails() {
        let f = fixture();
        let a = TenantId::new("a");
        add(&f.ledger, "a", "X", 500, 0).await;

        for qty in [0, -1] {
            let err = f
                .ledger
                .record_sale(&a, "X", qty, Money::from_cents(500))
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                CoreError::Validation(ValidationError::MustBePositive { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_cross_tenant_item_is_not_found() {
        let f = fixture();
        add(&f.ledger, "a", "X", 500, 0).await;

        let err = f
            .ledger
            .record_sale(&TenantId::new("b"), "X", 1, Money::from_cents(500))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ItemNotFound(_)));
    }

    #[tokio::test]
    async fn test_snapshots_survive_item_edit_and_delete() {
        let f = fixture();
        let a = TenantId::new("a");
        add(&f.ledger, "a", "X", 500, 100).await;
        f.ledger.record_sale(&a, "X", 1, Money::from_cents(900)).await.unwrap();

        let patch = ItemPatch {
            item_name: Some("Renamed".into()),
            rate: Some(Money::from_cents(700)),
            ..ItemPatch::default()
        };
        f.ledger.catalog().update_item(&a, "X", patch).await.unwrap();
        f.ledger.catalog().delete_item(&a, "X").await.unwrap();

        let sales = f.ledger.list_sales(&a, None).await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].item_name, "Item X");
        assert_eq!(sales[0].item_cost, Money::from_cents(500));
        assert_eq!(sales[0].rate_with_tax, Money::from_cents(600));
    }

    #[tokio::test]
    async fn test_stock_is_not_decremented() {
        let f = fixture();
        let a = TenantId::new("a");
        add(&f.ledger, "a", "X", 500, 0).await;

        f.ledger.record_sale(&a, "X", 4, Money::from_cents(2000)).await.unwrap();

        let item = f.ledger.catalog().get_item(&a, "X").await.unwrap();
        assert_eq!(item.quantity, 10);
    }

    #[tokio::test]
    async fn test_tenants_never_see_each_other() {
        let f = fixture();
        let a = TenantId::new("a");
        let b = TenantId::new("b");
        add(&f.ledger, "a", "X", 100, 0).await;
        add(&f.ledger, "b", "X", 100, 0).await;

        f.ledger.record_sale(&a, "X", 1, Money::from_cents(1000)).await.unwrap();
        f.ledger.record_sale(&b, "X", 1, Money::from_cents(2000)).await.unwrap();

        let sales_b = f.ledger.list_sales(&b, None).await.unwrap();
        assert_eq!(sales_b.len(), 1);
        assert_eq!(sales_b[0].sold_price, Money::from_cents(2000));

        let report_b = f.ledger.get_report(&b, None, utc()).await.unwrap();
        assert_eq!(report_b.total_sales, Money::from_cents(2000));
    }

    #[tokio::test]
    async fn test_list_sales_range_and_report_period() {
        let f = fixture();
        let a = TenantId::new("a");
        add(&f.ledger, "a", "X", 100, 0).await;

        f.ledger
            .record_sale_at(&a, "X", 1, Money::from_cents(1000), at("2024-01-15T10:30:00Z"))
            .await
            .unwrap();
        f.ledger
            .record_sale_at(&a, "X", 1, Money::from_cents(3000), at("2024-02-10T09:00:00Z"))
            .await
            .unwrap();

        let jan = DateRange::new(at("2024-01-01T00:00:00Z"), at("2024-02-01T00:00:00Z"));
        let sales = f.ledger.list_sales(&a, Some(jan)).await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].sold_price, Money::from_cents(1000));

        let period = ReportPeriod::new(1, 2024).unwrap();
        let report = f.ledger.get_report(&a, Some(period), utc()).await.unwrap();
        assert_eq!(report.total_sales, Money::from_cents(1000));
        assert_eq!(report.daily_report.len(), 1);
    }

    #[tokio::test]
    async fn test_todays_sales_newest_first() {
        let f = fixture();
        let a = TenantId::new("a");
        add(&f.ledger, "a", "X", 100, 0).await;

        for (ts, price) in [
            ("2024-05-01T08:00:00Z", 100),
            ("2024-05-02T08:00:00Z", 200),
            ("2024-05-02T18:00:00Z", 300),
        ] {
            f.ledger
                .record_sale_at(&a, "X", 1, Money::from_cents(price), at(ts))
                .await
                .unwrap();
        }

        let today = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let sales = f.ledger.todays_sales(&a, today, utc()).await.unwrap();

        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].sold_price, Money::from_cents(300));
    }

    #[tokio::test]
    async fn test_memory_store_shared_between_catalog_and_ledger() {
        let f = fixture();
        add(&f.ledger, "a", "X", 100, 0).await;
        assert_eq!(ItemStore::list(&*f.store, &TenantId::new("a")).await.unwrap().len(), 1);
    }

    /// Sale store that returns records regardless of tenant.
    struct LeakySales(Vec<Sale>);

    #[async_trait]
    impl SaleStore for LeakySales {
        async fn list(&self, _: &TenantId, _: Option<DateRange>) -> StoreResult<Vec<Sale>> {
            Ok(self.0.clone())
        }
        async fn append(&self, _: SaleDraft) -> StoreResult<Sale> {
            Err(StoreError::Unavailable("disk I/O error".into()))
        }
    }

    #[tokio::test]
    async fn test_foreign_sale_is_scope_violation() {
        let foreign = Sale {
            id: "s1".into(),
            item_id: "X".into(),
            item_name: "Widget".into(),
            brand_name: "Acme".into(),
            quantity_sold: 1,
            sold_price: Money::from_cents(100),
            item_cost: Money::from_cents(100),
            rate_with_tax: Money::from_cents(100),
            sold_at: at("2024-01-01T00:00:00Z"),
            owner_id: TenantId::new("b"),
        };
        let ledger = SalesLedger::new(Arc::new(MemoryStore::new()), Arc::new(LeakySales(vec![foreign])));

        let err = ledger.list_sales(&TenantId::new("a"), None).await.unwrap_err();
        assert!(matches!(err, CoreError::ScopeViolation { .. }));

        let err = ledger.get_report(&TenantId::new("a"), None, utc()).await.unwrap_err();
        assert!(matches!(err, CoreError::ScopeViolation { .. }));
    }

    #[tokio::test]
    async fn test_failed_append_is_retryable() {
        let items = Arc::new(MemoryStore::new());
        let ledger = SalesLedger::new(Arc::clone(&items), Arc::new(LeakySales(Vec::new())));
        let a = TenantId::new("a");
        ledger
            .catalog()
            .add_item(
                &a,
                NewItem {
                    item_id: "X".into(),
                    item_name: "Widget".into(),
                    brand_name: "Acme".into(),
                    quantity: 1,
                    rate: Money::from_cents(100),
                    mrp: Money::from_cents(200),
                    taxes: Money::zero(),
                },
            )
            .await
            .unwrap();

        let err = ledger.record_sale(&a, "X", 1, Money::from_cents(100)).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_sale_time_truncated_to_millis() {
        let f = fixture();
        let a = TenantId::new("a");
        add(&f.ledger, "a", "X", 100, 0).await;

        let sale = f
            .ledger
            .record_sale_at(&a, "X", 1, Money::from_cents(100), at("2024-01-15T10:30:00.123456789Z"))
            .await
            .unwrap();

        assert_eq!(sale.sold_at, at("2024-01-15T10:30:00.123Z"));
        assert_eq!(f.ledger.list_sales(&a, None).await.unwrap(), vec![sale]);
    }

    #[tokio::test]
    async fn test_export_of_recorded_sales_is_one_line_per_sale() {
        let f = fixture();
        let a = TenantId::new("a");
        add(&f.ledger, "a", "X", 100, 0).await;

        let rejected = NewItem {
            item_id: "Y".into(),
            item_name: "Claw\nHammer".into(),
            brand_name: "Acme".into(),
            quantity: 1,
            rate: Money::from_cents(100),
            mrp: Money::from_cents(200),
            taxes: Money::zero(),
        };
        assert!(f.ledger.catalog().add_item(&a, rejected).await.is_err());

        for _ in 0..3 {
            f.ledger.record_sale(&a, "X", 1, Money::from_cents(150)).await.unwrap();
        }
        let sales = f.ledger.list_sales(&a, None).await.unwrap();
        let text = crate::export::export_csv(&sales).unwrap();

        assert_eq!(text.lines().count(), sales.len() + 1);
        assert_eq!(text.matches('\n').count(), sales.len() + 1);
    }
}
