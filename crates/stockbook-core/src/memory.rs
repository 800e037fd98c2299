//! # In-Memory Store
//!
//! [`ItemStore`] and [`SaleStore`] over mutex-guarded collections. Used by
//! unit tests and by anything that wants the core without a database.
//!
//! Uniqueness of `(owner, item_id)` is checked and inserted under a single
//! lock, so two racing creates leave exactly one winner.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::{ItemStore, SaleStore};
use crate::types::{DateRange, Item, ItemPatch, Sale, SaleDraft, TenantId};

type ItemKey = (TenantId, String);

/// Process-local store for items and sales.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<BTreeMap<ItemKey, Item>>,
    sales: Mutex<Vec<Sale>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> StoreResult<MutexGuard<'_, BTreeMap<ItemKey, Item>>> {
        self.items
            .lock()
            .map_err(|_| StoreError::Unavailable("item store lock poisoned".to_string()))
    }

    fn sales(&self) -> StoreResult<MutexGuard<'_, Vec<Sale>>> {
        self.sales
            .lock()
            .map_err(|_| StoreError::Unavailable("sale store lock poisoned".to_string()))
    }
}

fn key(tenant: &TenantId, item_id: &str) -> ItemKey {
    (tenant.clone(), item_id.to_string())
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn list(&self, tenant: &TenantId) -> StoreResult<Vec<Item>> {
        let items = self.items()?;
        Ok(items
            .iter()
            .filter(|((owner, _), _)| owner == tenant)
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn get(&self, tenant: &TenantId, item_id: &str) -> StoreResult<Option<Item>> {
        Ok(self.items()?.get(&key(tenant, item_id)).cloned())
    }

    async fn create(&self, item: Item) -> StoreResult<Item> {
        let mut items = self.items()?;
        let k = key(&item.owner_id, &item.item_id);

        if items.contains_key(&k) {
            return Err(StoreError::DuplicateItemId(item.item_id));
        }

        items.insert(k, item.clone());
        Ok(item)
    }

    async fn update(&self, tenant: &TenantId, item_id: &str, patch: &ItemPatch) -> StoreResult<Item> {
        let mut items = self.items()?;
        let old_key = key(tenant, item_id);

        let mut item = items
            .get(&old_key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(item_id.to_string()))?;

        item.apply(patch, Utc::now());

        let new_key = key(tenant, &item.item_id);
        if new_key != old_key {
            if items.contains_key(&new_key) {
                return Err(StoreError::DuplicateItemId(item.item_id));
            }
            items.remove(&old_key);
        }

        items.insert(new_key, item.clone());
        Ok(item)
    }

    async fn delete(&self, tenant: &TenantId, item_id: &str) -> StoreResult<()> {
        self.items()?.remove(&key(tenant, item_id));
        Ok(())
    }
}

#[async_trait]
impl SaleStore for MemoryStore {
    async fn list(&self, tenant: &TenantId, range: Option<DateRange>) -> StoreResult<Vec<Sale>> {
        let sales = self.sales()?;
        Ok(sales
            .iter()
            .filter(|s| &s.owner_id == tenant)
            .filter(|s| range.map_or(true, |r| r.contains(s.sold_at)))
            .cloned()
            .collect())
    }

    async fn append(&self, draft: SaleDraft) -> StoreResult<Sale> {
        let sale = Sale::from_draft(Uuid::new_v4().to_string(), draft);
        self.sales()?.push(sale.clone());
        Ok(sale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::NewItem;

    fn item(owner: &str, id: &str) -> Item {
        Item::from_new(
            TenantId::new(owner),
            NewItem {
                item_id: id.into(),
                item_name: format!("Item {id}"),
                brand_name: "Acme".into(),
                quantity: 5,
                rate: Money::from_cents(100),
                mrp: Money::from_cents(150),
                taxes: Money::zero(),
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_create_is_unique_per_tenant() {
        let store = MemoryStore::new();

        store.create(item("a", "X")).await.unwrap();
        let err = store.create(item("a", "X")).await.unwrap_err();
        assert_eq!(err, StoreError::DuplicateItemId("X".into()));

        store.create(item("b", "X")).await.unwrap();
        assert_eq!(ItemStore::list(&store, &TenantId::new("a")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_rename_collision() {
        let store = MemoryStore::new();
        let a = TenantId::new("a");
        store.create(item("a", "X")).await.unwrap();
        store.create(item("a", "Y")).await.unwrap();

        let patch = ItemPatch {
            item_id: Some("Y".into()),
            ..ItemPatch::default()
        };
        let err = store.update(&a, "X", &patch).await.unwrap_err();
        assert_eq!(err, StoreError::DuplicateItemId("Y".into()));

        // Original row survives the failed rename
        assert!(store.get(&a, "X").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_rename_moves_key() {
        let store = MemoryStore::new();
        let a = TenantId::new("a");
        store.create(item("a", "X")).await.unwrap();

        let patch = ItemPatch {
            item_id: Some("Z".into()),
            ..ItemPatch::default()
        };
        store.update(&a, "X", &patch).await.unwrap();

        assert!(store.get(&a, "X").await.unwrap().is_none());
        assert!(store.get(&a, "Z").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = MemoryStore::new();
        store.delete(&TenantId::new("a"), "nope").await.unwrap();
    }
}
