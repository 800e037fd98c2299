//! # Item Catalog
//!
//! Tenant-scoped CRUD and search over items.
//!
//! ## Flow
//! ```text
//! add_item(tenant, NewItem)
//!       │
//!       ├── normalize (trim ids and names)
//!       ├── validate fields
//!       ▼
//! ItemStore::create ──► DuplicateItemId? ──► CoreError::DuplicateItemId
//!       │
//!       ▼
//! Item (owner = tenant)
//! ```
//!
//! Every item coming back from the store is checked against the calling
//! tenant before it is returned.

use std::sync::Arc;

use chrono::{SubsecRound, Utc};

use crate::error::{CoreError, CoreResult};
use crate::store::ItemStore;
use crate::types::{Item, ItemPatch, NewItem, TenantId};
use crate::validation::{validate_new_item, validate_patch, validate_search_query, validate_tenant};

/// Item CRUD and search over an [`ItemStore`].
#[derive(Debug)]
pub struct ItemCatalog<S> {
    store: Arc<S>,
}

impl<S> Clone for ItemCatalog<S> {
    fn clone(&self) -> Self {
        ItemCatalog {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ItemStore> ItemCatalog<S> {
    pub fn new(store: Arc<S>) -> Self {
        ItemCatalog { store }
    }

    /// Adds an item to the tenant's catalog.
    ///
    /// ## Errors
    /// - `Validation` for empty ids/names, over-long text, negative numbers
    /// - `DuplicateItemId` if the tenant already has this `item_id`
    pub async fn add_item(&self, tenant: &TenantId, new: NewItem) -> CoreResult<Item> {
        validate_tenant(tenant)?;

        let new = NewItem {
            item_id: new.item_id.trim().to_string(),
            item_name: new.item_name.trim().to_string(),
            brand_name: new.brand_name.trim().to_string(),
            ..new
        };
        validate_new_item(&new)?;

        let item = Item::from_new(tenant.clone(), new, Utc::now().trunc_subsecs(3));
        let created = self.store.create(item).await?;
        ensure_owned(tenant, created)
    }

    /// Case-insensitive substring search over `item_id` and `item_name`.
    ///
    /// A blank query returns nothing rather than the whole catalog.
    pub async fn search_items(&self, tenant: &TenantId, query: &str) -> CoreResult<Vec<Item>> {
        validate_tenant(tenant)?;
        let needle = validate_search_query(query)?;

        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut items = self.list_items(tenant).await?;
        items.retain(|item| item.matches(&needle));
        Ok(items)
    }

    /// Every item the tenant owns, ordered by name then id.
    pub async fn list_items(&self, tenant: &TenantId) -> CoreResult<Vec<Item>> {
        validate_tenant(tenant)?;

        let mut items = self
            .store
            .list(tenant)
            .await?
            .into_iter()
            .map(|item| ensure_owned(tenant, item))
            .collect::<CoreResult<Vec<_>>>()?;

        items.sort_by(|a, b| {
            a.item_name
                .to_lowercase()
                .cmp(&b.item_name.to_lowercase())
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        Ok(items)
    }

    pub async fn get_item(&self, tenant: &TenantId, item_id: &str) -> CoreResult<Item> {
        validate_tenant(tenant)?;
        let item_id = item_id.trim();

        let item = self
            .store
            .get(tenant, item_id)
            .await?
            .ok_or_else(|| CoreError::ItemNotFound(item_id.to_string()))?;

        ensure_owned(tenant, item)
    }

    /// Replaces the patched fields of an item.
    ///
    /// ## Errors
    /// - `ItemNotFound` if absent (or owned by someone else)
    /// - `DuplicateItemId` when renaming onto an existing id
    pub async fn update_item(
        &self,
        tenant: &TenantId,
        item_id: &str,
        patch: ItemPatch,
    ) -> CoreResult<Item> {
        validate_tenant(tenant)?;
        let item_id = item_id.trim();

        let patch = ItemPatch {
            item_id: patch.item_id.map(|s| s.trim().to_string()),
            item_name: patch.item_name.map(|s| s.trim().to_string()),
            brand_name: patch.brand_name.map(|s| s.trim().to_string()),
            ..patch
        };
        validate_patch(&patch)?;

        if patch.is_empty() {
            return self.get_item(tenant, item_id).await;
        }

        let updated = self.store.update(tenant, item_id, &patch).await?;
        ensure_owned(tenant, updated)
    }

    /// Removes an item from the catalog. Missing items are not an error.
    /// Sales that reference it are untouched.
    pub async fn delete_item(&self, tenant: &TenantId, item_id: &str) -> CoreResult<()> {
        validate_tenant(tenant)?;
        self.store.delete(tenant, item_id.trim()).await?;
        Ok(())
    }
}

fn ensure_owned(tenant: &TenantId, item: Item) -> CoreResult<Item> {
    if &item.owner_id != tenant {
        return Err(CoreError::scope("item", item.item_id, tenant.as_str()));
    }
    Ok(item)
}
