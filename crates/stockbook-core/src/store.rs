//! # Store Contracts
//!
//! The persistence boundary. Catalog and ledger only ever talk to these
//! traits; `stockbook-db` implements them over SQLite and
//! [`MemoryStore`](crate::memory::MemoryStore) implements them in memory.
//!
//! ## Contract
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  ItemStore                                                           │
//! │  ├── list(tenant)                  → every item the tenant owns      │
//! │  ├── get(tenant, item_id)          → Option<Item>                    │
//! │  ├── create(item)                  → Item | DuplicateItemId (atomic) │
//! │  ├── update(tenant, item_id, patch)→ Item | NotFound | Duplicate     │
//! │  └── delete(tenant, item_id)       → () even when absent             │
//! │                                                                      │
//! │  SaleStore (append-only)                                             │
//! │  ├── list(tenant, range?)          → Sales, oldest first             │
//! │  └── append(draft)                 → Sale with assigned id           │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Implementations must filter by tenant themselves; the ledger still
//! checks ownership of everything it gets back.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{DateRange, Item, ItemPatch, Sale, SaleDraft, TenantId};

/// Tenant-scoped item persistence.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn list(&self, tenant: &TenantId) -> StoreResult<Vec<Item>>;

    async fn get(&self, tenant: &TenantId, item_id: &str) -> StoreResult<Option<Item>>;

    /// Inserts `item`. Two concurrent creates of the same `(owner, item_id)`
    /// must leave exactly one winner; the loser gets `DuplicateItemId`.
    async fn create(&self, item: Item) -> StoreResult<Item>;

    async fn update(&self, tenant: &TenantId, item_id: &str, patch: &ItemPatch) -> StoreResult<Item>;

    async fn delete(&self, tenant: &TenantId, item_id: &str) -> StoreResult<()>;
}

/// Append-only sale persistence. No update or delete exists.
#[async_trait]
pub trait SaleStore: Send + Sync {
    async fn list(&self, tenant: &TenantId, range: Option<DateRange>) -> StoreResult<Vec<Sale>>;

    /// Persists the whole draft or nothing.
    async fn append(&self, draft: SaleDraft) -> StoreResult<Sale>;
}
