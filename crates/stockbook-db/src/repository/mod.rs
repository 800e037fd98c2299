//! # Repository Module
//!
//! SQLite implementations of the stockbook-core store contracts.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  ItemCatalog / SalesLedger (stockbook-core)                            │
//! │       │                                                                 │
//! │       │  ItemStore::list(tenant) / SaleStore::append(draft)            │
//! │       ▼                                                                 │
//! │  ItemRepository                  SaleRepository                        │
//! │  ├── list_for(tenant)            ├── list_for(tenant, range)           │
//! │  ├── get_by_id(tenant, id)       ├── get_by_id(tenant, id)             │
//! │  ├── insert(item)                └── insert(draft)                     │
//! │  ├── apply_patch(tenant, id, p)                                        │
//! │  └── delete_by_id(tenant, id)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (every query filters on tenant_id)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod item;
pub mod sale;
