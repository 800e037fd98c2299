//! # stockbook-core: Pure Business Logic for Stockbook
//!
//! This crate is the **heart** of Stockbook. It keeps catalog items and sale
//! records consistent, derives monetary values and rolls sale history up
//! into reports. It performs no I/O itself: storage is reached through the
//! [`store`] traits.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/cli (stockbook)                         │   │
//! │  │    item add ──► sell ──► report ──► export                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ tenant + arguments                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockbook-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │  catalog  │  │  ledger   │  │  report   │  │   │
//! │  │   │ RateWith  │  │ ItemStore │  │ SaleStore │  │  Daily    │  │   │
//! │  │   │   Tax     │  │  search   │  │  append   │  │  rollups  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • STORES ARE TRAITS • INTEGER MONEY                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockbook-db (Database Layer)                   │   │
//! │  │          SQLite repositories implementing the store traits      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, Sale, TenantId, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation and strict/lenient numeric parsing
//! - [`pricing`] - Tax-inclusive rate and line totals
//! - [`store`] - Persistence contracts
//! - [`memory`] - In-memory store implementation
//! - [`catalog`] - Tenant-scoped item CRUD and search
//! - [`ledger`] - Append-only sale recording
//! - [`report`] - Daily/monthly rollups
//! - [`export`] - CSV export
//!
//! ## Example Usage
//!
//! ```rust
//! use stockbook_core::money::Money;
//! use stockbook_core::pricing::rate_with_tax;
//!
//! let rate = Money::from_cents(1000); // 10.00
//! let taxes = Money::from_cents(150); // 1.50 flat per unit
//!
//! let total = rate_with_tax(rate, taxes).unwrap();
//! assert_eq!(total.to_decimal_string(), "11.50");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod export;
pub mod ledger;
pub mod memory;
pub mod money;
pub mod pricing;
pub mod report;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::ItemCatalog;
pub use error::{CoreError, CoreResult, StoreError, ValidationError};
pub use ledger::SalesLedger;
pub use memory::MemoryStore;
pub use money::Money;
pub use report::{ReportPeriod, SalesReport};
pub use store::{ItemStore, SaleStore};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of an item id.
pub const MAX_ITEM_ID_LEN: usize = 50;

/// Maximum length of item and brand names.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of a catalog search query.
pub const MAX_QUERY_LEN: usize = 100;
