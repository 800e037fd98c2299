//! # Error Types
//!
//! Domain-specific error types for stockbook-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockbook-core errors (this file)                                     │
//! │  ├── CoreError        - What catalog/ledger/report/export return       │
//! │  ├── ValidationError  - Field-level input failures                     │
//! │  └── StoreError       - The store contract's failures                  │
//! │                                                                         │
//! │  stockbook-db errors (separate crate)                                  │
//! │  └── DbError          - SQLite failures, mapped into StoreError        │
//! │                                                                         │
//! │  Flow: DbError → StoreError → CoreError → CLI (anyhow)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Retry Policy
//! Only [`CoreError::TransientStore`] is retryable. Validation and scope
//! errors go straight back to the caller with the offending field named.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input failed validation (bad field, sold below cost, ...).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Item does not exist for this tenant.
    ///
    /// ## When This Occurs
    /// - Item id was never added
    /// - Item was deleted
    /// - Item belongs to a different tenant (indistinguishable on purpose)
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// Item id already exists for this tenant.
    #[error("Item id '{0}' already exists")]
    DuplicateItemId(String),

    /// A record owned by another tenant reached this tenant's call.
    ///
    /// ## When This Occurs
    /// The store returned a record whose owner differs from the tenant the
    /// caller asked for. The record is never handed out.
    #[error("Scope violation: {entity} '{id}' is not owned by tenant '{tenant}'")]
    ScopeViolation {
        entity: String,
        id: String,
        tenant: String,
    },

    /// Store I/O failed. Safe to retry for reads.
    #[error("Store unavailable: {0}")]
    TransientStore(String),

    /// Export was requested for an empty sale collection.
    #[error("Nothing to export: the sale collection is empty")]
    EmptyExport,

    /// CSV writer failed.
    #[error("Export failed: {0}")]
    Export(String),
}

impl CoreError {
    /// Whether the failed operation may be retried as-is.
    ///
    /// `record_sale` must still not be retried blindly: a retried append
    /// records the sale twice.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::TransientStore(_))
    }

    pub(crate) fn scope(entity: &str, id: impl Into<String>, tenant: impl Into<String>) -> Self {
        CoreError::ScopeViolation {
            entity: entity.to_string(),
            id: id.into(),
            tenant: tenant.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Every variant names the field so the caller can fix the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (non-numeric amount, too many decimals, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Sale price is lower than the item's unit cost.
    #[error("sold below cost: sold price {sold_price} is less than item cost {item_cost}")]
    SoldBelowCost { sold_price: Money, item_cost: Money },

    /// Arithmetic on an amount left the representable range.
    #[error("{field} is too large")]
    AmountOverflow { field: String },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub(crate) fn negative(field: &str) -> Self {
        ValidationError::Negative {
            field: field.to_string(),
        }
    }

    pub(crate) fn overflow(field: &str) -> Self {
        ValidationError::AmountOverflow {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Store Error
// =============================================================================

/// Failures reported by an [`ItemStore`](crate::store::ItemStore) or
/// [`SaleStore`](crate::store::SaleStore) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `(tenant, item_id)` is already taken.
    #[error("Duplicate item id: {0}")]
    DuplicateItemId(String),

    /// No record for `(tenant, id)`.
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O or backend failure; retryable.
    #[error("{0}")]
    Unavailable(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateItemId(id) => CoreError::DuplicateItemId(id),
            StoreError::NotFound(id) => CoreError::ItemNotFound(id),
            StoreError::Unavailable(msg) => CoreError::TransientStore(msg),
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
