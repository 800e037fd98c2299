//! # Domain Types
//!
//! Core domain types used throughout Stockbook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │      Sale       │   │    TenantId     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  item_id        │   │  id (UUID)      │   │  opaque string  │       │
//! │  │  item_name      │   │  *_snapshot     │   │  supplied by    │       │
//! │  │  rate / mrp     │   │  sold_price     │   │  the caller     │       │
//! │  │  taxes          │   │  rate_with_tax  │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  NewItem ──► Item ◄── ItemPatch        SaleDraft ──► Sale               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A Sale copies name, brand, cost and tax-inclusive rate from its Item at
//! the moment it is recorded. Editing or deleting the Item later never
//! changes the Sale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Tenant
// =============================================================================

/// Opaque, already-authenticated tenant identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Wraps a tenant identifier. Surrounding whitespace is trimmed.
    pub fn new(id: impl Into<String>) -> Self {
        TenantId(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TenantId {
    fn from(s: &str) -> Self {
        TenantId::new(s)
    }
}

// =============================================================================
// Item
// =============================================================================

/// A catalog entry owned by exactly one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Business identifier, unique within the owning tenant.
    pub item_id: String,

    pub item_name: String,

    pub brand_name: String,

    /// On-hand count. Not decremented by sales.
    pub quantity: i64,

    /// Unit cost.
    pub rate: Money,

    /// Unit list/retail price.
    pub mrp: Money,

    /// Flat per-unit tax amount, added to `rate`.
    pub taxes: Money,

    pub owner_id: TenantId,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Builds a stored item from validated input.
    pub fn from_new(owner_id: TenantId, new: NewItem, now: DateTime<Utc>) -> Self {
        Item {
            item_id: new.item_id,
            item_name: new.item_name,
            brand_name: new.brand_name,
            quantity: new.quantity,
            rate: new.rate,
            mrp: new.mrp,
            taxes: new.taxes,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies every `Some` field of `patch`; leaves the rest untouched.
    pub fn apply(&mut self, patch: &ItemPatch, now: DateTime<Utc>) {
        if let Some(ref v) = patch.item_id {
            self.item_id = v.clone();
        }
        if let Some(ref v) = patch.item_name {
            self.item_name = v.clone();
        }
        if let Some(ref v) = patch.brand_name {
            self.brand_name = v.clone();
        }
        if let Some(v) = patch.quantity {
            self.quantity = v;
        }
        if let Some(v) = patch.rate {
            self.rate = v;
        }
        if let Some(v) = patch.mrp {
            self.mrp = v;
        }
        if let Some(v) = patch.taxes {
            self.taxes = v;
        }
        self.updated_at = now;
    }

    /// Case-insensitive substring match on id or name.
    pub fn matches(&self, needle_lowercase: &str) -> bool {
        self.item_id.to_lowercase().contains(needle_lowercase)
            || self.item_name.to_lowercase().contains(needle_lowercase)
    }
}

/// Input for adding an item to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub item_id: String,
    pub item_name: String,
    pub brand_name: String,
    pub quantity: i64,
    pub rate: Money,
    pub mrp: Money,
    pub taxes: Money,
}

/// Partial update for an item. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub item_id: Option<String>,
    pub item_name: Option<String>,
    pub brand_name: Option<String>,
    pub quantity: Option<i64>,
    pub rate: Option<Money>,
    pub mrp: Option<Money>,
    pub taxes: Option<Money>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self == &ItemPatch::default()
    }
}

// =============================================================================
// Sale
// =============================================================================

/// An immutable record of one completed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    /// Assigned by the store (UUID v4).
    pub id: String,

    pub item_id: String,

    /// Item name at time of sale (frozen).
    pub item_name: String,

    /// Brand at time of sale (frozen).
    pub brand_name: String,

    pub quantity_sold: i64,

    /// Total amount charged for the whole transaction.
    pub sold_price: Money,

    /// Item `rate` at time of sale (frozen).
    pub item_cost: Money,

    /// Item `rate + taxes` at time of sale (frozen).
    pub rate_with_tax: Money,

    pub sold_at: DateTime<Utc>,

    pub owner_id: TenantId,
}

impl Sale {
    /// Attaches the store-assigned id to a draft.
    pub fn from_draft(id: String, draft: SaleDraft) -> Self {
        Sale {
            id,
            item_id: draft.item_id,
            item_name: draft.item_name,
            brand_name: draft.brand_name,
            quantity_sold: draft.quantity_sold,
            sold_price: draft.sold_price,
            item_cost: draft.item_cost,
            rate_with_tax: draft.rate_with_tax,
            sold_at: draft.sold_at,
            owner_id: draft.owner_id,
        }
    }
}

/// A validated sale waiting for the store to assign its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleDraft {
    pub item_id: String,
    pub item_name: String,
    pub brand_name: String,
    pub quantity_sold: i64,
    pub sold_price: Money,
    pub item_cost: Money,
    pub rate_with_tax: Money,
    pub sold_at: DateTime<Utc>,
    pub owner_id: TenantId,
}

// =============================================================================
// Date Range
// =============================================================================

/// Half-open `[start, end)` range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        DateRange { start, end }
    }

    #[inline]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_item() -> Item {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        Item::from_new(
            TenantId::new("shop-a"),
            NewItem {
                item_id: "HAM-01".into(),
                item_name: "Claw Hammer".into(),
                brand_name: "Stanley".into(),
                quantity: 10,
                rate: Money::from_cents(1200),
                mrp: Money::from_cents(1800),
                taxes: Money::from_cents(100),
            },
            now,
        )
    }

    #[test]
    fn test_tenant_id_trims() {
        assert_eq!(TenantId::new("  a@b.c ").as_str(), "a@b.c");
        assert!(TenantId::new("   ").is_empty());
    }

    #[test]
    fn test_apply_patch_only_touches_patched_fields() {
        let mut item = sample_item();
        let later = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
        let patch = ItemPatch {
            mrp: Some(Money::from_cents(1900)),
            ..ItemPatch::default()
        };

        item.apply(&patch, later);

        assert_eq!(item.mrp, Money::from_cents(1900));
        assert_eq!(item.rate, Money::from_cents(1200));
        assert_eq!(item.item_name, "Claw Hammer");
        assert_eq!(item.updated_at, later);
        assert!(item.created_at < later);
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let item = sample_item();
        assert!(item.matches("hammer"));
        assert!(item.matches("ham-0"));
        assert!(!item.matches("saw"));
    }

    #[test]
    fn test_date_range_is_half_open() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let range = DateRange::new(start, end);

        assert!(range.contains(start));
        assert!(!range.contains(end));
    }

    #[test]
    fn test_empty_patch() {
        assert!(ItemPatch::default().is_empty());
        assert!(!ItemPatch {
            quantity: Some(0),
            ..ItemPatch::default()
        }
        .is_empty());
    }
}
