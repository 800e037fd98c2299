//! # Validation Module
//!
//! Input validation and numeric parsing for Stockbook.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI / API (raw strings)                                      │
//! │  └── parse_amount / parse_quantity (strict or lenient)                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Catalog & Ledger (typed values)                              │
//! │  └── THIS MODULE: field rules, cost floor lives in the ledger          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store                                                        │
//! │  ├── PRIMARY KEY (tenant_id, item_id)                                  │
//! │  └── CHECK constraints on quantities and amounts                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Strict vs Lenient
//! A missing price and a price of zero are different things. In
//! [`CoercionMode::Strict`] (the default) a missing or non-numeric amount is a
//! field-level error. [`CoercionMode::Lenient`] treats it as zero, and must be
//! asked for explicitly.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::{Money, ParseMoneyError};
use crate::types::{ItemPatch, NewItem, TenantId};
use crate::{MAX_ITEM_ID_LEN, MAX_NAME_LEN, MAX_QUERY_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Coercion Mode
// =============================================================================

/// How to treat missing or non-numeric numeric input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionMode {
    /// Fail with a field-level error.
    #[default]
    Strict,
    /// Treat as zero. Negative or over-precise values are still rejected.
    Lenient,
}

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    // Names end up in single-line CSV rows
    if value.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain control characters".to_string(),
        });
    }

    Ok(())
}

/// Validates an item id.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - No whitespace or commas
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::validate_item_id;
///
/// assert!(validate_item_id("HAM-01").is_ok());
/// assert!(validate_item_id("").is_err());
/// assert!(validate_item_id("has space").is_err());
/// ```
pub fn validate_item_id(item_id: &str) -> ValidationResult<()> {
    validate_text("item_id", item_id, MAX_ITEM_ID_LEN)?;

    if item_id.trim().chars().any(|c| c.is_whitespace() || c == ',') {
        return Err(ValidationError::InvalidFormat {
            field: "item_id".to_string(),
            reason: "must not contain spaces or commas".to_string(),
        });
    }

    Ok(())
}

/// Validates an item name (1-200 characters).
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_text("item_name", name, MAX_NAME_LEN)
}

/// Validates a brand name (1-200 characters).
pub fn validate_brand_name(name: &str) -> ValidationResult<()> {
    validate_text("brand_name", name, MAX_NAME_LEN)
}

/// Validates a tenant identifier (non-empty).
pub fn validate_tenant(tenant: &TenantId) -> ValidationResult<()> {
    if tenant.is_empty() {
        return Err(ValidationError::required("tenant"));
    }
    Ok(())
}

/// Validates a search query.
///
/// ## Returns
/// The trimmed, lower-cased query. An empty string means "no results".
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_lowercase())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the quantity on a sale.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// ```text
/// stockbook sell HAM-01 --qty 0
///       │
///       ▼
/// validate_quantity_sold(0) ← THIS FUNCTION
///       │
///       └── qty <= 0? → Error: "quantity_sold must be positive"
/// ```
pub fn validate_quantity_sold(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity_sold".to_string(),
        });
    }

    Ok(())
}

/// Validates an on-hand stock count (>= 0).
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::negative("quantity"));
    }

    Ok(())
}

/// Validates a non-negative amount.
///
/// ## Example
/// ```rust
/// use stockbook_core::money::Money;
/// use stockbook_core::validation::validate_amount;
///
/// assert!(validate_amount("rate", Money::from_cents(1099)).is_ok());
/// assert!(validate_amount("rate", Money::zero()).is_ok());
/// assert!(validate_amount("rate", Money::from_cents(-100)).is_err());
/// ```
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::negative(field));
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates every field of a new item.
pub fn validate_new_item(item: &NewItem) -> ValidationResult<()> {
    validate_item_id(&item.item_id)?;
    validate_item_name(&item.item_name)?;
    validate_brand_name(&item.brand_name)?;
    validate_stock_quantity(item.quantity)?;
    validate_amount("rate", item.rate)?;
    validate_amount("mrp", item.mrp)?;
    validate_amount("taxes", item.taxes)?;
    Ok(())
}

/// Validates the fields present in a patch.
pub fn validate_patch(patch: &ItemPatch) -> ValidationResult<()> {
    if let Some(ref v) = patch.item_id {
        validate_item_id(v)?;
    }
    if let Some(ref v) = patch.item_name {
        validate_item_name(v)?;
    }
    if let Some(ref v) = patch.brand_name {
        validate_brand_name(v)?;
    }
    if let Some(v) = patch.quantity {
        validate_stock_quantity(v)?;
    }
    if let Some(v) = patch.rate {
        validate_amount("rate", v)?;
    }
    if let Some(v) = patch.mrp {
        validate_amount("mrp", v)?;
    }
    if let Some(v) = patch.taxes {
        validate_amount("taxes", v)?;
    }
    Ok(())
}

// =============================================================================
// Parsing Raw Input
// =============================================================================

/// Parses a raw monetary field.
///
/// ## Example
/// ```rust
/// use stockbook_core::money::Money;
/// use stockbook_core::validation::{parse_amount, CoercionMode};
///
/// assert_eq!(parse_amount("rate", Some("4.50"), CoercionMode::Strict), Ok(Money::from_cents(450)));
/// assert!(parse_amount("rate", None, CoercionMode::Strict).is_err());
/// assert_eq!(parse_amount("rate", None, CoercionMode::Lenient), Ok(Money::zero()));
/// ```
pub fn parse_amount(field: &str, raw: Option<&str>, mode: CoercionMode) -> ValidationResult<Money> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());

    let parsed = match raw {
        None => Err(ParseMoneyError::Empty),
        Some(s) => s.parse::<Money>(),
    };

    let amount = match (parsed, mode) {
        (Ok(amount), _) => amount,
        (Err(ParseMoneyError::Empty), CoercionMode::Strict) => {
            return Err(ValidationError::required(field));
        }
        (Err(ParseMoneyError::Overflow), _) => return Err(ValidationError::overflow(field)),
        (Err(e @ ParseMoneyError::TooManyDecimals), _) | (Err(e), CoercionMode::Strict) => {
            return Err(ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: e.to_string(),
            });
        }
        (Err(_), CoercionMode::Lenient) => Money::zero(),
    };

    validate_amount(field, amount)?;
    Ok(amount)
}

/// Parses a raw integer field.
///
/// Lenient mode turns missing or non-numeric input into zero; callers that
/// need a positive value validate afterwards.
pub fn parse_quantity(field: &str, raw: Option<&str>, mode: CoercionMode) -> ValidationResult<i64> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty());

    match (raw, mode) {
        (Some(s), mode) => match s.parse::<i64>() {
            Ok(v) => Ok(v),
            Err(_) if mode == CoercionMode::Lenient => Ok(0),
            Err(_) => Err(ValidationError::InvalidFormat {
                field: field.to_string(),
                reason: "not a whole number".to_string(),
            }),
        },
        (None, CoercionMode::Strict) => Err(ValidationError::required(field)),
        (None, CoercionMode::Lenient) => Ok(0),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_id() {
        assert!(validate_item_id("HAM-01").is_ok());
        assert!(validate_item_id("screw_4mm").is_ok());

        assert!(validate_item_id("").is_err());
        assert!(validate_item_id("   ").is_err());
        assert!(validate_item_id("has space").is_err());
        assert!(validate_item_id("a,b").is_err());
        assert!(validate_item_id(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_names() {
        assert!(validate_item_name("Claw Hammer, 16oz").is_ok());
        assert!(validate_item_name("").is_err());
        assert!(validate_brand_name(&"B".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_names_reject_control_characters() {
        assert!(matches!(
            validate_item_name("Claw\nHammer"),
            Err(ValidationError::InvalidFormat { ref field, .. }) if field == "item_name"
        ));
        assert!(validate_brand_name("Stan\tley").is_err());
        assert!(validate_item_name("Claw\r").is_ok(), "trailing control chars are trimmed");
    }

    #[test]
    fn test_validate_quantity_sold() {
        assert!(validate_quantity_sold(1).is_ok());
        assert!(validate_quantity_sold(10_000).is_ok());
        assert!(validate_quantity_sold(0).is_err());
        assert!(validate_quantity_sold(-1).is_err());
    }

    #[test]
    fn test_validate_stock_quantity() {
        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  HAMmer ").unwrap(), "hammer");
        assert_eq!(validate_search_query("   ").unwrap(), "");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_new_item_rejects_negative_taxes() {
        let item = NewItem {
            item_id: "X".into(),
            item_name: "Thing".into(),
            brand_name: "Acme".into(),
            quantity: 1,
            rate: Money::from_cents(100),
            mrp: Money::from_cents(200),
            taxes: Money::from_cents(-1),
        };
        assert_eq!(
            validate_new_item(&item),
            Err(ValidationError::Negative {
                field: "taxes".to_string()
            })
        );
    }

    #[test]
    fn test_parse_amount_strict() {
        assert_eq!(
            parse_amount("taxes", Some(""), CoercionMode::Strict),
            Err(ValidationError::required("taxes"))
        );
        assert!(matches!(
            parse_amount("taxes", Some("ten"), CoercionMode::Strict),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_amount("taxes", Some("1.234"), CoercionMode::Strict),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert_eq!(
            parse_amount("taxes", Some("-1"), CoercionMode::Strict),
            Err(ValidationError::negative("taxes"))
        );
    }

    #[test]
    fn test_parse_amount_lenient() {
        assert_eq!(
            parse_amount("taxes", Some("ten"), CoercionMode::Lenient),
            Ok(Money::zero())
        );
        assert_eq!(
            parse_amount("taxes", Some("2.5"), CoercionMode::Lenient),
            Ok(Money::from_cents(250))
        );
        // Negative is malformed business data, not missing data
        assert!(parse_amount("taxes", Some("-2"), CoercionMode::Lenient).is_err());
        // So is more precision than cents
        assert!(matches!(
            parse_amount("taxes", Some("1.234"), CoercionMode::Lenient),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("quantity", Some("3"), CoercionMode::Strict), Ok(3));
        assert!(parse_quantity("quantity", Some("3.5"), CoercionMode::Strict).is_err());
        assert!(parse_quantity("quantity", None, CoercionMode::Strict).is_err());
        assert_eq!(parse_quantity("quantity", None, CoercionMode::Lenient), Ok(0));
    }
}
