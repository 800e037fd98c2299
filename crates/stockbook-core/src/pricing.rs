//! # Pricing
//!
//! Pure functions deriving tax-inclusive rates and line totals.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  rate ──┐                                                     │
//! │         ├──► rate_with_tax ──► Sale.rate_with_tax (snapshot)  │
//! │  taxes ─┘                                                     │
//! │                                                               │
//! │  mrp × qty ──► suggested_sold_price ──► sell form default     │
//! │                     (never trusted: the ledger re-validates)  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! `taxes` is a flat per-unit amount added to the rate, not a percentage.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Item;
use crate::validation::{parse_amount, validate_amount, CoercionMode, ValidationResult};

/// Tax-inclusive unit rate: `rate + taxes`.
///
/// ## Errors
/// - `Negative` if either input is below zero
/// - `AmountOverflow` if the sum leaves the `i64` range
pub fn rate_with_tax(rate: Money, taxes: Money) -> ValidationResult<Money> {
    validate_amount("rate", rate)?;
    validate_amount("taxes", taxes)?;

    rate.checked_add(taxes)
        .ok_or_else(|| ValidationError::overflow("rate_with_tax"))
}

/// Same as [`rate_with_tax`], from raw text input.
///
/// ## Example
/// ```rust
/// use stockbook_core::pricing::rate_with_tax_from_input;
/// use stockbook_core::validation::CoercionMode;
///
/// let strict = rate_with_tax_from_input(Some("10.00"), Some(""), CoercionMode::Strict);
/// assert!(strict.is_err());
///
/// let lenient = rate_with_tax_from_input(Some("10.00"), Some(""), CoercionMode::Lenient).unwrap();
/// assert_eq!(lenient.to_decimal_string(), "10.00");
/// ```
pub fn rate_with_tax_from_input(
    rate: Option<&str>,
    taxes: Option<&str>,
    mode: CoercionMode,
) -> ValidationResult<Money> {
    let rate = parse_amount("rate", rate, mode)?;
    let taxes = parse_amount("taxes", taxes, mode)?;
    rate_with_tax(rate, taxes)
}

/// `unit_price × quantity`.
pub fn line_total(unit_price: Money, quantity: i64) -> ValidationResult<Money> {
    unit_price
        .checked_mul_quantity(quantity)
        .ok_or_else(|| ValidationError::overflow("line_total"))
}

/// Default sold price for a sale of `quantity` units: the item's list price
/// times the quantity.
pub fn suggested_sold_price(item: &Item, quantity: i64) -> ValidationResult<Money> {
    line_total(item.mrp, quantity)
}

/// Margin per unit at list price: `mrp - (rate + taxes)`. May be negative.
pub fn unit_profit(item: &Item) -> ValidationResult<Money> {
    let cost = rate_with_tax(item.rate, item.taxes)?;
    item.mrp
        .checked_sub(cost)
        .ok_or_else(|| ValidationError::overflow("unit_profit"))
}

/// Profit of one sale: `sold_price - rate_with_tax × quantity_sold`.
pub fn sale_profit(sold_price: Money, rate_with_tax: Money, quantity_sold: i64) -> ValidationResult<Money> {
    let cost = line_total(rate_with_tax, quantity_sold)?;
    sold_price
        .checked_sub(cost)
        .ok_or_else(|| ValidationError::overflow("profit"))
}
