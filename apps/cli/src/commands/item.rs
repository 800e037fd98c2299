//! # Item Commands
//!
//! Catalog maintenance: add, list, search, update, delete.

use stockbook_core::validation::{parse_amount, parse_quantity, CoercionMode};
use stockbook_core::{ItemPatch, NewItem, ValidationError};
use tracing::info;

use super::{Context, ItemCommand, ItemFields};
use crate::output;

pub async fn run(command: ItemCommand, ctx: &Context) -> anyhow::Result<()> {
    let catalog = ctx.ledger.catalog();

    match command {
        ItemCommand::Add(fields) => {
            let new = new_item_from(&fields, ctx.coercion)?;
            let item = catalog.add_item(&ctx.tenant, new).await?;
            info!(item_id = %item.item_id, "Item added");

            if ctx.json {
                output::print_json(&item)?;
            } else {
                println!("Added:");
                output::print_item(&item);
            }
        }

        ItemCommand::List => {
            let items = catalog.list_items(&ctx.tenant).await?;
            if ctx.json {
                output::print_json(&items)?;
            } else {
                output::print_items(&items);
            }
        }

        ItemCommand::Search { query } => {
            let items = catalog.search_items(&ctx.tenant, &query).await?;
            if ctx.json {
                output::print_json(&items)?;
            } else {
                output::print_items(&items);
            }
        }

        ItemCommand::Update { item_id, fields } => {
            let patch = patch_from(&fields, ctx.coercion)?;
            let item = catalog.update_item(&ctx.tenant, &item_id, patch).await?;
            info!(item_id = %item.item_id, "Item updated");

            if ctx.json {
                output::print_json(&item)?;
            } else {
                println!("Updated:");
                output::print_item(&item);
            }
        }

        ItemCommand::Delete { item_id } => {
            catalog.delete_item(&ctx.tenant, &item_id).await?;
            info!(item_id = %item_id, "Item deleted");

            if ctx.json {
                output::print_json(&serde_json::json!({ "deleted": item_id }))?;
            } else {
                println!("Deleted {item_id}");
            }
        }
    }

    Ok(())
}

/// Builds a full item from command-line fields. A missing id or name is left
/// empty so catalog validation names the field.
fn new_item_from(fields: &ItemFields, mode: CoercionMode) -> Result<NewItem, ValidationError> {
    Ok(NewItem {
        item_id: fields.id.clone().unwrap_or_default(),
        item_name: fields.name.clone().unwrap_or_default(),
        brand_name: fields.brand.clone().unwrap_or_default(),
        quantity: parse_quantity("quantity", fields.qty.as_deref(), mode)?,
        rate: parse_amount("rate", fields.rate.as_deref(), mode)?,
        mrp: parse_amount("mrp", fields.mrp.as_deref(), mode)?,
        taxes: parse_amount("taxes", fields.taxes.as_deref(), mode)?,
    })
}

/// Only the flags that were given end up in the patch.
fn patch_from(fields: &ItemFields, mode: CoercionMode) -> Result<ItemPatch, ValidationError> {
    let amount = |field: &str, raw: &Option<String>| {
        raw.as_deref()
            .map(|s| parse_amount(field, Some(s), mode))
            .transpose()
    };

    Ok(ItemPatch {
        item_id: fields.id.clone(),
        item_name: fields.name.clone(),
        brand_name: fields.brand.clone(),
        quantity: fields
            .qty
            .as_deref()
            .map(|s| parse_quantity("quantity", Some(s), mode))
            .transpose()?,
        rate: amount("rate", &fields.rate)?,
        mrp: amount("mrp", &fields.mrp)?,
        taxes: amount("taxes", &fields.taxes)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockbook_core::Money;

    fn fields() -> ItemFields {
        ItemFields {
            id: Some("HAM-01".into()),
            name: Some("Claw Hammer".into()),
            brand: Some("Stanley".into()),
            qty: Some("10".into()),
            rate: Some("12.00".into()),
            mrp: Some("18".into()),
            taxes: Some("1.5".into()),
        }
    }

    #[test]
    fn test_new_item_from_fields() {
        let new = new_item_from(&fields(), CoercionMode::Strict).unwrap();
        assert_eq!(new.item_id, "HAM-01");
        assert_eq!(new.quantity, 10);
        assert_eq!(new.rate, Money::from_cents(1200));
        assert_eq!(new.mrp, Money::from_cents(1800));
        assert_eq!(new.taxes, Money::from_cents(150));
    }

    #[test]
    fn test_new_item_strict_rejects_garbage() {
        let mut f = fields();
        f.rate = Some("twelve".into());
        let err = new_item_from(&f, CoercionMode::Strict).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { ref field, .. } if field == "rate"));
    }

    #[test]
    fn test_new_item_lenient_zeroes_garbage_and_missing() {
        let mut f = fields();
        f.rate = Some("twelve".into());
        f.taxes = None;
        let new = new_item_from(&f, CoercionMode::Lenient).unwrap();
        assert_eq!(new.rate, Money::zero());
        assert_eq!(new.taxes, Money::zero());
    }

    #[test]
    fn test_new_item_missing_id_left_empty() {
        let mut f = fields();
        f.id = None;
        let new = new_item_from(&f, CoercionMode::Strict).unwrap();
        assert_eq!(new.item_id, "");
    }

    #[test]
    fn test_patch_only_given_fields() {
        let f = ItemFields {
            mrp: Some("19.99".into()),
            ..Default::default()
        };
        let patch = patch_from(&f, CoercionMode::Strict).unwrap();
        assert_eq!(
            patch,
            ItemPatch {
                mrp: Some(Money::from_cents(1999)),
                ..Default::default()
            }
        );
        assert!(patch_from(&ItemFields::default(), CoercionMode::Strict)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_patch_rejects_negative_even_when_lenient() {
        let f = ItemFields {
            taxes: Some("-1".into()),
            ..Default::default()
        };
        assert!(matches!(
            patch_from(&f, CoercionMode::Lenient),
            Err(ValidationError::Negative { .. })
        ));
    }
}
