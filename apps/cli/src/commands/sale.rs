//! # Sale Commands
//!
//! `sell` records one sale; `sales` lists them.

use stockbook_core::pricing::suggested_sold_price;
use stockbook_core::report::day_range;
use stockbook_core::validation::{parse_amount, parse_quantity, validate_quantity_sold};
use tracing::{debug, info};

use super::{Context, SalesArgs, SellArgs};
use crate::output;

pub async fn sell(args: SellArgs, ctx: &Context) -> anyhow::Result<()> {
    let qty = parse_quantity("quantity_sold", Some(&args.qty), ctx.coercion)?;
    validate_quantity_sold(qty)?;

    let sold_price = match args.price.as_deref() {
        Some(raw) => parse_amount("sold_price", Some(raw), ctx.coercion)?,
        None => {
            let item = ctx.ledger.catalog().get_item(&ctx.tenant, &args.item_id).await?;
            let price = suggested_sold_price(&item, qty)?;
            debug!(item_id = %item.item_id, price = %price, "Using list price");
            price
        }
    };

    let sale = ctx
        .ledger
        .record_sale(&ctx.tenant, &args.item_id, qty, sold_price)
        .await?;
    info!(sale_id = %sale.id, item_id = %sale.item_id, "Sale recorded");

    if ctx.json {
        output::print_json(&sale)?;
    } else {
        output::print_sale(&sale, ctx.offset);
    }
    Ok(())
}

pub async fn list(args: SalesArgs, ctx: &Context) -> anyhow::Result<()> {
    let sales = if args.today {
        ctx.ledger
            .todays_sales(&ctx.tenant, ctx.today(), ctx.offset)
            .await?
    } else {
        let range = match (args.from, args.to) {
            (Some(from), Some(to)) => Some(day_range(from, to, ctx.offset)?),
            _ => None,
        };
        ctx.ledger.list_sales(&ctx.tenant, range).await?
    };

    if ctx.json {
        output::print_json(&sales)?;
    } else {
        output::print_sales(&sales, ctx.offset);
    }
    Ok(())
}
