//! # Report Commands
//!
//! Monthly/all-time reports, CSV export and the dashboard summary.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Serialize;
use stockbook_core::export::write_csv;
use stockbook_core::report::{export_file_name, sales_by_item, ItemSalesTotal};
use stockbook_core::{Money, SalesReport};
use tracing::info;

use super::{Context, ExportArgs, PeriodArgs};
use crate::output;

/// Number of best sellers shown on the dashboard.
const TOP_ITEMS: usize = 5;

pub async fn report(args: PeriodArgs, ctx: &Context) -> anyhow::Result<()> {
    let report = ctx
        .ledger
        .get_report(&ctx.tenant, args.period()?, ctx.offset)
        .await?;

    if ctx.json {
        output::print_json(&report)?;
    } else {
        output::print_report(&report);
    }
    Ok(())
}

pub async fn export(args: ExportArgs, ctx: &Context) -> anyhow::Result<()> {
    let period = args.period.period()?;
    let range = period.map(|p| p.date_range(ctx.offset)).transpose()?;
    let sales = ctx.ledger.list_sales(&ctx.tenant, range).await?;

    let target = args
        .out
        .unwrap_or_else(|| PathBuf::from(export_file_name(period.as_ref())));

    if target == Path::new("-") {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        write_csv(&sales, &mut lock)?;
        lock.flush()?;
        return Ok(());
    }

    // Build in memory first so an empty export leaves no file behind.
    let mut buf = Vec::new();
    write_csv(&sales, &mut buf)?;

    let file = File::create(&target)
        .with_context(|| format!("creating {}", target.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&buf)?;
    writer.flush()?;

    info!(path = %target.display(), rows = sales.len(), "Sales exported");
    if ctx.json {
        output::print_json(&serde_json::json!({
            "path": target,
            "rows": sales.len(),
        }))?;
    } else {
        println!("Exported {} sales to {}", sales.len(), target.display());
    }
    Ok(())
}

/// What the dashboard shows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub item_count: usize,
    pub todays_sale_count: usize,
    pub todays_sales: Money,
    pub report: SalesReport,
    pub top_items: Vec<ItemSalesTotal>,
}

pub async fn dashboard(ctx: &Context) -> anyhow::Result<()> {
    let items = ctx.ledger.catalog().list_items(&ctx.tenant).await?;
    let sales = ctx.ledger.list_sales(&ctx.tenant, None).await?;
    let today = ctx
        .ledger
        .todays_sales(&ctx.tenant, ctx.today(), ctx.offset)
        .await?;
    let report = ctx.ledger.get_report(&ctx.tenant, None, ctx.offset).await?;

    let todays_total = today
        .iter()
        .try_fold(Money::zero(), |acc, s| acc.checked_add(s.sold_price))
        .context("today's total overflowed")?;

    let mut top_items = sales_by_item(&sales)?;
    top_items.truncate(TOP_ITEMS);

    let dashboard = Dashboard {
        item_count: items.len(),
        todays_sale_count: today.len(),
        todays_sales: todays_total,
        report,
        top_items,
    };

    if ctx.json {
        return output::print_json(&dashboard);
    }

    println!("Items in catalog: {}", dashboard.item_count);
    println!(
        "Today:            {} sales, {}",
        dashboard.todays_sale_count,
        dashboard.todays_sales.to_decimal_string()
    );
    println!();
    output::print_report(&SalesReport {
        daily_report: Vec::new(),
        ..dashboard.report
    });
    if !dashboard.top_items.is_empty() {
        println!();
        output::print_item_totals(&dashboard.top_items);
    }
    Ok(())
}
