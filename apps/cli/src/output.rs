//! # Output
//!
//! Plain-text tables for humans, pretty JSON for `--json`.

use chrono::FixedOffset;
use serde::Serialize;
use stockbook_core::pricing::unit_profit;
use stockbook_core::report::ItemSalesTotal;
use stockbook_core::{Item, Money, Sale, SalesReport};

/// Prints any serializable value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn amount(m: Money) -> String {
    m.to_decimal_string()
}

pub fn print_item(item: &Item) {
    println!("{} ({})", item.item_name, item.item_id);
    println!("  brand:    {}", item.brand_name);
    println!("  quantity: {}", item.quantity);
    println!("  rate:     {}", amount(item.rate));
    println!("  mrp:      {}", amount(item.mrp));
    println!("  taxes:    {}", amount(item.taxes));
}

pub fn print_items(items: &[Item]) {
    if items.is_empty() {
        println!("No items.");
        return;
    }

    println!(
        "{:<16} {:<28} {:<16} {:>6} {:>10} {:>10} {:>8} {:>10}",
        "ID", "NAME", "BRAND", "QTY", "RATE", "MRP", "TAXES", "MARGIN"
    );
    for item in items {
        // Margin is informational; an overflow just shows as "-".
        let margin = unit_profit(item).map(amount).unwrap_or_else(|_| "-".into());
        println!(
            "{:<16} {:<28} {:<16} {:>6} {:>10} {:>10} {:>8} {:>10}",
            truncate(&item.item_id, 16),
            truncate(&item.item_name, 28),
            truncate(&item.brand_name, 16),
            item.quantity,
            amount(item.rate),
            amount(item.mrp),
            amount(item.taxes),
            margin,
        );
    }
}

pub fn print_sale(sale: &Sale, offset: FixedOffset) {
    println!(
        "Sold {} × {} ({}) for {} at {}",
        sale.quantity_sold,
        sale.item_name,
        sale.item_id,
        amount(sale.sold_price),
        sale.sold_at.with_timezone(&offset).format("%Y-%m-%d %H:%M"),
    );
    println!("  sale id: {}", sale.id);
}

pub fn print_sales(sales: &[Sale], offset: FixedOffset) {
    if sales.is_empty() {
        println!("No sales.");
        return;
    }

    println!(
        "{:<17} {:<16} {:<28} {:>5} {:>10} {:>10}",
        "WHEN", "ITEM", "NAME", "QTY", "PRICE", "COST+TAX"
    );
    for sale in sales {
        println!(
            "{:<17} {:<16} {:<28} {:>5} {:>10} {:>10}",
            sale.sold_at.with_timezone(&offset).format("%Y-%m-%d %H:%M"),
            truncate(&sale.item_id, 16),
            truncate(&sale.item_name, 28),
            sale.quantity_sold,
            amount(sale.sold_price),
            amount(sale.rate_with_tax),
        );
    }
}

pub fn print_report(report: &SalesReport) {
    println!("Total sales:     {}", amount(report.total_sales));
    println!("Total profit:    {}", amount(report.total_profit));
    println!("Average per day: {}", amount(report.running_average_sale));

    if report.daily_report.is_empty() {
        return;
    }

    println!();
    println!("{:<12} {:>12} {:>12}", "DATE", "SALES", "PROFIT");
    for day in &report.daily_report {
        println!(
            "{:<12} {:>12} {:>12}",
            day.date.format("%Y-%m-%d"),
            amount(day.sales),
            amount(day.profit),
        );
    }
}

pub fn print_item_totals(totals: &[ItemSalesTotal]) {
    println!("{:<28} {:>6} {:>12}", "ITEM", "QTY", "TOTAL");
    for t in totals {
        println!(
            "{:<28} {:>6} {:>12}",
            truncate(&t.item_name, 28),
            t.quantity_sold,
            amount(t.total)
        );
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hammer", 10), "Hammer");
        assert_eq!(truncate("Claw Hammer", 5), "Claw…");
        assert_eq!(truncate("", 3), "");
    }
}
