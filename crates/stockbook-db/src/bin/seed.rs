//! # Seed Data Generator
//!
//! Populates the database with a demo catalog and sale history.
//!
//! ## Usage
//! ```bash
//! # Seed tenant "demo" with 90 days of sales
//! cargo run -p stockbook-db --bin seed
//!
//! # Custom tenant, history length and database
//! cargo run -p stockbook-db --bin seed -- --tenant shop-a --days 30 --db ./data/stockbook.db
//! ```
//!
//! ## Generated Data
//! - A hardware-store catalog: `{CATEGORY}-{INDEX}` ids, rates $1.00 - $40.00
//! - A few sales per day, priced between cost and list price
//!
//! Sales go through `SalesLedger`, so every seeded row obeys the same rules
//! as a real one.

use chrono::{Duration, Utc};
use std::env;
use std::sync::Arc;
use stockbook_core::{Money, NewItem, SalesLedger, TenantId};
use stockbook_db::{Database, DbConfig};

/// Catalog categories for realistic demo data
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "HND",
        "Stanley",
        &["Claw Hammer", "Hand Saw", "Tape Measure", "Utility Knife", "Chisel Set"],
    ),
    (
        "FST",
        "Hillman",
        &["Wood Screws", "Drywall Anchors", "Hex Bolts, M6", "Washers", "Wall Plugs"],
    ),
    (
        "PNT",
        "Dulux",
        &["Interior Emulsion", "Gloss White", "Primer", "Paint Roller", "Masking Tape"],
    ),
    (
        "ELC",
        "Philips",
        &["LED Bulb", "Extension Lead", "Cable Ties", "Fuse Pack", "Torch"],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut days: i64 = 90;
    let mut tenant = String::from("demo");
    let mut db_path = String::from("./stockbook_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" | "-n" => {
                if i + 1 < args.len() {
                    days = args[i + 1].parse().unwrap_or(90);
                    i += 1;
                }
            }
            "--tenant" | "-t" => {
                if i + 1 < args.len() {
                    tenant = args[i + 1].clone();
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Stockbook Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --days <N>       Days of sale history (default: 90)");
                println!("  -t, --tenant <ID>    Tenant to seed (default: demo)");
                println!("  -d, --db <PATH>      Database file path (default: ./stockbook_dev.db)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Stockbook Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Tenant:   {}", tenant);
    println!("Days:     {}", days);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let tenant = TenantId::new(tenant);
    let ledger = SalesLedger::new(Arc::new(db.items()), Arc::new(db.sales()));

    if !ledger.catalog().list_items(&tenant).await?.is_empty() {
        println!("⚠ Tenant already has items");
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    // Catalog
    println!();
    println!("Generating catalog...");

    let mut items = Vec::new();
    for (category_idx, (code, brand, names)) in CATEGORIES.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            let seed = (category_idx * 10 + name_idx) as i64;
            let new = generate_item(code, brand, name, seed);

            match ledger.catalog().add_item(&tenant, new).await {
                Ok(item) => items.push(item),
                Err(e) => eprintln!("Failed to add {}: {}", name, e),
            }
        }
    }
    println!("✓ Added {} items", items.len());

    if items.is_empty() {
        return Ok(());
    }

    // History
    println!();
    println!("Generating sales...");

    let start = std::time::Instant::now();
    let now = Utc::now();
    let mut recorded = 0;

    for day in 0..days {
        let per_day = 1 + (day * 7 % 5);
        for n in 0..per_day {
            let seed = (day * 31 + n * 17) as usize;
            let item = &items[seed % items.len()];
            let qty = 1 + (seed % 4) as i64;

            // Somewhere between cost and list price
            let spread = item.mrp.cents().saturating_sub(item.rate.cents()).max(0);
            let unit = item.rate.cents() + spread * ((seed % 5) as i64) / 4;
            let sold_price = Money::from_cents(unit * qty);

            let sold_at = now - Duration::days(days - day) + Duration::minutes((n * 97 + 540) as i64);

            if let Err(e) = ledger
                .record_sale_at(&tenant, &item.item_id, qty, sold_price, sold_at)
                .await
            {
                eprintln!("Failed to record sale of {}: {}", item.item_id, e);
                continue;
            }
            recorded += 1;
        }
    }

    println!("✓ Recorded {} sales in {:?}", recorded, start.elapsed());
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single catalog item with realistic data.
fn generate_item(category: &str, brand: &str, name: &str, seed: i64) -> NewItem {
    // $1.00 - $40.00
    let rate = 100 + (seed * 137) % 3900;
    // 30-70% markup
    let mrp = rate + rate * (30 + (seed * 11) % 40) / 100;
    // Flat per-unit tax, 0-5% of rate
    let taxes = rate * (seed % 6) / 100;

    NewItem {
        item_id: format!("{}-{:02}", category, seed),
        item_name: name.to_string(),
        brand_name: brand.to_string(),
        quantity: (seed * 13) % 120,
        rate: Money::from_cents(rate),
        mrp: Money::from_cents(mrp),
        taxes: Money::from_cents(taxes),
    }
}
