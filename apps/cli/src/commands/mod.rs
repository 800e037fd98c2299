//! # Commands
//!
//! Subcommand definitions and dispatch.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stockbook --tenant shop-a sell HAM-01 --qty 2                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  clap parses → Command::Sell(SellArgs)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Context::open(config) → Database + SalesLedger + tenant               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sale::sell(&ctx, args) → SalesLedger::record_sale                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  output::* (table or --json)                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod item;
pub mod report;
pub mod sale;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate, Utc};
use clap::{Args, Subcommand};
use stockbook_core::validation::CoercionMode;
use stockbook_core::{ReportPeriod, SalesLedger, TenantId, ValidationError};
use stockbook_db::{Database, ItemRepository, SaleRepository};
use tracing::debug;

use crate::config::StockbookConfig;

/// The ledger as wired to SQLite.
pub type Ledger = SalesLedger<ItemRepository, SaleRepository>;

// =============================================================================
// Command Definitions
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage catalog items.
    #[command(subcommand)]
    Item(ItemCommand),

    /// Record a sale.
    Sell(SellArgs),

    /// List recorded sales.
    Sales(SalesArgs),

    /// Sales and profit report, for one month or all time.
    Report(PeriodArgs),

    /// Export sales to CSV.
    Export(ExportArgs),

    /// Totals, best sellers and today's activity.
    Dashboard,

    /// Inspect or create the config file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
pub enum ItemCommand {
    /// Add an item to the catalog.
    Add(ItemFields),

    /// List every item.
    List,

    /// Search by item id or name (case-insensitive).
    Search {
        query: String,
    },

    /// Change some fields of an item. `--id` renames it.
    Update {
        item_id: String,

        #[command(flatten)]
        fields: ItemFields,
    },

    /// Remove an item. Its sales are kept.
    Delete {
        item_id: String,
    },
}

/// Item fields as typed on the command line. Amounts are parsed according to
/// the configured coercion mode.
#[derive(Args, Debug, Default)]
pub struct ItemFields {
    #[arg(long)]
    pub id: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub brand: Option<String>,

    /// On-hand count.
    #[arg(long)]
    pub qty: Option<String>,

    /// Unit cost.
    #[arg(long)]
    pub rate: Option<String>,

    /// Unit list price.
    #[arg(long)]
    pub mrp: Option<String>,

    /// Flat per-unit tax amount.
    #[arg(long)]
    pub taxes: Option<String>,
}

#[derive(Args, Debug)]
pub struct SellArgs {
    pub item_id: String,

    #[arg(long)]
    pub qty: String,

    /// Total charged. Defaults to list price × quantity.
    #[arg(long)]
    pub price: Option<String>,
}

#[derive(Args, Debug)]
pub struct SalesArgs {
    /// Only today's sales, newest first.
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub today: bool,

    /// First day to include (YYYY-MM-DD).
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD).
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub struct PeriodArgs {
    /// Month (1-12).
    #[arg(long, requires = "year")]
    pub month: Option<u32>,

    #[arg(long, requires = "month")]
    pub year: Option<i32>,
}

impl PeriodArgs {
    pub fn period(&self) -> Result<Option<ReportPeriod>, ValidationError> {
        match (self.month, self.year) {
            (Some(month), Some(year)) => ReportPeriod::new(month, year).map(Some),
            _ => Ok(None),
        }
    }
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Output file, `-` for stdout. Defaults to `Sales_History_<month>_<year>.csv`.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the resolved configuration.
    Show,

    /// Write the resolved configuration to the config file.
    Init,
}

// =============================================================================
// Context
// =============================================================================

/// Everything a data command needs.
pub struct Context {
    pub db: Database,
    pub ledger: Ledger,
    pub tenant: TenantId,
    pub offset: FixedOffset,
    pub coercion: CoercionMode,
    pub json: bool,
}

impl Context {
    /// Opens the database and builds the ledger for the configured tenant.
    pub async fn open(config: &StockbookConfig, json: bool) -> anyhow::Result<Self> {
        let tenant = config.tenant()?;
        let offset = config.utc_offset()?;
        let db = Database::new(config.db_config()?).await?;

        debug!(tenant = %tenant, "Context ready");

        let ledger = SalesLedger::new(Arc::new(db.items()), Arc::new(db.sales()));

        Ok(Context {
            db,
            ledger,
            tenant,
            offset,
            coercion: config.coercion(),
            json,
        })
    }

    /// Today's calendar date at the configured offset.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }
}

/// Runs a data command.
pub async fn run(command: Command, ctx: &Context) -> anyhow::Result<()> {
    match command {
        Command::Item(cmd) => item::run(cmd, ctx).await,
        Command::Sell(args) => sale::sell(args, ctx).await,
        Command::Sales(args) => sale::list(args, ctx).await,
        Command::Report(args) => report::report(args, ctx).await,
        Command::Export(args) => report::export(args, ctx).await,
        Command::Dashboard => report::dashboard(ctx).await,
        Command::Config(_) => anyhow::bail!("config commands do not open the database"),
    }
}
