//! # Stockbook CLI
//!
//! Command-line front end for the multi-tenant retail ledger.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Startup Sequence                                 │
//! │                                                                         │
//! │  1. init_tracing()        RUST_LOG or "warn,stockbook=info,sqlx=warn"  │
//! │  2. StockbookConfig::load defaults → config.toml → STOCKBOOK_* env     │
//! │  3. Flag overrides        --db, --tenant, --lenient                    │
//! │  4. `config` commands     answered without touching the database       │
//! │  5. Context::open         pool + migrations + SalesLedger              │
//! │  6. commands::run         one command, then close the pool             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod commands;
mod config;
mod output;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use stockbook_core::validation::CoercionMode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::commands::{Command, ConfigCommand, Context};
use crate::config::StockbookConfig;

#[derive(Parser, Debug)]
#[command(name = "stockbook", version, about = "Inventory and sales ledger for small shops")]
struct Cli {
    /// Config file (defaults to the platform config directory).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// SQLite database file.
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Tenant whose data to work on.
    #[arg(long, short, global = true)]
    tenant: Option<String>,

    /// Treat missing or malformed numbers as zero.
    #[arg(long, global = true)]
    lenient: bool,

    /// Print JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn apply_to(&self, config: &mut StockbookConfig) {
        if let Some(ref db) = self.db {
            config.database.path = Some(db.clone());
        }
        if let Some(ref tenant) = self.tenant {
            config.tenant.id = Some(tenant.clone());
        }
        if self.lenient {
            config.input.coercion = CoercionMode::Lenient;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let mut config = StockbookConfig::load(cli.config.clone()).context("loading configuration")?;
    cli.apply_to(&mut config);
    config.validate()?;

    if let Command::Config(ref cmd) = cli.command {
        return run_config(cmd, &config, cli.config.clone());
    }

    let ctx = Context::open(&config, cli.json)
        .await
        .context("opening the ledger")?;

    let result = commands::run(cli.command, &ctx).await;
    ctx.db.close().await;
    result
}

fn run_config(
    cmd: &ConfigCommand,
    config: &StockbookConfig,
    path: Option<PathBuf>,
) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show => print!("{}", config.to_toml()?),
        ConfigCommand::Init => {
            let written = config.save(path)?;
            println!("Wrote {}", written.display());
        }
    }
    Ok(())
}

/// Initializes the tracing subscriber. Logs go to stderr so stdout stays
/// clean for tables, JSON and CSV.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockbook=debug` - Debug for stockbook crates only
/// - Default: warnings, plus info from stockbook
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,stockbook=info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!("Tracing initialized");
}
