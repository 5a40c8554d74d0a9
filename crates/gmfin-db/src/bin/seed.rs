//! # Seed Data Generator
//!
//! Populates the database with the default currency table and demo
//! account balances for development.
//!
//! ## Usage
//! ```bash
//! # Seed 20 accounts (default) into GMFIN_DB_PATH or ./gmfin.db
//! cargo run -p gmfin-db --bin seed
//!
//! # Custom account count and database path
//! cargo run -p gmfin-db --bin seed -- --accounts 100 --db ./data/gmfin_dev.db
//!
//! # More log output
//! RUST_LOG=debug cargo run -p gmfin-db --bin seed
//! ```
//!
//! ## Generated Data
//! - Every default currency (UAH, EUR, USD, RUB, ANY)
//! - Accounts `demo-0001`.. cycling through those currencies
//! - An opening balance plus a handful of journaled adjustments per account

use std::env;
use std::sync::Arc;

use gmfin_core::{Amount, CurrencyAmount, CurrencyStore};
use gmfin_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_ACCOUNTS: usize = 20;

/// Adjustments applied to every account, in cents.
const ADJUSTMENTS_CENTS: &[i64] = &[-1999, 250, -75, 12_000, -4_321];

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,gmfin=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut config = DbConfig::from_env()?;
    let mut accounts = DEFAULT_ACCOUNTS;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--accounts" | "-a" => {
                if i + 1 < args.len() {
                    accounts = args[i + 1].parse().unwrap_or(DEFAULT_ACCOUNTS);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("gmfin Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -a, --accounts <N>  Number of demo accounts (default: {DEFAULT_ACCOUNTS})");
                println!("  -d, --db <PATH>     Database file path (default: $GMFIN_DB_PATH or ./gmfin.db)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            other => warn!(argument = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(
        path = %config.database_path.display(),
        accounts,
        "Seeding database"
    );

    let db = Database::new(config).await?;

    let seeded = db.currencies().seed_defaults().await?;
    let store = Arc::new(db.currencies().load_store().await?);
    info!(count = seeded, "Currencies ready");

    let currencies = store.all();
    let balances = db.balances(store);
    let start = std::time::Instant::now();

    for n in 0..accounts {
        let account_id = format!("demo-{:04}", n + 1);
        let currency = currencies.get(n % currencies.len().max(1)).cloned();

        // 100.00 .. 1099.00 opening balance
        let opening = Amount::from_cents(10_000 + ((n as i64 * 7_919) % 100_000));
        balances
            .set(&account_id, &CurrencyAmount::new(opening, currency))
            .await?;

        for cents in ADJUSTMENTS_CENTS {
            balances.adjust(&account_id, Amount::from_cents(*cents)).await?;
        }
    }

    info!(accounts, elapsed = ?start.elapsed(), "Balances seeded");

    if accounts > 0 {
        let first = balances.get("demo-0001").await?;
        let history = balances.history("demo-0001", 3).await?;
        info!(
            account = %first.account_id,
            balance = %first.value,
            recent_entries = history.len(),
            "Sample account"
        );
    }

    db.close().await;
    Ok(())
}
