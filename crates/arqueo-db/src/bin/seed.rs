//! # Demo Shift Generator
//!
//! Opens a shift, records a handful of sales, closes it and prints the
//! arqueo. Useful for eyeballing a fresh database.
//!
//! ## Usage
//! ```bash
//! cargo run -p arqueo-db --bin seed
//!
//! # Specify database path, cashier and counted cash
//! cargo run -p arqueo-db --bin seed -- --db ./data/arqueo.db --cashier ana --counted 670.00
//! ```
//!
//! `ARQUEO_DB_PATH`, `ARQUEO_DB_MAX_CONNECTIONS` and `ARQUEO_LOG` are read
//! first; flags override them.

use arqueo_core::{to_money, Money, PaymentMethod, ShiftPhase, TransactionStatus};
use arqueo_db::migrations::migration_status;
use arqueo_db::{ArqueoConfig, Database, NewSale, ShiftService};
use std::env;
use tracing_subscriber::EnvFilter;

/// (quantity, unit price, method, status)
const DEMO_SALES: &[(i64, &str, PaymentMethod, TransactionStatus)] = &[
    (1, "150.00", PaymentMethod::Cash, TransactionStatus::Completed),
    (1, "80.50", PaymentMethod::Card, TransactionStatus::Completed),
    (1, "19.99", PaymentMethod::Cash, TransactionStatus::Completed),
    (1, "500.00", PaymentMethod::Cash, TransactionStatus::Failed),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ArqueoConfig::load()?;
    init_tracing(&config.log_filter);

    let args: Vec<String> = env::args().collect();

    let mut cashier = String::from("demo-cashier");
    let mut initial_cash = String::from("500.00");
    let mut counted_cash = String::from("670.00");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" if i + 1 < args.len() => {
                config.database_path = args[i + 1].clone().into();
                i += 1;
            }
            "--cashier" | "-c" if i + 1 < args.len() => {
                cashier = args[i + 1].clone();
                i += 1;
            }
            "--initial" | "-i" if i + 1 < args.len() => {
                initial_cash = args[i + 1].clone();
                i += 1;
            }
            "--counted" | "-n" if i + 1 < args.len() => {
                counted_cash = args[i + 1].clone();
                i += 1;
            }
            "--help" | "-h" => {
                println!("Arqueo Demo Shift Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>         Database file path (default: $ARQUEO_DB_PATH or ./arqueo.db)");
                println!("  -c, --cashier <ID>      Cashier id (default: demo-cashier)");
                println!("  -i, --initial <AMOUNT>  Opening float (default: 500.00)");
                println!("  -n, --counted <AMOUNT>  Cash counted at close (default: 670.00)");
                println!("  -h, --help              Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let initial_cash = to_money(initial_cash.as_str(), "initial_cash")?;
    let counted_cash = to_money(counted_cash.as_str(), "counted_cash")?;

    println!("Arqueo Demo Shift Generator");
    println!("===========================");
    println!("Database: {}", config.database_path.display());
    println!("Cashier:  {}", cashier);
    println!();

    let db = Database::new(config.db_config()).await?;
    let (total, applied) = migration_status(db.pool()).await?;
    println!("✓ Connected to database ({applied}/{total} migrations applied)");

    let service = ShiftService::new(&db);

    if service.current_phase(&cashier).await? == ShiftPhase::Open {
        println!("⚠ {} already has an open shift.", cashier);
        println!("  Close it or pick another --cashier.");
        return Ok(());
    }

    let shift = service.open_shift(&cashier, initial_cash).await?;
    println!("✓ Opened shift {} with {}", shift.id, shift.initial_cash);

    for (quantity, price, method, status) in DEMO_SALES {
        let unit_price = to_money(*price, "unit_price")?;
        let tx = service
            .record_sale(&shift.id, NewSale::new(*quantity, unit_price, *method).with_status(*status))
            .await?;
        println!("  + {:>9} {:?} ({:?})", tx.total.to_string(), tx.payment_method, tx.status);
    }

    let preview = service.preview_close(&shift.id, counted_cash).await?;
    println!();
    println!("Preview: expected {}, counted {}", preview.expected_cash, preview.counted_cash);

    let closure = service.close_shift(&shift.id, counted_cash).await?;
    let r = &closure.reconciliation;

    println!();
    println!("Arqueo");
    println!("------");
    println!("Initial cash:   {:>10}", r.initial_cash.to_string());
    println!("Cash sales:     {:>10}", r.cash_sales.to_string());
    println!("Expected cash:  {:>10}", r.expected_cash.to_string());
    println!("Counted cash:   {:>10}", r.counted_cash.to_string());
    println!("Difference:     {:>10}  {:?}", signed(r.difference), r.status);
    if let Some(duration) = closure.shift.duration() {
        println!("Shift length:   {:>9}s", duration.num_seconds());
    }
    println!();
    println!("Sales: {} completed, {} total", closure.summary.count, closure.summary.total);
    for (method, totals) in &closure.summary.by_method {
        println!("  {:<9} {:>3} {:>10}", format!("{method:?}"), totals.count, totals.total.to_string());
    }

    println!();
    println!("{}", serde_json::to_string_pretty(&closure)?);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

fn init_tracing(directives: &str) {
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn signed(amount: Money) -> String {
    if amount.is_positive() {
        format!("+{amount}")
    } else {
        amount.to_string()
    }
}
