//! # Sample Database Generator
//!
//! Creates a Northwind SQLite database with the sample schema and rows,
//! ready for the `northwind` console app.
//!
//! ## Usage
//! ```bash
//! # Create ./northwind.db (default)
//! cargo run -p northwind-db --bin seed
//!
//! # Specify database path
//! cargo run -p northwind-db --bin seed -- --db ./data/northwind.db
//! ```
//!
//! An existing database that already has categories is left alone.

use std::env;
use std::process::ExitCode;

use northwind_db::sample::seed_sample_data;
use northwind_db::{Database, DbConfig, DbError};

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./northwind.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Northwind Sample Database Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./northwind.db)");
                println!("  -h, --help         Show this help message");
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("Unknown argument: {other} (try --help)");
                return ExitCode::FAILURE;
            }
        }
        i += 1;
    }

    match run(&db_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ Seed failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(db_path: &str) -> Result<(), DbError> {
    println!("Northwind Sample Database Generator");
    println!("===================================");
    println!("Database: {db_path}");
    println!();

    let config = DbConfig::from_connection_string(db_path)?
        .create_if_missing(true)
        .run_migrations(true);
    let db = Database::new(config).await?;

    println!("✓ Schema applied");

    let existing = {
        let mut session = db.session().await?;
        session.categories().list().await?.len()
    };
    if existing > 0 {
        println!("⚠ Database already has {existing} categories");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let summary = seed_sample_data(&db).await?;

    println!(
        "✓ Wrote {} categories, {} suppliers, {} products, {} customers in {:?}",
        summary.categories,
        summary.suppliers,
        summary.products,
        summary.customers,
        start.elapsed()
    );

    db.close().await;

    println!();
    println!("✓ Seed complete!");
    Ok(())
}
