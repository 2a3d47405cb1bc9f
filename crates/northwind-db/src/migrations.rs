//! # Schema Bootstrap
//!
//! Embedded SQL that creates the Northwind sample tables.
//!
//! ## How It Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Bootstrap Process                                  │
//! │                                                                         │
//! │  seed binary / DbConfig::in_memory()                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Check _sqlx_migrations table                                          │
//! │       │                                                                 │
//! │       ├── 001_northwind_schema.sql ✓ (already applied → no-op)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Create categories, suppliers, products, customers                     │
//! │                                                                         │
//! │  The console app never runs this: it expects an existing database.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqliteConnection;
use tracing::info;

use crate::error::DbResult;

/// Scripts from `migrations/sqlite`, embedded at compile time.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies the schema scripts that have not run yet.
///
/// Idempotent; every script uses `IF NOT EXISTS` as well.
pub async fn run_migrations(conn: &mut SqliteConnection) -> DbResult<()> {
    info!(
        scripts = MIGRATOR.migrations.len(),
        "Checking for pending schema scripts"
    );

    MIGRATOR.run(conn).await?;

    info!("Northwind schema ready");
    Ok(())
}

/// Returns `(total_scripts, applied_scripts)`.
pub async fn migration_status(conn: &mut SqliteConnection) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    // A database created by other tooling has no bookkeeping table
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(conn)
        .await
        .unwrap_or(0);

    Ok((total, applied as usize))
}
