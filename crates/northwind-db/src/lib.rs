//! # northwind-db: Database Layer for the Northwind Sample
//!
//! SQLite access through sqlx: a database handle that hands out scoped
//! sessions, typed repositories over a session, and dialect-aware raw SQL.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Northwind Data Flow                                │
//! │                                                                         │
//! │  northwind CLI (one subcommand = one operation)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  northwind-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │   Dialect    │  │   │
//! │  │   │   (pool.rs)   │    │               │    │              │  │   │
//! │  │   │               │    │ Category      │    │ Sqlite  "x"  │  │   │
//! │  │   │ session() ────┼───►│ Product       │    │ Mssql   [x]  │  │   │
//! │  │   │ Session (RAII)│    │ Supplier      │    │              │  │   │
//! │  │   │               │    │ Customer      │◄───│ raw report   │  │   │
//! │  │   │               │    │ Report        │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 SQLite Database (northwind.db)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Database handle, configuration, sessions
//! - [`repository`] - Repository implementations
//! - [`dialect`] - Identifier quoting per backend, the raw report statement
//! - [`migrations`] - Embedded schema bootstrap for the sample database
//! - [`sample`] - Northwind sample rows
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use northwind_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_connection_string("northwind.db")?).await?;
//!
//! let mut session = db.session().await?;
//! let total = session.products().total_unit_price().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dialect;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod sample;

// =============================================================================
// Re-exports
// =============================================================================

pub use dialect::{Dialect, MssqlDialect, SqliteDialect};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DbSource, Session};

// Repository re-exports for convenience
pub use repository::{
    CategoryRepository, CustomerRepository, InsertOutcome, ProductRepository, ReportRepository,
    SupplierRepository,
};
