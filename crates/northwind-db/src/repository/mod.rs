//! # Repository Module
//!
//! Typed queries over one session's connection.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories Borrow the Session                      │
//! │                                                                         │
//! │  CLI command                                                           │
//! │       │                                                                 │
//! │       │  let mut session = db.session().await?;                        │
//! │       │  session.categories().delete(9).await?                         │
//! │       ▼                                                                 │
//! │  CategoryRepository<'s>  { conn: &'s mut SqliteConnection }           │
//! │  ├── get_by_id / list / insert                                         │
//! │  ├── insert_if_absent / update_details                                 │
//! │  └── delete (own transaction)                                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  One repository is active at a time; the borrow checker enforces it.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`] - category CRUD, the single transactional delete
//! - [`ProductRepository`] - lookups, lazy filtered/projected streams, totals
//! - [`SupplierRepository`] - supplier rows for joins
//! - [`CustomerRepository`] - ordered, limited customer listing
//! - [`ReportRepository`] - inner join, group join, eager load, raw report

pub mod category;
pub mod customer;
pub mod product;
pub mod report;
pub mod supplier;

pub use category::CategoryRepository;
pub use customer::CustomerRepository;
pub use product::ProductRepository;
pub use report::ReportRepository;
pub use supplier::SupplierRepository;

/// Result of an insert that first checks whether the row exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome<T> {
    /// The row was written.
    Inserted(T),
    /// A row with that id was already stored. Carries the stored row.
    AlreadyExists(T),
}

impl<T> InsertOutcome<T> {
    pub fn was_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted(_))
    }

    /// The inserted or pre-existing row.
    pub fn into_inner(self) -> T {
        match self {
            InsertOutcome::Inserted(row) | InsertOutcome::AlreadyExists(row) => row,
        }
    }
}
