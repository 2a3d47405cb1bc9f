//! # northwind-core: Entity Model for the Northwind Sample
//!
//! This crate holds the record types of the Northwind sample database and
//! the little logic that does not need a database: money formatting,
//! validation, and the in-memory half of the group join.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Northwind Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    northwind (CLI)                              │   │
//! │  │   settings ──► session ──► query ──► render ──► stdout          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ northwind-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ validation│  │   error   │  │   │
//! │  │   │  Product  │  │   Money   │  │   rules   │  │ CoreError │  │   │
//! │  │   │  Category │  │  "$9.50"  │  │  checks   │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 northwind-db (Database Layer)                   │   │
//! │  │          SQLite sessions, repositories, raw SQL dialects        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Category, Product, Supplier, Customer) and projections
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Field rules applied before every insert/update
//!
//! ## Example Usage
//!
//! ```rust
//! use northwind_core::money::Money;
//!
//! let tea = Money::from_cents(1000);
//! let apple: Money = "0.50".parse().unwrap();
//!
//! assert_eq!((tea + apple).to_string(), "$10.50");
//! ```

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// These allow users to do `use northwind_core::Money` instead of
// `use northwind_core::money::Money`
pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

/// Number of customers shown by the customer listing.
pub const CUSTOMER_PAGE_SIZE: u32 = 10;

/// Name of the connection string the application looks up by default.
pub const DEFAULT_CONNECTION_NAME: &str = "NorthWindDS";
