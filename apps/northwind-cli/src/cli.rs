//! Command line definition.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use northwind_core::{Money, DEFAULT_CONNECTION_NAME};
use northwind_db::{Dialect, MssqlDialect, SqliteDialect};

use crate::config::SETTINGS_FILE;

#[derive(Debug, Parser)]
#[command(name = "northwind")]
#[command(about = "Data access demonstrations against the Northwind sample database")]
#[command(version)]
pub struct Cli {
    /// Directory the settings file is resolved against
    #[arg(long, default_value = ".")]
    pub base_dir: PathBuf,

    /// Settings file; required when given, optional otherwise
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Name of the connection string under ConnectionStrings
    #[arg(long, default_value = DEFAULT_CONNECTION_NAME)]
    pub connection: String,

    /// Log verbosity: error, warn, info, debug, trace (RUST_LOG wins)
    #[arg(long, default_value = "warn")]
    pub verbosity: tracing::Level,

    /// Without a command the resolved connection string is printed
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Settings file name and whether its absence is tolerated.
    pub fn settings_file(&self) -> (PathBuf, bool) {
        match &self.settings {
            Some(path) => (path.clone(), false),
            None => (PathBuf::from(SETTINGS_FILE), true),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the resolved connection string
    Connection,

    /// Run every read-only demonstration in order
    All,

    #[command(flatten)]
    Demo(Demo),
}

/// One data-access demonstration. Each runs in its own session.
#[derive(Debug, Clone, Subcommand)]
pub enum Demo {
    /// First 10 customers by company name, descending
    Customers,

    /// Insert a category unless its id is taken
    InsertCategory {
        #[arg(long, default_value_t = 9)]
        id: i64,

        #[arg(long, default_value = "Frozen Foods")]
        name: String,

        /// Category description. Omit to store none
        #[arg(long)]
        description: Option<String>,
    },

    /// Change name and description of a category
    UpdateCategory {
        #[arg(long)]
        id: i64,

        #[arg(long, default_value = "Frozen Desserts")]
        name: String,

        /// New description. Omit to clear it
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a category inside a transaction
    DeleteCategory {
        #[arg(long)]
        id: i64,
    },

    /// Products cheaper than a price, most expensive first
    ProductsBelow {
        /// Threshold such as 10.00 or $10
        #[arg(long, default_value = "10.00")]
        price: Money,
    },

    /// Every product with its stock value, most expensive first
    Valuations,

    /// Products joined to their category (inner join)
    CategoryProducts,

    /// Every category with its products (group join)
    CategoryGroups,

    /// Products with category and supplier loaded
    ProductDetails,

    /// Sum of all unit prices
    PriceTotal,

    /// Raw SQL report over products, categories and suppliers
    SupplierReport {
        /// Identifier quoting of the statement
        #[arg(long, value_enum, default_value_t = DialectKind::Sqlite)]
        dialect: DialectKind,
    },
}

impl Demo {
    pub fn title(&self) -> &'static str {
        match self {
            Demo::Customers => "List Customers",
            Demo::InsertCategory { .. } => "Insert Category",
            Demo::UpdateCategory { .. } => "Update Category",
            Demo::DeleteCategory { .. } => "Delete Category",
            Demo::ProductsBelow { .. } => "Filter & Sort Products",
            Demo::Valuations => "Projected Filter & Sort",
            Demo::CategoryProducts => "Inner Join",
            Demo::CategoryGroups => "Group Join",
            Demo::ProductDetails => "Eager-Load Join",
            Demo::PriceTotal => "Aggregate",
            Demo::SupplierReport { .. } => "Raw Projection",
        }
    }

    /// The demonstrations `all` runs. None of them writes.
    pub fn read_only_tour() -> Vec<Demo> {
        vec![
            Demo::Customers,
            Demo::ProductsBelow {
                price: Money::from_cents(1000),
            },
            Demo::Valuations,
            Demo::CategoryProducts,
            Demo::CategoryGroups,
            Demo::ProductDetails,
            Demo::PriceTotal,
            Demo::SupplierReport {
                dialect: DialectKind::Sqlite,
            },
        ]
    }
}

/// Backend whose identifier quoting the raw report uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectKind {
    Sqlite,
    Mssql,
}

impl DialectKind {
    pub fn dialect(self) -> &'static dyn Dialect {
        match self {
            DialectKind::Sqlite => &SqliteDialect,
            DialectKind::Mssql => &MssqlDialect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_products_below() {
        let cli = Cli::parse_from(["northwind", "products-below", "--price", "$12.5"]);
        match cli.command {
            Some(Command::Demo(Demo::ProductsBelow { price })) => {
                assert_eq!(price, Money::from_cents(1250))
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_description_is_absent_unless_given() {
        let cli = Cli::parse_from(["northwind", "update-category", "--id", "3"]);
        match cli.command {
            Some(Command::Demo(Demo::UpdateCategory { description, .. })) => {
                assert_eq!(description, None)
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::parse_from([
            "northwind",
            "insert-category",
            "--description",
            "Ice cream",
        ]);
        match cli.command {
            Some(Command::Demo(Demo::InsertCategory { description, .. })) => {
                assert_eq!(description.as_deref(), Some("Ice cream"))
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["northwind"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.connection, "NorthWindDS");
        assert_eq!(cli.verbosity, tracing::Level::WARN);
        assert_eq!(cli.settings_file(), (PathBuf::from("appsettings.json"), true));

        let cli = Cli::parse_from(["northwind", "--settings", "dev.json", "insert-category"]);
        assert_eq!(cli.settings_file(), (PathBuf::from("dev.json"), false));
        match cli.command {
            Some(Command::Demo(Demo::InsertCategory { id, name, .. })) => {
                assert_eq!(id, 9);
                assert_eq!(name, "Frozen Foods");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_price_rejected() {
        assert!(Cli::try_parse_from(["northwind", "products-below", "--price", "cheap"]).is_err());
    }

    #[test]
    fn test_dialect_kind() {
        assert_eq!(DialectKind::Mssql.dialect().name(), "mssql");
        assert_eq!(DialectKind::Sqlite.dialect().quote_ident("p"), "\"p\"");
    }
}
