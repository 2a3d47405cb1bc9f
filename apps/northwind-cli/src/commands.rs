//! # Command Runners
//!
//! Each demonstration opens its own session, performs one query or
//! mutation, writes its lines, and drops the session on return.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  run_demo(db, demo, out)                                               │
//! │       │                                                                 │
//! │       ├── db.session().await?        ← connectivity errors surface here │
//! │       ├── repository call            ← query / constraint errors       │
//! │       ├── render::*_line → out                                         │
//! │       └── session dropped            ← every exit path                 │
//! │                                                                         │
//! │  run_all: the read-only tour, one session per demo, failures reported   │
//! │  and skipped, error at the end if any failed                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use futures_util::TryStreamExt;
use std::io::Write;
use tracing::{info, warn};

use northwind_core::{Category, CUSTOMER_PAGE_SIZE};
use northwind_db::{Database, DbConfig, InsertOutcome};

use crate::cli::Demo;
use crate::config::AppSettings;
use crate::error::{AppError, AppResult};
use crate::render;

/// Builds the lazy database handle for connection string `name`.
pub async fn open_database(settings: &AppSettings, name: &str) -> AppResult<Database> {
    let connection_string = settings.require_connection_string(name)?;
    let config = DbConfig::from_connection_string(connection_string)?;
    Ok(Database::new(config).await?)
}

/// Runs one demonstration.
pub async fn run_demo<W: Write>(db: &Database, demo: &Demo, out: &mut W) -> AppResult<()> {
    info!(demo = demo.title(), "Running demo");
    let mut session = db.session().await?;

    match demo {
        Demo::Customers => {
            let customers = session
                .customers()
                .top_by_company_desc(CUSTOMER_PAGE_SIZE)
                .await?;
            for customer in &customers {
                writeln!(out, "{}", render::customer_line(customer))?;
            }
        }

        Demo::InsertCategory {
            id,
            name,
            description,
        } => {
            let category = Category::new(*id, name.as_str(), description.clone());
            match session.categories().insert_if_absent(&category).await? {
                InsertOutcome::Inserted(stored) => {
                    writeln!(out, "Inserted category {}", render::category_line(&stored))?
                }
                InsertOutcome::AlreadyExists(existing) => writeln!(
                    out,
                    "Category already exists, nothing inserted: {}",
                    render::category_line(&existing)
                )?,
            }
        }

        Demo::UpdateCategory {
            id,
            name,
            description,
        } => {
            let updated = session
                .categories()
                .update_details(*id, name, description.as_deref())
                .await?;
            match updated {
                Some(category) => {
                    writeln!(out, "Updated category {}", render::category_line(&category))?
                }
                None => writeln!(out, "Category {id} not found, nothing updated")?,
            }
        }

        Demo::DeleteCategory { id } => {
            let deleted = session.categories().delete(*id).await?;
            writeln!(out, "Deleted category {}", render::category_line(&deleted))?;
        }

        Demo::ProductsBelow { price } => {
            let mut products = session.products().priced_below(*price);
            while let Some(product) = products.try_next().await? {
                writeln!(out, "{}", render::product_line(&product))?;
            }
        }

        Demo::Valuations => {
            let mut rows = session.products().valuations();
            while let Some(row) = rows.try_next().await? {
                writeln!(out, "{}", render::valuation_line(&row))?;
            }
        }

        Demo::CategoryProducts => {
            for row in session.reports().product_categories().await? {
                writeln!(out, "{}", render::product_category_line(&row))?;
            }
        }

        Demo::CategoryGroups => {
            for group in session.reports().category_groups().await? {
                for line in render::category_group_lines(&group) {
                    writeln!(out, "{line}")?;
                }
            }
        }

        Demo::ProductDetails => {
            for detail in session.reports().product_details().await? {
                writeln!(out, "{}", render::product_detail_line(&detail))?;
            }
        }

        Demo::PriceTotal => {
            let total = session.products().total_unit_price().await?;
            writeln!(out, "{}", render::total_line(total))?;
        }

        Demo::SupplierReport { dialect } => {
            let rows = session
                .reports()
                .product_suppliers(dialect.dialect())
                .await?;
            for row in &rows {
                writeln!(out, "{}", render::product_supplier_line(row))?;
            }
        }
    }

    Ok(())
}

/// Runs the read-only tour under section headers.
///
/// A failing demo is reported on stderr and the tour continues; the result
/// is `AppError::DemosFailed` if any of them failed.
pub async fn run_all<W: Write>(db: &Database, out: &mut W) -> AppResult<()> {
    let tour = Demo::read_only_tour();
    let total = tour.len();
    let mut failed = 0;

    for demo in &tour {
        writeln!(out, "== {} ==", demo.title())?;

        if let Err(e) = run_demo(db, demo, out).await {
            // A broken stdout makes every later demo fail the same way
            if let AppError::Output(_) = e {
                return Err(e);
            }
            warn!(demo = demo.title(), error = %e, "Demo failed");
            eprintln!("{} failed: {e}", demo.title());
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(AppError::DemosFailed { failed, total });
    }
    Ok(())
}
