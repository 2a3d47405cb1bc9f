//! # Report Repository
//!
//! The cross-entity queries: inner join, group join, eager load, and the
//! hand-written report that goes through a [`Dialect`].
//!
//! ## Join Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  product_categories   INNER JOIN   orphans (no category) dropped       │
//! │  category_groups      GROUP JOIN   every category, maybe 0 products    │
//! │  product_details      LEFT JOIN    every product, category/supplier?   │
//! │  product_suppliers    LEFT JOIN    every product, "" when unmatched    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqliteConnection};
use tracing::{debug, info};

use crate::dialect::{product_supplier_report_sql, Dialect};
use crate::error::DbResult;
use northwind_core::{
    group_join, Category, CategoryGroup, Product, ProductCategoryRow, ProductDetail,
    ProductSupplierRow, Supplier,
};

#[derive(Debug)]
pub struct ReportRepository<'s> {
    conn: &'s mut SqliteConnection,
}

impl<'s> ReportRepository<'s> {
    pub fn new(conn: &'s mut SqliteConnection) -> Self {
        ReportRepository { conn }
    }

    /// One row per product that has a category, by product id.
    pub async fn product_categories(&mut self) -> DbResult<Vec<ProductCategoryRow>> {
        let rows = sqlx::query_as::<_, ProductCategoryRow>(
            r#"
            SELECT p.id AS product_id,
                   p.name AS product_name,
                   c.name AS category_name
            FROM products p
            INNER JOIN categories c ON c.id = p.category_id
            ORDER BY p.id
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await?;

        debug!(count = rows.len(), "Product/category join");
        Ok(rows)
    }

    /// Every category (by id) with its products (by name).
    pub async fn category_groups(&mut self) -> DbResult<Vec<CategoryGroup>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories ORDER BY id",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, unit_price_cents, units_in_stock, category_id, supplier_id
            FROM products
            WHERE category_id IS NOT NULL
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await?;

        let groups = group_join(categories, products);
        debug!(groups = groups.len(), "Category group join");
        Ok(groups)
    }

    /// Every product with its category and supplier loaded in the same query.
    pub async fn product_details(&mut self) -> DbResult<Vec<ProductDetail>> {
        let rows = sqlx::query(
            r#"
            SELECT p.id, p.name, p.unit_price_cents, p.units_in_stock,
                   p.category_id, p.supplier_id,
                   c.id AS c_id, c.name AS c_name, c.description AS c_description,
                   s.id AS s_id, s.company_name AS s_company_name, s.address AS s_address
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            LEFT JOIN suppliers s ON s.id = p.supplier_id
            ORDER BY p.id
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await?;

        let details = rows
            .iter()
            .map(detail_from_row)
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        debug!(count = details.len(), "Loaded product details");
        Ok(details)
    }

    /// The raw product/category/supplier report, in product id order.
    ///
    /// The statement text comes from `dialect`; rows map positionally onto
    /// [`ProductSupplierRow`].
    pub async fn product_suppliers(
        &mut self,
        dialect: &dyn Dialect,
    ) -> DbResult<Vec<ProductSupplierRow>> {
        let sql = product_supplier_report_sql(dialect);
        info!(dialect = dialect.name(), "Running product/supplier report");
        debug!(sql = %sql, "Report statement");

        let rows = sqlx::query_as::<_, ProductSupplierRow>(&sql)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(rows)
    }
}

fn detail_from_row(row: &SqliteRow) -> Result<ProductDetail, sqlx::Error> {
    let product = Product::from_row(row)?;

    let category = match row.try_get::<Option<i64>, _>("c_id")? {
        Some(id) => Some(Category {
            id,
            name: row.try_get::<Option<String>, _>("c_name")?.unwrap_or_default(),
            description: row.try_get("c_description")?,
        }),
        None => None,
    };

    let supplier = match row.try_get::<Option<i64>, _>("s_id")? {
        Some(id) => Some(Supplier {
            id,
            company_name: row
                .try_get::<Option<String>, _>("s_company_name")?
                .unwrap_or_default(),
            address: row.try_get("s_address")?,
        }),
        None => None,
    };

    Ok(ProductDetail {
        product,
        category,
        supplier,
    })
}
