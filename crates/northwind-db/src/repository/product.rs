//! # Product Repository
//!
//! Product lookups, the two lazily consumed queries and the price total.
//!
//! ## Lazy Streams
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  let mut rows = session.products().priced_below(price);                │
//! │                    │                                                    │
//! │                    │  nothing executed yet                              │
//! │                    ▼                                                    │
//! │  rows.try_next().await?  ──►  statement runs, first row decoded        │
//! │  rows.try_next().await?  ──►  next row                                 │
//! │  ...                                                                    │
//! │  None                    ──►  cursor finished                          │
//! │                                                                         │
//! │  The stream borrows the session: it cannot outlive it.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use sqlx::SqliteConnection;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use northwind_core::validation::validate_product;
use northwind_core::{Money, Product, ProductValuation};

const SELECT_COLUMNS: &str =
    "SELECT id, name, unit_price_cents, units_in_stock, category_id, supplier_id FROM products";

/// Repository for product database operations.
#[derive(Debug)]
pub struct ProductRepository<'s> {
    conn: &'s mut SqliteConnection,
}

impl<'s> ProductRepository<'s> {
    pub fn new(conn: &'s mut SqliteConnection) -> Self {
        ProductRepository { conn }
    }

    /// Gets a product by id.
    pub async fn get_by_id(&mut self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(product)
    }

    /// Inserts a product. A non-positive id lets SQLite assign one.
    ///
    /// ## Errors
    /// - `DbError::Validation` - bad name, negative price or stock
    /// - `DbError::ForeignKeyViolation` - unknown category or supplier id
    pub async fn insert(&mut self, product: &Product) -> DbResult<Product> {
        validate_product(product)?;

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                id, name, unit_price_cents, units_in_stock, category_id, supplier_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind((product.id > 0).then_some(product.id))
        .bind(&product.name)
        .bind(product.unit_price_cents)
        .bind(product.units_in_stock)
        .bind(product.category_id)
        .bind(product.supplier_id)
        .execute(&mut *self.conn)
        .await
        .map_err(|e| DbError::from(e).duplicate_of(product.id))?;

        let stored = Product {
            id: result.last_insert_rowid(),
            ..product.clone()
        };

        debug!(id = stored.id, name = %stored.name, "Inserted product");
        Ok(stored)
    }

    /// Counts all products.
    pub async fn count(&mut self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(count)
    }

    /// Products with a unit price strictly below `threshold`, most expensive
    /// first (ties by id).
    ///
    /// Consumes the repository so the stream can hold the session's
    /// connection. The query runs when the stream is first polled.
    pub fn priced_below(self, threshold: Money) -> BoxStream<'s, DbResult<Product>> {
        info!(threshold = %threshold, "Streaming products priced below threshold");

        sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, unit_price_cents, units_in_stock, category_id, supplier_id
            FROM products
            WHERE unit_price_cents < ?1
            ORDER BY unit_price_cents DESC, id
            "#,
        )
        .bind(threshold.cents())
        .fetch(self.conn)
        .map_err(DbError::from)
        .boxed()
    }

    /// Every product projected to {id, name, price, price × stock}, most
    /// expensive first (ties by id).
    ///
    /// Lazy like [`ProductRepository::priced_below`].
    pub fn valuations(self) -> BoxStream<'s, DbResult<ProductValuation>> {
        info!("Streaming product valuations");

        sqlx::query_as::<_, ProductValuation>(
            r#"
            SELECT id AS product_id,
                   name AS product_name,
                   unit_price_cents,
                   unit_price_cents * units_in_stock AS stock_value_cents
            FROM products
            ORDER BY unit_price_cents DESC, id
            "#,
        )
        .fetch(self.conn)
        .map_err(DbError::from)
        .boxed()
    }

    /// Sum of all unit prices. Zero when there are no products.
    pub async fn total_unit_price(&mut self) -> DbResult<Money> {
        // SUM over no rows is NULL
        let total: Option<i64> = sqlx::query_scalar("SELECT SUM(unit_price_cents) FROM products")
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(Money::from_cents(total.unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use futures_util::TryStreamExt;

    use crate::repository::test_support::{category, memory_db, product};
    use crate::DbError;
    use northwind_core::validation::{MAX_UNITS_IN_STOCK, MAX_UNIT_PRICE_CENTS};
    use northwind_core::{Money, Product, ValidationError};

    async fn seeded() -> crate::Database {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();
        session.categories().insert(&category(1, "Beverages")).await.unwrap();

        for p in [
            product(1, "Tea", 1000, 5, Some(1)),
            product(2, "Apple", 50, 100, None),
            product(3, "Coffee", 1000, 0, Some(1)),
            product(4, "Caviar", 15000, 2, None),
        ] {
            session.products().insert(&p).await.unwrap();
        }

        drop(session);
        db
    }

    #[tokio::test]
    async fn test_get_by_id_and_count() {
        let db = seeded().await;
        let mut session = db.session().await.unwrap();

        let tea = session.products().get_by_id(1).await.unwrap().unwrap();
        assert_eq!(tea.name, "Tea");
        assert_eq!(tea.price(), Money::from_cents(1000));
        assert!(session.products().get_by_id(99).await.unwrap().is_none());
        assert_eq!(session.products().count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_insert_with_unknown_category_fails() {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();

        let err = session
            .products()
            .insert(&product(1, "Orphan", 100, 1, Some(42)))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_insert_rejects_negative_price() {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();

        let err = session
            .products()
            .insert(&product(1, "Refund", -1, 1, None))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_price_ceiling_keeps_valuations_decodable() {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();

        let err = session
            .products()
            .insert(&product(1, "Gold", 1_000_000_000_000_000, MAX_UNITS_IN_STOCK, None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::OutOfRange { .. })
        ));

        let priciest = product(2, "Platinum", MAX_UNIT_PRICE_CENTS, MAX_UNITS_IN_STOCK, None);
        session.products().insert(&priciest).await.unwrap();

        let rows: Vec<_> = session.products().valuations().try_collect().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(Some(rows[0].stock_value()), priciest.stock_value());
    }

    #[tokio::test]
    async fn test_priced_below_is_strict_and_ordered() {
        let db = seeded().await;
        let mut session = db.session().await.unwrap();

        let cheap: Vec<Product> = session
            .products()
            .priced_below(Money::from_cents(1000))
            .try_collect()
            .await
            .unwrap();
        assert_eq!(cheap.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2]);

        let mid: Vec<Product> = session
            .products()
            .priced_below(Money::from_cents(1001))
            .try_collect()
            .await
            .unwrap();
        // Equal prices fall back to id order
        assert_eq!(mid.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 3, 2]);

        let prices: Vec<i64> = mid.iter().map(|p| p.unit_price_cents).collect();
        assert!(prices.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_priced_below_zero_is_empty() {
        let db = seeded().await;
        let mut session = db.session().await.unwrap();

        let none: Vec<Product> = session
            .products()
            .priced_below(Money::zero())
            .try_collect()
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_priced_below_can_be_consumed_one_by_one() {
        let db = seeded().await;
        let mut session = db.session().await.unwrap();

        let mut rows = session.products().priced_below(Money::from_cents(100_000));
        let first = rows.try_next().await.unwrap().unwrap();
        assert_eq!(first.name, "Caviar");
        drop(rows);

        // Session is usable again once the stream is gone
        assert_eq!(session.products().count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_valuations() {
        let db = seeded().await;
        let mut session = db.session().await.unwrap();

        let rows: Vec<_> = session.products().valuations().try_collect().await.unwrap();
        assert_eq!(rows.len(), 4);

        // Caviar, Tea, Coffee, Apple
        assert_eq!(rows[0].product_name, "Caviar");
        assert_eq!(rows[0].stock_value(), Money::from_cents(30000));
        assert_eq!(rows[1].stock_value(), Money::from_cents(5000));
        assert_eq!(rows[2].stock_value(), Money::zero());
        assert_eq!(rows[3].product_name, "Apple");
        assert_eq!(rows[3].price(), Money::from_cents(50));
    }

    #[tokio::test]
    async fn test_total_unit_price() {
        let db = seeded().await;
        let mut session = db.session().await.unwrap();

        let total = session.products().total_unit_price().await.unwrap();
        assert_eq!(total, Money::from_cents(17050));
    }

    #[tokio::test]
    async fn test_total_unit_price_empty_is_zero() {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();

        let total = session.products().total_unit_price().await.unwrap();
        assert!(total.is_zero());
    }
}
