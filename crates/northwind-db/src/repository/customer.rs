//! # Customer Repository
//!
//! Customers are keyed by their five-letter Northwind code and are only
//! ever listed or looked up by the sample.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};
use northwind_core::validation::validate_customer;
use northwind_core::Customer;

#[derive(Debug)]
pub struct CustomerRepository<'s> {
    conn: &'s mut SqliteConnection,
}

impl<'s> CustomerRepository<'s> {
    pub fn new(conn: &'s mut SqliteConnection) -> Self {
        CustomerRepository { conn }
    }

    /// The first `limit` customers by company name, descending.
    ///
    /// Fewer rows come back when fewer exist. Ties keep no particular order.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let page = session.customers().top_by_company_desc(CUSTOMER_PAGE_SIZE).await?;
    /// ```
    pub async fn top_by_company_desc(&mut self, limit: u32) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, company_name, contact_name
            FROM customers
            ORDER BY company_name DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&mut *self.conn)
        .await?;

        debug!(count = customers.len(), limit, "Listed customers");
        Ok(customers)
    }

    pub async fn get_by_id(&mut self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, company_name, contact_name FROM customers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(customer)
    }

    /// Inserts a customer.
    ///
    /// ## Errors
    /// - `DbError::Validation` - malformed code or names
    /// - `DbError::UniqueViolation` - the code is taken
    pub async fn insert(&mut self, customer: &Customer) -> DbResult<()> {
        validate_customer(customer)?;

        sqlx::query("INSERT INTO customers (id, company_name, contact_name) VALUES (?1, ?2, ?3)")
            .bind(&customer.id)
            .bind(&customer.company_name)
            .bind(&customer.contact_name)
            .execute(&mut *self.conn)
            .await
            .map_err(|e| DbError::from(e).duplicate_of(&customer.id))?;

        debug!(id = %customer.id, "Inserted customer");
        Ok(())
    }

    pub async fn count(&mut self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::{customer, memory_db};
    use crate::DbError;

    #[tokio::test]
    async fn test_top_by_company_desc_orders_and_limits() {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();

        for (i, company) in ["Alpha", "Delta", "Bravo", "Echo", "Charlie"].iter().enumerate() {
            let id = format!("CUST{i}");
            session
                .customers()
                .insert(&customer(&id, company, Some("Contact")))
                .await
                .unwrap();
        }

        let top = session.customers().top_by_company_desc(3).await.unwrap();
        let names: Vec<_> = top.iter().map(|c| c.company_name.as_str()).collect();
        assert_eq!(names, vec!["Echo", "Delta", "Charlie"]);
    }

    #[tokio::test]
    async fn test_fewer_than_limit_returns_all() {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();

        session
            .customers()
            .insert(&customer("ALFKI", "Alfreds Futterkiste", Some("Maria Anders")))
            .await
            .unwrap();
        session
            .customers()
            .insert(&customer("WOLZA", "Wolski  Zajazd", None))
            .await
            .unwrap();

        let top = session.customers().top_by_company_desc(10).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].id, "WOLZA");
        assert!(top[0].contact_name.is_none());
    }

    #[tokio::test]
    async fn test_empty_store_returns_empty() {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();

        assert!(session.customers().top_by_company_desc(10).await.unwrap().is_empty());
        assert_eq!(session.customers().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_code() {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();
        let alfki = customer("ALFKI", "Alfreds Futterkiste", None);

        session.customers().insert(&alfki).await.unwrap();
        let err = session.customers().insert(&alfki).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "ALFKI"));

        let loaded = session.customers().get_by_id("ALFKI").await.unwrap();
        assert_eq!(loaded, Some(alfki));
    }
}
