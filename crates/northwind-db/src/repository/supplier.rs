//! # Supplier Repository

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};
use northwind_core::validation::validate_supplier;
use northwind_core::Supplier;

#[derive(Debug)]
pub struct SupplierRepository<'s> {
    conn: &'s mut SqliteConnection,
}

impl<'s> SupplierRepository<'s> {
    pub fn new(conn: &'s mut SqliteConnection) -> Self {
        SupplierRepository { conn }
    }

    pub async fn get_by_id(&mut self, id: i64) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(
            "SELECT id, company_name, address FROM suppliers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(supplier)
    }

    /// Inserts a supplier. A non-positive id lets SQLite assign one.
    pub async fn insert(&mut self, supplier: &Supplier) -> DbResult<Supplier> {
        validate_supplier(supplier)?;

        let result =
            sqlx::query("INSERT INTO suppliers (id, company_name, address) VALUES (?1, ?2, ?3)")
                .bind((supplier.id > 0).then_some(supplier.id))
                .bind(&supplier.company_name)
                .bind(&supplier.address)
                .execute(&mut *self.conn)
                .await
                .map_err(|e| DbError::from(e).duplicate_of(supplier.id))?;

        let stored = Supplier {
            id: result.last_insert_rowid(),
            ..supplier.clone()
        };

        debug!(id = stored.id, company = %stored.company_name, "Inserted supplier");
        Ok(stored)
    }
}
