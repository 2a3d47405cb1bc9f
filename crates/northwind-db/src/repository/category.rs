//! # Category Repository
//!
//! Category CRUD, including the sample's only multi-statement unit of work.
//!
//! ## Delete Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  delete(id)                                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │       │                                                                 │
//! │       ├── SELECT ... WHERE id = ?  ── no row ──► drop tx (ROLLBACK)    │
//! │       │                                          Err(NotFound)         │
//! │       ▼                                                                 │
//! │  DELETE FROM categories WHERE id = ?  ── error ──► drop tx (ROLLBACK)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COMMIT ──► Ok(deleted category)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{Connection, SqliteConnection};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::InsertOutcome;
use northwind_core::validation::validate_category;
use northwind_core::Category;

const SELECT_BY_ID: &str = "SELECT id, name, description FROM categories WHERE id = ?1";

/// Repository for category database operations.
///
/// ## Usage
/// ```rust,ignore
/// let mut session = db.session().await?;
/// let outcome = session
///     .categories()
///     .insert_if_absent(&Category::new(9, "Frozen", None))
///     .await?;
/// ```
#[derive(Debug)]
pub struct CategoryRepository<'s> {
    conn: &'s mut SqliteConnection,
}

impl<'s> CategoryRepository<'s> {
    pub fn new(conn: &'s mut SqliteConnection) -> Self {
        CategoryRepository { conn }
    }

    /// Gets a category by id. `None` when it does not exist.
    pub async fn get_by_id(&mut self, id: i64) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(category)
    }

    /// All categories in id order.
    pub async fn list(&mut self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories ORDER BY id",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        debug!(count = categories.len(), "Listed categories");
        Ok(categories)
    }

    /// Inserts a category.
    ///
    /// A positive `id` is stored as given; zero or negative lets SQLite
    /// assign the next one. Returns the category as stored.
    ///
    /// ## Errors
    /// - `DbError::Validation` - name empty or too long
    /// - `DbError::UniqueViolation` - the id is taken
    pub async fn insert(&mut self, category: &Category) -> DbResult<Category> {
        validate_category(category)?;

        let explicit_id = (category.id > 0).then_some(category.id);

        let result =
            sqlx::query("INSERT INTO categories (id, name, description) VALUES (?1, ?2, ?3)")
                .bind(explicit_id)
                .bind(&category.name)
                .bind(&category.description)
                .execute(&mut *self.conn)
                .await
                .map_err(|e| DbError::from(e).duplicate_of(category.id))?;

        let stored = Category {
            id: result.last_insert_rowid(),
            ..category.clone()
        };

        info!(id = stored.id, name = %stored.name, "Inserted category");
        Ok(stored)
    }

    /// Inserts the category unless a row with its id already exists.
    ///
    /// The existing row is left untouched and returned as
    /// [`InsertOutcome::AlreadyExists`].
    pub async fn insert_if_absent(&mut self, category: &Category) -> DbResult<InsertOutcome<Category>> {
        if let Some(existing) = self.get_by_id(category.id).await? {
            debug!(id = category.id, "Category already exists, skipping insert");
            return Ok(InsertOutcome::AlreadyExists(existing));
        }

        let stored = self.insert(category).await?;
        Ok(InsertOutcome::Inserted(stored))
    }

    /// Writes name and description of an existing category.
    ///
    /// ## Errors
    /// `DbError::NotFound` if no row has `category.id`.
    pub async fn update(&mut self, category: &Category) -> DbResult<()> {
        validate_category(category)?;

        let result = sqlx::query("UPDATE categories SET name = ?2, description = ?3 WHERE id = ?1")
            .bind(category.id)
            .bind(&category.name)
            .bind(&category.description)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", category.id));
        }

        debug!(id = category.id, "Updated category");
        Ok(())
    }

    /// Changes name and description of category `id`.
    ///
    /// Returns the updated category, or `None` (and writes nothing) when
    /// the id does not exist.
    pub async fn update_details(
        &mut self,
        id: i64,
        name: &str,
        description: Option<&str>,
    ) -> DbResult<Option<Category>> {
        let Some(mut category) = self.get_by_id(id).await? else {
            debug!(id, "No category to update");
            return Ok(None);
        };

        category.name = name.to_string();
        category.description = description.map(str::to_string);

        self.update(&category).await?;

        info!(id, name = %category.name, "Updated category details");
        Ok(Some(category))
    }

    /// Deletes category `id` inside a transaction and returns what was removed.
    ///
    /// On any failure the transaction is dropped uncommitted, which rolls it
    /// back: the store is left unchanged.
    ///
    /// ## Errors
    /// - `DbError::NotFound` - no such category
    /// - `DbError::ForeignKeyViolation` - products still reference it
    pub async fn delete(&mut self, id: i64) -> DbResult<Category> {
        let mut tx = self
            .conn
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let Some(category) = sqlx::query_as::<_, Category>(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            warn!(id, "Delete requested for missing category");
            return Err(DbError::not_found("Category", id));
        };

        sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id, name = %category.name, "Deleted category");
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::{category, memory_db, product};
    use crate::repository::InsertOutcome;
    use crate::DbError;
    use northwind_core::{Category, ValidationError};

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();

        let stored = session
            .categories()
            .insert(&category(1, "Beverages"))
            .await
            .unwrap();
        assert_eq!(stored.id, 1);

        let loaded = session.categories().get_by_id(1).await.unwrap();
        assert_eq!(loaded, Some(stored));
        assert!(session.categories().get_by_id(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_assigns_id_when_not_positive() {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();

        session.categories().insert(&category(7, "Produce")).await.unwrap();
        let stored = session
            .categories()
            .insert(&Category::new(0, "Seafood", None))
            .await
            .unwrap();

        assert_eq!(stored.id, 8);
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_name() {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();

        let err = session
            .categories()
            .insert(&Category::new(1, "", None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Required { .. })
        ));
        assert!(session.categories().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_unique_violation() {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();

        session.categories().insert(&category(1, "Beverages")).await.unwrap();
        let err = session
            .categories()
            .insert(&category(1, "Other"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "1"));
    }

    #[tokio::test]
    async fn test_insert_if_absent_twice_stores_one_row() {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();
        let frozen = Category::new(9, "Frozen", Some("Ice".to_string()));

        let first = session.categories().insert_if_absent(&frozen).await.unwrap();
        assert!(first.was_inserted());

        let renamed = Category::new(9, "Other name", None);
        let second = session.categories().insert_if_absent(&renamed).await.unwrap();
        assert_eq!(second, InsertOutcome::AlreadyExists(frozen.clone()));

        let all = session.categories().list().await.unwrap();
        assert_eq!(all, vec![frozen]);
    }

    #[tokio::test]
    async fn test_update_details() {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();
        session.categories().insert(&category(11, "Produce")).await.unwrap();

        let updated = session
            .categories()
            .update_details(11, "Fruit", Some("Fresh fruit"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Fruit");

        let loaded = session.categories().get_by_id(11).await.unwrap().unwrap();
        assert_eq!(loaded.description.as_deref(), Some("Fresh fruit"));
    }

    #[tokio::test]
    async fn test_update_details_missing_id_changes_nothing() {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();
        session.categories().insert(&category(3, "Produce")).await.unwrap();

        let result = session
            .categories()
            .update_details(42, "Ghost", None)
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(session.categories().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();

        let err = session
            .categories()
            .update(&category(5, "Nothing"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_returns_row_and_removes_it() {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();
        session.categories().insert(&category(9, "Frozen")).await.unwrap();

        let deleted = session.categories().delete(9).await.unwrap();
        assert_eq!(deleted.name, "Frozen");
        assert!(session.categories().get_by_id(9).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found_and_store_unchanged() {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();
        session.categories().insert(&category(1, "Beverages")).await.unwrap();

        let err = session.categories().delete(77).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, ref id } if entity == "Category" && id == "77"));

        assert_eq!(session.categories().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_referenced_category_rolls_back() {
        let db = memory_db().await;
        let mut session = db.session().await.unwrap();
        session.categories().insert(&category(1, "Beverages")).await.unwrap();
        session
            .products()
            .insert(&product(1, "Chai", 1800, 39, Some(1)))
            .await
            .unwrap();

        let err = session.categories().delete(1).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        // Still there, and the connection is usable after the rollback
        assert!(session.categories().get_by_id(1).await.unwrap().is_some());
    }
}
