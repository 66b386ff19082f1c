//! Generic paginated CRUD repository.
//!
//! The catalog tables (categories, projects, experiences, services, social
//! links) all need the same five operations. One parameterized repository
//! covers them; per-entity behavior lives in the route handlers that build
//! the active models.

use std::marker::PhantomData;
use std::sync::Arc;

use folio_shared::{AppError, AppResult, PageRequest, PageResponse};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, PrimaryKeyTrait, QueryOrder, SqlErr,
};

/// Maps a `SeaORM` error onto the application error taxonomy.
///
/// Constraint violations become typed client errors instead of opaque 500s:
/// unique violations are conflicts, foreign key violations are validation
/// errors (the referenced row does not exist).
pub fn map_db_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => AppError::Conflict(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => AppError::Validation(msg),
        _ => match err {
            DbErr::RecordNotFound(msg) => AppError::NotFound(msg),
            DbErr::RecordNotUpdated => AppError::NotFound("record not found".to_string()),
            other => AppError::Database(other.to_string()),
        },
    }
}

/// Paginated CRUD over a single entity.
#[derive(Debug, Clone)]
pub struct CrudRepository<E> {
    db: Arc<DatabaseConnection>,
    _entity: PhantomData<E>,
}

impl<E> CrudRepository<E>
where
    E: EntityTrait,
    E::Model: Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
{
    /// Creates a new repository over the given connection.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// Fetches one page of rows, ordered by the given column.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the query fails.
    pub async fn page(
        &self,
        request: PageRequest,
        order: E::Column,
    ) -> AppResult<PageResponse<E::Model>> {
        let request = request.clamped();
        let paginator = E::find()
            .order_by_asc(order)
            .paginate(&*self.db, request.limit());

        let total = paginator.num_items().await.map_err(map_db_err)?;
        let items = paginator
            .fetch_page(request.page_index())
            .await
            .map_err(map_db_err)?;

        Ok(PageResponse::new(
            items,
            request.page,
            request.per_page,
            total,
        ))
    }

    /// Finds a row by id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the query fails.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<E::Model>> {
        E::find_by_id(id).one(&*self.db).await.map_err(map_db_err)
    }

    /// Inserts a new row.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Conflict` on unique violations,
    /// `AppError::Validation` on foreign key violations.
    pub async fn insert<A>(&self, model: A) -> AppResult<E::Model>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        model.insert(&*self.db).await.map_err(map_db_err)
    }

    /// Updates an existing row.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` when the row no longer exists,
    /// `AppError::Conflict` on unique violations.
    pub async fn update<A>(&self, model: A) -> AppResult<E::Model>
    where
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::Model: IntoActiveModel<A>,
    {
        model.update(&*self.db).await.map_err(map_db_err)
    }

    /// Deletes a row by id. Returns false when no row existed.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the delete fails.
    pub async fn delete_by_id(&self, id: i32) -> AppResult<bool> {
        let result = E::delete_by_id(id)
            .exec(&*self.db)
            .await
            .map_err(map_db_err)?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set, Value};

    use super::*;
    use crate::entities::categories;

    fn category(id: i32, name: &str) -> categories::Model {
        categories::Model {
            id,
            name: name.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn count_row(total: i64) -> BTreeMap<&'static str, Value> {
        let mut row = BTreeMap::new();
        row.insert("num_items", Value::BigInt(Some(total)));
        row
    }

    #[tokio::test]
    async fn test_page_returns_items_and_meta() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(3)]])
            .append_query_results([vec![category(1, "Web"), category(2, "CLI")]])
            .into_connection();

        let repo = CrudRepository::<categories::Entity>::new(Arc::new(db));
        let page = repo
            .page(
                PageRequest {
                    page: 1,
                    per_page: 2,
                },
                categories::Column::Id,
            )
            .await
            .unwrap();

        assert_eq!(page.data.len(), 2);
        assert_eq!(page.meta.total, 3);
        assert_eq!(page.meta.total_pages, 2);
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![category(7, "Embedded")]])
            .append_query_results([Vec::<categories::Model>::new()])
            .into_connection();

        let repo = CrudRepository::<categories::Entity>::new(Arc::new(db));

        let found = repo.find_by_id(7).await.unwrap();
        assert_eq!(found.map(|c| c.name), Some("Embedded".to_string()));

        let missing = repo.find_by_id(99).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_insert_returns_created_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![category(1, "Web")]])
            .into_connection();

        let repo = CrudRepository::<categories::Entity>::new(Arc::new(db));
        let created = repo
            .insert(categories::ActiveModel {
                name: Set("Web".to_string()),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(created.name, "Web");
    }

    #[tokio::test]
    async fn test_delete_by_id_reports_existence() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        let repo = CrudRepository::<categories::Entity>::new(Arc::new(db));
        assert!(repo.delete_by_id(1).await.unwrap());
        assert!(!repo.delete_by_id(1).await.unwrap());
    }

    #[test]
    fn test_map_db_err_not_found() {
        assert!(matches!(
            map_db_err(DbErr::RecordNotFound("category".to_string())),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            map_db_err(DbErr::RecordNotUpdated),
            AppError::NotFound(_)
        ));
    }

    #[test]
    fn test_map_db_err_fallback_is_database() {
        assert!(matches!(
            map_db_err(DbErr::Custom("boom".to_string())),
            AppError::Database(_)
        ));
    }
}
