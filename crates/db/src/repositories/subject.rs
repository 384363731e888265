//! Subject repository.

use std::sync::Arc;

use educa_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder,
};

use crate::db_error;
use crate::entities::{Subject, subject};

/// Repository for subject operations.
#[derive(Clone)]
pub struct SubjectRepository {
    db: Arc<DatabaseConnection>,
}

impl SubjectRepository {
    /// Create a new subject repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find subject by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<subject::Model>> {
        Subject::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Find subject by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<subject::Model>> {
        Subject::find()
            .filter(subject::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// All subjects, ordered by title.
    pub async fn find_all(&self) -> AppResult<Vec<subject::Model>> {
        Subject::find()
            .order_by(subject::Column::Title, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Create a subject. A taken slug surfaces as a conflict.
    pub async fn create(&self, model: subject::ActiveModel) -> AppResult<subject::Model> {
        model.insert(self.db.as_ref()).await.map_err(db_error)
    }

    /// Update a subject.
    pub async fn update(&self, model: subject::ActiveModel) -> AppResult<subject::Model> {
        model.update(self.db.as_ref()).await.map_err(db_error)
    }

    /// Delete a subject. Its courses cascade.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Subject::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_subject(id: &str, title: &str, slug: &str) -> subject::Model {
        subject::Model {
            id: id.to_string(),
            title: title.to_string(),
            slug: slug.to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_all() {
        let maths = create_test_subject("s1", "Mathematics", "mathematics");
        let music = create_test_subject("s2", "Music", "music");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maths, music]])
                .into_connection(),
        );

        let repo = SubjectRepository::new(db);
        let result = repo.find_all().await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].slug, "mathematics");
    }

    #[tokio::test]
    async fn test_find_by_slug_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<subject::Model>::new()])
                .into_connection(),
        );

        let repo = SubjectRepository::new(db);
        assert!(repo.find_by_slug("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = SubjectRepository::new(db);
        assert!(repo.delete("s1").await.unwrap());
    }
}
