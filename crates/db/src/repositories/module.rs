//! Module repository.

use std::sync::Arc;

use educa_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder,
};

use crate::db_error;
use crate::entities::{Course, Module, course, module};
use crate::ordering::OrderField;

/// Repository for module operations.
#[derive(Clone)]
pub struct ModuleRepository {
    db: Arc<DatabaseConnection>,
}

impl ModuleRepository {
    /// Module position, counted per course.
    pub const ORDER: OrderField<module::Entity> =
        OrderField::new(module::Column::Order, &[module::Column::CourseId]);

    /// Create a new module repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find module by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<module::Model>> {
        Module::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Find a module by ID, only if its course is owned by `owner_id`.
    pub async fn find_owned(&self, id: &str, owner_id: &str) -> AppResult<Option<module::Model>> {
        Module::find_by_id(id)
            .inner_join(Course)
            .filter(course::Column::OwnerId.eq(owner_id))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Modules of a course, by position.
    pub async fn find_by_course(&self, course_id: &str) -> AppResult<Vec<module::Model>> {
        Module::find()
            .filter(module::Column::CourseId.eq(course_id))
            .order_by(module::Column::Order, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Create a module, assigning the next position in its course when
    /// `order` is not set.
    pub async fn create(&self, model: module::ActiveModel) -> AppResult<module::Model> {
        Self::ORDER.insert(self.db.as_ref(), model).await
    }

    /// Update a module. Moving onto a taken position surfaces as a conflict.
    pub async fn update(&self, model: module::ActiveModel) -> AppResult<module::Model> {
        model.update(self.db.as_ref()).await.map_err(db_error)
    }

    /// Delete a module (and its contents due to CASCADE).
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Module::delete_by_id(id)
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
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, NotSet, Set, Value};

    fn create_test_module(id: &str, course_id: &str, order: i32) -> module::Model {
        module::Model {
            id: id.to_string(),
            course_id: course_id.to_string(),
            title: format!("Module {id}"),
            description: String::new(),
            order,
        }
    }

    fn new_module(id: &str, course_id: &str, order: Option<i32>) -> module::ActiveModel {
        module::ActiveModel {
            id: Set(id.to_string()),
            course_id: Set(course_id.to_string()),
            title: Set(format!("Module {id}")),
            description: Set(String::new()),
            order: order.map_or(NotSet, Set),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_next_order() {
        let stored = create_test_module("m3", "c1", 2);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[btreemap! { "max_order" => Value::Int(Some(1)) }]])
                .append_query_results([[stored.clone()]])
                .into_connection(),
        );

        let repo = ModuleRepository::new(db);
        let result = repo.create(new_module("m3", "c1", None)).await.unwrap();

        assert_eq!(result.order, 2);
    }

    #[tokio::test]
    async fn test_create_with_explicit_order_skips_lookup() {
        let stored = create_test_module("m3", "c1", 5);

        // Only the insert result is queued.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[stored.clone()]])
                .into_connection(),
        );

        let repo = ModuleRepository::new(db);
        let result = repo.create(new_module("m3", "c1", Some(5))).await.unwrap();

        assert_eq!(result, stored);
    }

    #[tokio::test]
    async fn test_find_by_course() {
        let m1 = create_test_module("m1", "c1", 0);
        let m2 = create_test_module("m2", "c1", 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[m1, m2]])
                .into_connection(),
        );

        let repo = ModuleRepository::new(db);
        let result = repo.find_by_course("c1").await.unwrap();

        assert_eq!(result.iter().map(|m| m.order).collect::<Vec<_>>(), [0, 1]);
    }

    #[tokio::test]
    async fn test_find_owned_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<module::Model>::new()])
                .into_connection(),
        );

        let repo = ModuleRepository::new(db);
        assert!(repo.find_owned("m1", "intruder").await.unwrap().is_none());
    }
}
