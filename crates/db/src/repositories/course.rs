//! Course repository.

use std::sync::Arc;

use educa_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::db_error;
use crate::entities::{Course, course};

/// Repository for course operations.
#[derive(Clone)]
pub struct CourseRepository {
    db: Arc<DatabaseConnection>,
}

impl CourseRepository {
    /// Create a new course repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find course by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<course::Model>> {
        Course::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Find course by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<course::Model>> {
        Course::find()
            .filter(course::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Find a course by ID, only if `owner_id` owns it.
    pub async fn find_owned(&self, id: &str, owner_id: &str) -> AppResult<Option<course::Model>> {
        Course::find_by_id(id)
            .filter(course::Column::OwnerId.eq(owner_id))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Courses owned by a user, newest first.
    pub async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<course::Model>> {
        Course::find()
            .filter(course::Column::OwnerId.eq(owner_id))
            .order_by(course::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// All courses, newest first.
    pub async fn find_all(&self, limit: u64, offset: u64) -> AppResult<Vec<course::Model>> {
        Course::find()
            .order_by(course::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Courses filed under a subject, newest first.
    pub async fn find_by_subject(
        &self,
        subject_id: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<course::Model>> {
        Course::find()
            .filter(course::Column::SubjectId.eq(subject_id))
            .order_by(course::Column::CreatedAt, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Create a course. A taken slug surfaces as a conflict.
    pub async fn create(&self, model: course::ActiveModel) -> AppResult<course::Model> {
        model.insert(self.db.as_ref()).await.map_err(db_error)
    }

    /// Update a course.
    pub async fn update(&self, model: course::ActiveModel) -> AppResult<course::Model> {
        model.update(self.db.as_ref()).await.map_err(db_error)
    }

    /// Delete a course (and its modules and contents due to CASCADE).
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Course::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected > 0)
    }
}
