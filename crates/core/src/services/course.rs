//! Course service.

use async_trait::async_trait;
use chrono::Utc;
use educa_common::{AppError, AppResult, IdGenerator};
use educa_db::entities::{course, subject};
use educa_db::repositories::{CourseRepository, SubjectRepository};
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::ownership::{Actor, Attributed, OwnerScoped, RecordStore};
use super::subject::validate_slug;

/// Editable course fields.
///
/// `owner_id` is always replaced by the acting user before the course is
/// persisted.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CourseFields {
    #[serde(default)]
    pub owner_id: String,
    pub subject_id: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
    #[serde(default)]
    pub overview: String,
}

impl Attributed for CourseFields {
    fn set_owner(&mut self, owner_id: &str) {
        owner_id.clone_into(&mut self.owner_id);
    }
}

/// Course persistence without any ownership policy.
#[derive(Clone)]
pub struct CourseStore {
    course_repo: CourseRepository,
    subject_repo: SubjectRepository,
    id_gen: IdGenerator,
}

impl CourseStore {
    /// Create a new course store.
    #[must_use]
    pub const fn new(course_repo: CourseRepository, subject_repo: SubjectRepository) -> Self {
        Self {
            course_repo,
            subject_repo,
            id_gen: IdGenerator::new(),
        }
    }

    async fn check_subject(&self, subject_id: &str) -> AppResult<subject::Model> {
        self.subject_repo
            .find_by_id(subject_id)
            .await?
            .ok_or_else(|| AppError::Validation(format!("Unknown subject: {subject_id}")))
    }
}

#[async_trait]
impl RecordStore for CourseStore {
    type Record = course::Model;
    type Fields = CourseFields;

    fn name(&self) -> &'static str {
        "Course"
    }

    async fn list_owned(&self, owner_id: &str) -> AppResult<Vec<course::Model>> {
        self.course_repo.find_by_owner(owner_id).await
    }

    async fn find_owned(&self, id: &str, owner_id: &str) -> AppResult<Option<course::Model>> {
        self.course_repo.find_owned(id, owner_id).await
    }

    async fn insert(&self, fields: CourseFields) -> AppResult<course::Model> {
        fields.validate()?;
        self.check_subject(&fields.subject_id).await?;

        let model = course::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(fields.owner_id),
            subject_id: Set(fields.subject_id),
            title: Set(fields.title),
            slug: Set(fields.slug),
            overview: Set(fields.overview),
            created_at: Set(Utc::now().into()),
        };

        self.course_repo.create(model).await
    }

    async fn update(
        &self,
        current: course::Model,
        fields: CourseFields,
    ) -> AppResult<course::Model> {
        fields.validate()?;
        if fields.subject_id != current.subject_id {
            self.check_subject(&fields.subject_id).await?;
        }

        let mut model: course::ActiveModel = current.into();
        model.owner_id = Set(fields.owner_id);
        model.subject_id = Set(fields.subject_id);
        model.title = Set(fields.title);
        model.slug = Set(fields.slug);
        model.overview = Set(fields.overview);

        self.course_repo.update(model).await
    }

    async fn delete(&self, current: course::Model) -> AppResult<()> {
        self.course_repo.delete(&current.id).await?;
        Ok(())
    }
}

/// Service for managing courses.
///
/// Mutations and the instructor views go through [`OwnerScoped`]; the
/// catalog views are public and unfiltered.
#[derive(Clone)]
pub struct CourseService {
    owned: OwnerScoped<CourseStore>,
    course_repo: CourseRepository,
    subject_repo: SubjectRepository,
}

impl CourseService {
    /// Create a new course service.
    #[must_use]
    pub fn new(course_repo: CourseRepository, subject_repo: SubjectRepository) -> Self {
        Self {
            owned: OwnerScoped::new(CourseStore::new(
                course_repo.clone(),
                subject_repo.clone(),
            )),
            course_repo,
            subject_repo,
        }
    }

    // ==================== Instructor views ====================

    /// Courses owned by the actor, newest first.
    pub async fn list_owned(&self, actor: &Actor) -> AppResult<Vec<course::Model>> {
        self.owned.list(actor).await
    }

    /// One of the actor's courses.
    pub async fn get_owned(&self, actor: &Actor, id: &str) -> AppResult<course::Model> {
        self.owned.get(actor, id).await
    }

    /// Create a course owned by the actor.
    pub async fn create(&self, actor: &Actor, fields: CourseFields) -> AppResult<course::Model> {
        let course = self.owned.create(actor, fields).await?;
        info!(course_id = %course.id, slug = %course.slug, "Course created");
        Ok(course)
    }

    /// Update one of the actor's courses.
    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        fields: CourseFields,
    ) -> AppResult<course::Model> {
        self.owned.update(actor, id, fields).await
    }

    /// Delete one of the actor's courses with its modules and contents.
    pub async fn delete(&self, actor: &Actor, id: &str) -> AppResult<()> {
        self.owned.delete(actor, id).await
    }

    // ==================== Catalog views ====================

    /// All courses, newest first.
    pub async fn list_all(&self, limit: u64, offset: u64) -> AppResult<Vec<course::Model>> {
        self.course_repo.find_all(limit, offset).await
    }

    /// Courses filed under the subject with `subject_slug`, newest first.
    pub async fn list_by_subject(
        &self,
        subject_slug: &str,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<course::Model>> {
        let subject = self
            .subject_repo
            .find_by_slug(subject_slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Subject not found: {subject_slug}")))?;

        self.course_repo
            .find_by_subject(&subject.id, limit, offset)
            .await
    }

    /// A course by slug.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<course::Model> {
        self.course_repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course not found: {slug}")))
    }
}
