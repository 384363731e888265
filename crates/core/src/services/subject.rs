//! Subject service.

use educa_common::{AppError, AppResult, IdGenerator};
use educa_db::entities::subject;
use educa_db::repositories::SubjectRepository;
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::{Validate, ValidationError};

/// Maximum slug length, shared by subjects and courses.
pub const MAX_SLUG_LEN: usize = 200;

/// Input for creating or updating a subject.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubjectInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,
}

/// Check that a slug is non-empty lower-case ASCII letters, digits, `-` or `_`.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
        return Err(ValidationError::new("slug_length"));
    }

    let valid = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !valid {
        return Err(ValidationError::new("slug_format"));
    }

    Ok(())
}

/// Service for the subject catalog.
///
/// Subjects have no owner and are administered outside the ownership layer.
#[derive(Clone)]
pub struct SubjectService {
    subject_repo: SubjectRepository,
    id_gen: IdGenerator,
}

impl SubjectService {
    /// Create a new subject service.
    #[must_use]
    pub const fn new(subject_repo: SubjectRepository) -> Self {
        Self {
            subject_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// All subjects, by title.
    pub async fn list(&self) -> AppResult<Vec<subject::Model>> {
        self.subject_repo.find_all().await
    }

    /// Get a subject by slug.
    pub async fn get_by_slug(&self, slug: &str) -> AppResult<subject::Model> {
        self.subject_repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Subject not found: {slug}")))
    }

    /// Create a subject. A taken slug is a conflict.
    pub async fn create(&self, input: SubjectInput) -> AppResult<subject::Model> {
        input.validate()?;

        let model = subject::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            slug: Set(input.slug),
        };
        let subject = self.subject_repo.create(model).await?;

        info!(subject_id = %subject.id, slug = %subject.slug, "Subject created");
        Ok(subject)
    }

    /// Replace a subject's title and slug.
    pub async fn update(&self, id: &str, input: SubjectInput) -> AppResult<subject::Model> {
        input.validate()?;

        let existing = self
            .subject_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Subject not found: {id}")))?;

        let mut model: subject::ActiveModel = existing.into();
        model.title = Set(input.title);
        model.slug = Set(input.slug);

        self.subject_repo.update(model).await
    }

    /// Delete a subject along with every course filed under it.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.subject_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Subject not found: {id}")));
        }

        info!(subject_id = %id, "Subject deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_subject(id: &str, slug: &str) -> subject::Model {
        subject::Model {
            id: id.to_string(),
            title: "Mathematics".to_string(),
            slug: slug.to_string(),
        }
    }

    fn input(title: &str, slug: &str) -> SubjectInput {
        SubjectInput {
            title: title.to_string(),
            slug: slug.to_string(),
        }
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("mathematics").is_ok());
        assert!(validate_slug("intro-to_rust-2").is_ok());

        assert!(validate_slug("").is_err());
        assert!(validate_slug("Mathematics").is_err());
        assert!(validate_slug("with space").is_err());
        assert!(validate_slug("caf\u{e9}").is_err());
        assert!(validate_slug(&"a".repeat(MAX_SLUG_LEN + 1)).is_err());
    }

    #[test]
    fn test_input_validation() {
        assert!(input("Mathematics", "mathematics").validate().is_ok());
        assert!(input("", "mathematics").validate().is_err());
        assert!(input(&"t".repeat(201), "mathematics").validate().is_err());
        assert!(input("Mathematics", "Bad Slug").validate().is_err());
    }

    #[tokio::test]
    async fn test_create_rejects_bad_slug_before_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = SubjectService::new(SubjectRepository::new(db));

        let err = service.create(input("Maths", "Maths!")).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create() {
        let subject = create_test_subject("s1", "mathematics");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[subject.clone()]])
                .into_connection(),
        );
        let service = SubjectService::new(SubjectRepository::new(db));

        let created = service
            .create(input("Mathematics", "mathematics"))
            .await
            .unwrap();

        assert_eq!(created.slug, "mathematics");
    }

    #[tokio::test]
    async fn test_get_by_slug_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<subject::Model>::new()])
                .into_connection(),
        );
        let service = SubjectService::new(SubjectRepository::new(db));

        let err = service.get_by_slug("physics").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );
        let service = SubjectService::new(SubjectRepository::new(db));

        let err = service.delete("s1").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
