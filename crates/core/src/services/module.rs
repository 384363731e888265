//! Module service.
//!
//! Modules carry no owner of their own; a module belongs to whoever owns its
//! course, and a module of someone else's course is reported as missing.

use educa_common::{AppError, AppResult, IdGenerator};
use educa_db::entities::{course, module};
use educa_db::repositories::{CourseRepository, ModuleRepository};
use sea_orm::{NotSet, Set};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::ownership::Actor;

/// Input for creating or updating a module.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ModuleInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Explicit position. Left empty, new modules go after the last one.
    #[validate(range(min = 0))]
    pub order: Option<i32>,
}

/// Service for managing the modules of owned courses.
#[derive(Clone)]
pub struct ModuleService {
    module_repo: ModuleRepository,
    course_repo: CourseRepository,
    id_gen: IdGenerator,
}

impl ModuleService {
    /// Create a new module service.
    #[must_use]
    pub const fn new(module_repo: ModuleRepository, course_repo: CourseRepository) -> Self {
        Self {
            module_repo,
            course_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Modules of one of the actor's courses, by position.
    pub async fn list(&self, actor: &Actor, course_id: &str) -> AppResult<Vec<module::Model>> {
        self.owned_course(actor, course_id).await?;
        self.module_repo.find_by_course(course_id).await
    }

    /// One of the actor's modules.
    pub async fn get(&self, actor: &Actor, id: &str) -> AppResult<module::Model> {
        self.module_repo
            .find_owned(id, actor.user_id())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Module not found: {id}")))
    }

    /// Add a module to one of the actor's courses.
    pub async fn create(
        &self,
        actor: &Actor,
        course_id: &str,
        input: ModuleInput,
    ) -> AppResult<module::Model> {
        input.validate()?;
        self.owned_course(actor, course_id).await?;

        let model = module::ActiveModel {
            id: Set(self.id_gen.generate()),
            course_id: Set(course_id.to_string()),
            title: Set(input.title),
            description: Set(input.description),
            order: input.order.map_or(NotSet, Set),
        };
        let module = self.module_repo.create(model).await?;

        info!(
            module_id = %module.id,
            course_id = %course_id,
            order = module.order,
            "Module created"
        );
        Ok(module)
    }

    /// Update one of the actor's modules.
    ///
    /// The position only changes when `input.order` is given.
    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        input: ModuleInput,
    ) -> AppResult<module::Model> {
        input.validate()?;
        let existing = self.get(actor, id).await?;

        let mut model: module::ActiveModel = existing.into();
        model.title = Set(input.title);
        model.description = Set(input.description);
        if let Some(order) = input.order {
            model.order = Set(order);
        }

        self.module_repo.update(model).await
    }

    /// Delete one of the actor's modules with its contents.
    pub async fn delete(&self, actor: &Actor, id: &str) -> AppResult<()> {
        let module = self.get(actor, id).await?;
        self.module_repo.delete(&module.id).await?;

        info!(module_id = %id, course_id = %module.course_id, "Module deleted");
        Ok(())
    }

    async fn owned_course(&self, actor: &Actor, course_id: &str) -> AppResult<course::Model> {
        self.course_repo
            .find_owned(course_id, actor.user_id())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course not found: {course_id}")))
    }
}
