//! Content service: placing items inside modules.

use educa_common::{AppError, AppResult, IdGenerator};
use educa_db::entities::{ItemKind, content, module};
use educa_db::repositories::{ContentRepository, Item, ItemRepository, ModuleRepository};
use sea_orm::{NotSet, Set};
use serde::Serialize;
use tracing::{info, warn};

use super::item::{ItemFields, ItemService};
use super::ownership::Actor;

/// A content row together with the item it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleContent {
    pub content: content::Model,
    pub item: Item,
}

/// Service for managing the contents of owned modules.
#[derive(Clone)]
pub struct ContentService {
    content_repo: ContentRepository,
    module_repo: ModuleRepository,
    item_repo: ItemRepository,
    items: ItemService,
    id_gen: IdGenerator,
}

impl ContentService {
    /// Create a new content service.
    #[must_use]
    pub fn new(
        content_repo: ContentRepository,
        module_repo: ModuleRepository,
        item_repo: ItemRepository,
    ) -> Self {
        Self {
            items: ItemService::new(item_repo.clone(), content_repo.clone()),
            content_repo,
            module_repo,
            item_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Contents of one of the actor's modules, by position.
    ///
    /// Rows whose item no longer exists are skipped.
    pub async fn list(&self, actor: &Actor, module_id: &str) -> AppResult<Vec<ModuleContent>> {
        self.owned_module(actor, module_id).await?;

        let rows = self.content_repo.find_by_module(module_id).await?;
        let mut contents = Vec::with_capacity(rows.len());
        for content in rows {
            match self.item_repo.find(content.item_type, &content.item_id).await? {
                Some(item) => contents.push(ModuleContent { content, item }),
                None => warn!(
                    content_id = %content.id,
                    item_type = %content.item_type,
                    item_id = %content.item_id,
                    "Content points at a missing item"
                ),
            }
        }

        Ok(contents)
    }

    /// Place one of the actor's items in one of the actor's modules.
    ///
    /// Without an explicit `order` the item goes after the module's last
    /// content.
    pub async fn attach(
        &self,
        actor: &Actor,
        module_id: &str,
        kind: ItemKind,
        item_id: &str,
        order: Option<i32>,
    ) -> AppResult<content::Model> {
        check_order(order)?;
        self.owned_module(actor, module_id).await?;

        if self
            .item_repo
            .find_owned(kind, item_id, actor.user_id())
            .await?
            .is_none()
        {
            return Err(AppError::Validation(format!(
                "{kind} item does not exist: {item_id}"
            )));
        }

        let model = content::ActiveModel {
            id: Set(self.id_gen.generate()),
            module_id: Set(module_id.to_string()),
            item_type: Set(kind),
            item_id: Set(item_id.to_string()),
            order: order.map_or(NotSet, Set),
        };
        let content = self.content_repo.create(model).await?;

        info!(
            content_id = %content.id,
            module_id = %module_id,
            item_type = %kind,
            order = content.order,
            "Content attached"
        );
        Ok(content)
    }

    /// Create an item and append it to one of the actor's modules.
    ///
    /// If the item cannot be placed it is deleted again, so a failed call
    /// leaves nothing behind and can be retried as is.
    pub async fn add_item(
        &self,
        actor: &Actor,
        module_id: &str,
        fields: ItemFields,
    ) -> AppResult<ModuleContent> {
        self.owned_module(actor, module_id).await?;

        let item = self.items.create(actor, fields).await?;
        match self
            .attach(actor, module_id, item.kind(), &item.id, None)
            .await
        {
            Ok(content) => Ok(ModuleContent { content, item }),
            Err(err) => {
                if let Err(cleanup) = self.item_repo.delete(item.kind(), &item.id).await {
                    warn!(
                        item_id = %item.id,
                        error = %cleanup,
                        "Failed to remove item after attach failed"
                    );
                }
                Err(err)
            }
        }
    }

    /// Move one of the actor's contents to an explicit position.
    ///
    /// Moving onto a taken position is a conflict.
    pub async fn move_to(
        &self,
        actor: &Actor,
        content_id: &str,
        order: i32,
    ) -> AppResult<content::Model> {
        check_order(Some(order))?;
        let existing = self.owned_content(actor, content_id).await?;

        let mut model: content::ActiveModel = existing.into();
        model.order = Set(order);

        self.content_repo.update(model).await
    }

    /// Remove a content from its module and delete the item it points at.
    ///
    /// Deleting the item removes every content pointing at it, this one
    /// included; the row is only deleted on its own when the item is gone.
    pub async fn detach(&self, actor: &Actor, content_id: &str) -> AppResult<()> {
        let content = self.owned_content(actor, content_id).await?;

        match self
            .items
            .delete(actor, content.item_type, &content.item_id)
            .await
        {
            Ok(()) => {}
            Err(AppError::NotFound(_)) => {
                self.content_repo.delete(&content.id).await?;
            }
            Err(err) => return Err(err),
        }

        info!(content_id = %content_id, module_id = %content.module_id, "Content detached");
        Ok(())
    }

    async fn owned_module(&self, actor: &Actor, module_id: &str) -> AppResult<module::Model> {
        self.module_repo
            .find_owned(module_id, actor.user_id())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Module not found: {module_id}")))
    }

    async fn owned_content(&self, actor: &Actor, content_id: &str) -> AppResult<content::Model> {
        self.content_repo
            .find_owned(content_id, actor.user_id())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Content not found: {content_id}")))
    }
}

fn check_order(order: Option<i32>) -> AppResult<()> {
    match order {
        Some(order) if order < 0 => Err(AppError::Validation(format!(
            "Order must not be negative: {order}"
        ))),
        _ => Ok(()),
    }
}
