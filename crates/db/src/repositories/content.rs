//! Content repository.

use std::sync::Arc;

use educa_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, Order, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};

use crate::db_error;
use crate::entities::{Content, ItemKind, Module, content, course, module};
use crate::ordering::OrderField;

/// Repository for content operations.
#[derive(Clone)]
pub struct ContentRepository {
    db: Arc<DatabaseConnection>,
}

impl ContentRepository {
    /// Content position, counted per module.
    pub const ORDER: OrderField<content::Entity> =
        OrderField::new(content::Column::Order, &[content::Column::ModuleId]);

    /// Create a new content repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find content by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<content::Model>> {
        Content::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Find content by ID, only if its course is owned by `owner_id`.
    pub async fn find_owned(&self, id: &str, owner_id: &str) -> AppResult<Option<content::Model>> {
        Content::find_by_id(id)
            .inner_join(Module)
            .join(JoinType::InnerJoin, module::Relation::Course.def())
            .filter(course::Column::OwnerId.eq(owner_id))
            .one(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Contents of a module, by position.
    pub async fn find_by_module(&self, module_id: &str) -> AppResult<Vec<content::Model>> {
        Content::find()
            .filter(content::Column::ModuleId.eq(module_id))
            .order_by(content::Column::Order, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(db_error)
    }

    /// Create a content, assigning the next position in its module when
    /// `order` is not set.
    pub async fn create(&self, model: content::ActiveModel) -> AppResult<content::Model> {
        Self::ORDER.insert(self.db.as_ref(), model).await
    }

    /// Update a content. Moving onto a taken position surfaces as a conflict.
    pub async fn update(&self, model: content::ActiveModel) -> AppResult<content::Model> {
        model.update(self.db.as_ref()).await.map_err(db_error)
    }

    /// Delete every content row pointing at an item.
    pub async fn delete_by_item(&self, item_type: ItemKind, item_id: &str) -> AppResult<u64> {
        let result = Content::delete_many()
            .filter(content::Column::ItemType.eq(item_type))
            .filter(content::Column::ItemId.eq(item_id))
            .exec(self.db.as_ref())
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected)
    }

    /// Delete a content row. The referenced item is left untouched.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Content::delete_by_id(id)
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

    fn create_test_content(id: &str, module_id: &str, order: i32) -> content::Model {
        content::Model {
            id: id.to_string(),
            module_id: module_id.to_string(),
            item_type: ItemKind::Video,
            item_id: "v1".to_string(),
            order,
        }
    }

    #[tokio::test]
    async fn test_create_first_content_gets_zero() {
        let stored = create_test_content("ct1", "m1", 0);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[btreemap! { "max_order" => Value::Int(None) }]])
                .append_query_results([[stored.clone()]])
                .into_connection(),
        );

        let repo = ContentRepository::new(db);
        let result = repo
            .create(content::ActiveModel {
                id: Set("ct1".to_string()),
                module_id: Set("m1".to_string()),
                item_type: Set(ItemKind::Video),
                item_id: Set("v1".to_string()),
                order: NotSet,
            })
            .await
            .unwrap();

        assert_eq!(result.order, 0);
    }

    #[tokio::test]
    async fn test_find_owned_joins_through_course() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<content::Model>::new()])
                .into_connection(),
        );

        let repo = ContentRepository::new(db.clone());
        assert!(repo.find_owned("ct1", "user2").await.unwrap().is_none());

        drop(repo);
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let sql = format!("{log:?}");
        assert_eq!(sql.matches("INNER JOIN").count(), 2);
        assert!(sql.contains("owner_id"));
    }
}
