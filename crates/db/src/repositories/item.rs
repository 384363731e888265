//! Content item repository.
//!
//! Text, file, image and video items live in one table per kind but share
//! their bookkeeping columns. [`Item`] is the kind-independent view of a row;
//! [`ItemTable`] maps each [`ItemKind`] tag onto the table that stores it.

use std::sync::Arc;

use chrono::Utc;
use educa_common::{AppError, AppResult, MediaConfig};
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, NotSet, Order, QueryFilter, QueryOrder, Set, Unchanged,
};
use serde::{Deserialize, Serialize};

use crate::db_error;
use crate::entities::{ItemKind, file, image, text, video};

/// Kind-specific payload of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemPayload {
    /// Inline body text.
    Text { content: String },
    /// Blob key of an uploaded file.
    File { file: String },
    /// Blob key of an uploaded image.
    Image { file: String },
    /// URL of an externally hosted video.
    Video { url: String },
}

impl ItemPayload {
    /// The kind tag for this payload.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Text { .. } => ItemKind::Text,
            Self::File { .. } => ItemKind::File,
            Self::Image { .. } => ItemKind::Image,
            Self::Video { .. } => ItemKind::Video,
        }
    }

    fn into_column_value(self) -> String {
        match self {
            Self::Text { content } => content,
            Self::File { file } | Self::Image { file } => file,
            Self::Video { url } => url,
        }
    }
}

/// A content item of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    #[serde(flatten)]
    pub payload: ItemPayload,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Item {
    /// The kind tag for this item.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        self.payload.kind()
    }

    /// Public URL of the item's media, if it has any.
    ///
    /// Files and images resolve through the media configuration; videos are
    /// already absolute URLs.
    #[must_use]
    pub fn media_url(&self, media: &MediaConfig) -> Option<String> {
        match &self.payload {
            ItemPayload::Text { .. } => None,
            ItemPayload::File { file } | ItemPayload::Image { file } => Some(media.url_for(file)),
            ItemPayload::Video { url } => Some(url.clone()),
        }
    }
}

/// A table storing one kind of item.
pub trait ItemTable: EntityTrait {
    /// Active model of the table.
    type Active: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + Send;

    /// Tag stored in `content.item_type` for rows of this table.
    const KIND: ItemKind;

    /// Primary key column.
    fn id_column() -> Self::Column;
    /// Owning user column.
    fn owner_column() -> Self::Column;
    /// Creation timestamp column.
    fn created_column() -> Self::Column;

    /// Convert a row to the kind-independent view.
    fn into_item(model: Self::Model) -> Item;

    /// Row for a new item.
    fn new_row(
        id: String,
        owner_id: String,
        title: String,
        value: String,
        now: DateTimeWithTimeZone,
    ) -> Self::Active;

    /// Changes to an existing item. `updated_at` is always refreshed.
    fn edit_row(
        id: String,
        owner_id: String,
        title: String,
        value: String,
        now: DateTimeWithTimeZone,
    ) -> Self::Active;
}

macro_rules! item_table {
    ($table:ident, $kind:ident, $field:ident) => {
        impl ItemTable for $table::Entity {
            type Active = $table::ActiveModel;

            const KIND: ItemKind = ItemKind::$kind;

            fn id_column() -> $table::Column {
                $table::Column::Id
            }

            fn owner_column() -> $table::Column {
                $table::Column::OwnerId
            }

            fn created_column() -> $table::Column {
                $table::Column::CreatedAt
            }

            fn into_item(model: $table::Model) -> Item {
                Item {
                    id: model.id,
                    owner_id: model.owner_id,
                    title: model.title,
                    payload: ItemPayload::$kind {
                        $field: model.$field,
                    },
                    created_at: model.created_at,
                    updated_at: model.updated_at,
                }
            }

            fn new_row(
                id: String,
                owner_id: String,
                title: String,
                value: String,
                now: DateTimeWithTimeZone,
            ) -> $table::ActiveModel {
                $table::ActiveModel {
                    id: Set(id),
                    owner_id: Set(owner_id),
                    title: Set(title),
                    $field: Set(value),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
            }

            fn edit_row(
                id: String,
                owner_id: String,
                title: String,
                value: String,
                now: DateTimeWithTimeZone,
            ) -> $table::ActiveModel {
                $table::ActiveModel {
                    id: Unchanged(id),
                    owner_id: Set(owner_id),
                    title: Set(title),
                    $field: Set(value),
                    created_at: NotSet,
                    updated_at: Set(now),
                }
            }
        }
    };
}

item_table!(text, Text, content);
item_table!(file, File, file);
item_table!(image, Image, file);
item_table!(video, Video, url);

/// Run `$body` with `$t` bound to the table storing `$kind`.
macro_rules! with_table {
    ($kind:expr, $t:ident => $body:expr) => {
        match $kind {
            ItemKind::Text => {
                type $t = text::Entity;
                $body
            }
            ItemKind::File => {
                type $t = file::Entity;
                $body
            }
            ItemKind::Image => {
                type $t = image::Entity;
                $body
            }
            ItemKind::Video => {
                type $t = video::Entity;
                $body
            }
        }
    };
}

/// Repository for text, file, image and video items.
#[derive(Clone)]
pub struct ItemRepository {
    db: Arc<DatabaseConnection>,
}

impl ItemRepository {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Resolve a `(kind, id)` reference.
    pub async fn find(&self, kind: ItemKind, id: &str) -> AppResult<Option<Item>> {
        with_table!(kind, T => self.find_in::<T>(id, None).await)
    }

    /// Resolve a `(kind, id)` reference, only if `owner_id` owns the item.
    pub async fn find_owned(
        &self,
        kind: ItemKind,
        id: &str,
        owner_id: &str,
    ) -> AppResult<Option<Item>> {
        with_table!(kind, T => self.find_in::<T>(id, Some(owner_id)).await)
    }

    /// Items of one kind owned by a user, newest first.
    pub async fn find_by_owner(&self, kind: ItemKind, owner_id: &str) -> AppResult<Vec<Item>> {
        with_table!(kind, T => self.find_by_owner_in::<T>(owner_id).await)
    }

    /// Create an item; its table is chosen by the payload kind.
    pub async fn create(
        &self,
        id: String,
        owner_id: String,
        title: String,
        payload: ItemPayload,
    ) -> AppResult<Item> {
        let kind = payload.kind();
        let value = payload.into_column_value();
        let now: DateTimeWithTimeZone = Utc::now().into();

        with_table!(kind, T => {
            self.save_in::<T>(T::new_row(id, owner_id, title, value, now), true)
                .await
        })
    }

    /// Replace an item's owner, title and payload.
    ///
    /// The payload must keep the item's kind; an item cannot move tables.
    pub async fn update(
        &self,
        item: &Item,
        owner_id: String,
        title: String,
        payload: ItemPayload,
    ) -> AppResult<Item> {
        let kind = item.kind();
        if payload.kind() != kind {
            return Err(AppError::Validation(format!(
                "Cannot change a {kind} item into a {}",
                payload.kind()
            )));
        }

        let value = payload.into_column_value();
        let now: DateTimeWithTimeZone = Utc::now().into();

        with_table!(kind, T => {
            self.save_in::<T>(T::edit_row(item.id.clone(), owner_id, title, value, now), false)
                .await
        })
    }

    /// Delete an item.
    pub async fn delete(&self, kind: ItemKind, id: &str) -> AppResult<bool> {
        with_table!(kind, T => self.delete_in::<T>(id).await)
    }

    // ==================== Per-table helpers ====================

    async fn find_in<T: ItemTable>(
        &self,
        id: &str,
        owner_id: Option<&str>,
    ) -> AppResult<Option<Item>> {
        let mut query = T::find().filter(T::id_column().eq(id));
        if let Some(owner_id) = owner_id {
            query = query.filter(T::owner_column().eq(owner_id));
        }

        query
            .one(self.db.as_ref())
            .await
            .map(|row| row.map(T::into_item))
            .map_err(db_error)
    }

    async fn find_by_owner_in<T: ItemTable>(&self, owner_id: &str) -> AppResult<Vec<Item>> {
        T::find()
            .filter(T::owner_column().eq(owner_id))
            .order_by(T::created_column(), Order::Desc)
            .all(self.db.as_ref())
            .await
            .map(|rows| rows.into_iter().map(T::into_item).collect())
            .map_err(db_error)
    }

    async fn save_in<T>(&self, row: T::Active, insert: bool) -> AppResult<Item>
    where
        T: ItemTable,
        T::Model: IntoActiveModel<T::Active>,
    {
        let saved = if insert {
            row.insert(self.db.as_ref()).await
        } else {
            row.update(self.db.as_ref()).await
        };

        saved.map(T::into_item).map_err(db_error)
    }

    async fn delete_in<T: ItemTable>(&self, id: &str) -> AppResult<bool> {
        let result = T::delete_many()
            .filter(T::id_column().eq(id))
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

    fn create_test_video(id: &str, owner_id: &str) -> video::Model {
        let now = Utc::now().into();
        video::Model {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            title: "Lecture".to_string(),
            url: "https://video.example.com/watch/1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn create_test_text(id: &str, owner_id: &str) -> text::Model {
        let now = Utc::now().into();
        text::Model {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            title: "Notes".to_string(),
            content: "Ownership rules".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_payload_kind() {
        assert_eq!(
            ItemPayload::Text {
                content: String::new()
            }
            .kind(),
            ItemKind::Text
        );
        assert_eq!(
            ItemPayload::Image {
                file: "images/a.png".to_string()
            }
            .kind(),
            ItemKind::Image
        );
    }

    #[test]
    fn test_item_serializes_with_type_tag() {
        let item = text::Entity::into_item(create_test_text("t1", "u1"));
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["type"], "text");
        assert_eq!(json["content"], "Ownership rules");
        assert_eq!(json["owner_id"], "u1");
    }

    #[test]
    fn test_media_url() {
        let media = MediaConfig {
            root: "/srv/media".into(),
            base_url: "https://cdn.example.com/media".to_string(),
        };
        let mut item = text::Entity::into_item(create_test_text("t1", "u1"));
        assert_eq!(item.media_url(&media), None);

        item.payload = ItemPayload::Image {
            file: "images/cat.png".to_string(),
        };
        assert_eq!(
            item.media_url(&media).as_deref(),
            Some("https://cdn.example.com/media/images/cat.png")
        );

        let video = video::Entity::into_item(create_test_video("v1", "u1"));
        assert_eq!(
            video.media_url(&media).as_deref(),
            Some("https://video.example.com/watch/1")
        );
    }

    #[tokio::test]
    async fn test_find_dispatches_on_kind() {
        let video = create_test_video("v1", "u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[video.clone()]])
                .into_connection(),
        );

        let repo = ItemRepository::new(db.clone());
        let item = repo.find(ItemKind::Video, "v1").await.unwrap().unwrap();

        assert_eq!(item.kind(), ItemKind::Video);
        assert_eq!(
            item.payload,
            ItemPayload::Video {
                url: video.url.clone()
            }
        );

        drop(repo);
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert!(format!("{log:?}").contains("FROM \\\"video\\\""));
    }

    #[tokio::test]
    async fn test_create_text() {
        let text = create_test_text("t1", "u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[text.clone()]])
                .into_connection(),
        );

        let repo = ItemRepository::new(db);
        let item = repo
            .create(
                "t1".to_string(),
                "u1".to_string(),
                "Notes".to_string(),
                ItemPayload::Text {
                    content: "Ownership rules".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(item.id, "t1");
        assert_eq!(item.kind(), ItemKind::Text);
    }

    #[tokio::test]
    async fn test_update_rejects_kind_change() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let repo = ItemRepository::new(db);
        let item = text::Entity::into_item(create_test_text("t1", "u1"));

        let err = repo
            .update(
                &item,
                "u1".to_string(),
                "Notes".to_string(),
                ItemPayload::Video {
                    url: "https://video.example.com/1".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_find_owned_other_owner() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<text::Model>::new()])
                .into_connection(),
        );

        let repo = ItemRepository::new(db);
        let item = repo
            .find_owned(ItemKind::Text, "t1", "intruder")
            .await
            .unwrap();

        assert!(item.is_none());
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

        let repo = ItemRepository::new(db);
        assert!(repo.delete(ItemKind::Image, "i1").await.unwrap());
    }
}
