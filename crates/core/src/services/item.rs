//! Item service.
//!
//! Items are owned directly by their creator. Each kind lives in its own
//! table, so an [`ItemStore`] is bound to one [`ItemKind`] and the service
//! picks the store from the kind of each request.

use async_trait::async_trait;
use educa_common::{AppError, AppResult, IdGenerator, validate_blob_key};
use educa_db::entities::ItemKind;
use educa_db::repositories::{ContentRepository, Item, ItemPayload, ItemRepository};
use serde::Deserialize;
use tracing::debug;
use url::Url;
use validator::Validate;

use super::ownership::{Actor, Attributed, OwnerScoped, RecordStore};

/// Editable item fields.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ItemFields {
    #[serde(default)]
    pub owner_id: String,
    #[validate(length(min = 1, max = 250))]
    pub title: String,
    #[serde(flatten)]
    pub payload: ItemPayload,
}

impl Attributed for ItemFields {
    fn set_owner(&mut self, owner_id: &str) {
        owner_id.clone_into(&mut self.owner_id);
    }
}

/// Parse an item kind tag such as `"video"`.
pub fn parse_item_kind(tag: &str) -> AppResult<ItemKind> {
    tag.parse::<ItemKind>()
        .map_err(|e| AppError::Validation(e.to_string()))
}

fn validate_payload(payload: &ItemPayload) -> AppResult<()> {
    match payload {
        ItemPayload::Text { .. } => Ok(()),
        ItemPayload::File { file } | ItemPayload::Image { file } => validate_blob_key(file),
        ItemPayload::Video { url } => {
            let parsed = Url::parse(url)
                .map_err(|e| AppError::Validation(format!("Invalid video URL: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
                return Err(AppError::Validation(format!(
                    "Video URL must be an absolute http(s) URL: {url}"
                )));
            }
            Ok(())
        }
    }
}

/// Persistence for the items of one kind.
#[derive(Clone)]
pub struct ItemStore {
    item_repo: ItemRepository,
    content_repo: ContentRepository,
    kind: ItemKind,
    id_gen: IdGenerator,
}

impl ItemStore {
    /// Create a store for items of `kind`.
    #[must_use]
    pub const fn new(
        item_repo: ItemRepository,
        content_repo: ContentRepository,
        kind: ItemKind,
    ) -> Self {
        Self {
            item_repo,
            content_repo,
            kind,
            id_gen: IdGenerator::new(),
        }
    }

    fn check(&self, fields: &ItemFields) -> AppResult<()> {
        fields.validate()?;
        if fields.payload.kind() != self.kind {
            return Err(AppError::Validation(format!(
                "Expected a {} item, got {}",
                self.kind,
                fields.payload.kind()
            )));
        }
        validate_payload(&fields.payload)
    }
}

#[async_trait]
impl RecordStore for ItemStore {
    type Record = Item;
    type Fields = ItemFields;

    fn name(&self) -> &'static str {
        match self.kind {
            ItemKind::Text => "Text",
            ItemKind::File => "File",
            ItemKind::Image => "Image",
            ItemKind::Video => "Video",
        }
    }

    async fn list_owned(&self, owner_id: &str) -> AppResult<Vec<Item>> {
        self.item_repo.find_by_owner(self.kind, owner_id).await
    }

    async fn find_owned(&self, id: &str, owner_id: &str) -> AppResult<Option<Item>> {
        self.item_repo.find_owned(self.kind, id, owner_id).await
    }

    async fn insert(&self, fields: ItemFields) -> AppResult<Item> {
        self.check(&fields)?;
        self.item_repo
            .create(
                self.id_gen.generate(),
                fields.owner_id,
                fields.title,
                fields.payload,
            )
            .await
    }

    async fn update(&self, current: Item, fields: ItemFields) -> AppResult<Item> {
        self.check(&fields)?;
        self.item_repo
            .update(&current, fields.owner_id, fields.title, fields.payload)
            .await
    }

    async fn delete(&self, current: Item) -> AppResult<()> {
        let detached = self
            .content_repo
            .delete_by_item(self.kind, &current.id)
            .await?;
        if detached > 0 {
            debug!(item_id = %current.id, detached, "Removed contents pointing at item");
        }

        self.item_repo.delete(self.kind, &current.id).await?;
        Ok(())
    }
}

/// Service for managing the actor's items.
#[derive(Clone)]
pub struct ItemService {
    item_repo: ItemRepository,
    content_repo: ContentRepository,
    id_gen: IdGenerator,
}

impl ItemService {
    /// Create a new item service.
    #[must_use]
    pub const fn new(item_repo: ItemRepository, content_repo: ContentRepository) -> Self {
        Self {
            item_repo,
            content_repo,
            id_gen: IdGenerator::new(),
        }
    }

    fn scoped(&self, kind: ItemKind) -> OwnerScoped<ItemStore> {
        OwnerScoped::new(ItemStore::new(
            self.item_repo.clone(),
            self.content_repo.clone(),
            kind,
        ))
    }

    /// The actor's items of one kind, newest first.
    pub async fn list(&self, actor: &Actor, kind: ItemKind) -> AppResult<Vec<Item>> {
        self.scoped(kind).list(actor).await
    }

    /// One of the actor's items.
    pub async fn get(&self, actor: &Actor, kind: ItemKind, id: &str) -> AppResult<Item> {
        self.scoped(kind).get(actor, id).await
    }

    /// Create an item owned by the actor; the payload decides its kind.
    pub async fn create(&self, actor: &Actor, fields: ItemFields) -> AppResult<Item> {
        self.scoped(fields.payload.kind()).create(actor, fields).await
    }

    /// Update one of the actor's items. The kind cannot change.
    pub async fn update(
        &self,
        actor: &Actor,
        kind: ItemKind,
        id: &str,
        fields: ItemFields,
    ) -> AppResult<Item> {
        self.scoped(kind).update(actor, id, fields).await
    }

    /// Delete one of the actor's items, detaching it from every module.
    pub async fn delete(&self, actor: &Actor, kind: ItemKind, id: &str) -> AppResult<()> {
        self.scoped(kind).delete(actor, id).await
    }

    /// Reserve a blob key for an upload of `original_name`.
    ///
    /// Only File and Image items store blobs.
    pub fn new_blob_key(&self, kind: ItemKind, original_name: &str) -> AppResult<String> {
        let dir = kind
            .upload_dir()
            .ok_or_else(|| AppError::Validation(format!("{kind} items have no upload")))?;
        Ok(self.id_gen.generate_blob_key(dir, original_name))
    }
}
