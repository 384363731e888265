//! Ownership-scoped record access.
//!
//! [`OwnerScoped`] wraps a plain [`RecordStore`] and applies three rules to
//! every operation, always against an explicitly passed [`Actor`]:
//!
//! - reads only see records owned by the actor;
//! - creates and updates stamp the actor as owner, whatever owner the caller
//!   supplied;
//! - updates and deletes first locate the target through the filtered read,
//!   so a record owned by someone else is reported exactly like a missing one.

use async_trait::async_trait;
use educa_common::{AppError, AppResult};
use tracing::{debug, info};

/// The user an operation is performed on behalf of.
///
/// Supplied by the authentication layer; this crate treats it as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Actor {
    user_id: String,
}

impl Actor {
    /// Act as the given user.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    /// The acting user's ID.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// Input that carries an owner.
pub trait Attributed {
    /// Overwrite the owner.
    fn set_owner(&mut self, owner_id: &str);
}

/// Plain persistence for one kind of owned record.
///
/// Implementations filter by owner when asked to but apply no policy.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persisted record.
    type Record: Send;
    /// Caller-editable fields, including the owner.
    type Fields: Attributed + Send;

    /// Human-readable record name, used in error messages.
    fn name(&self) -> &'static str;

    /// Records owned by `owner_id`.
    async fn list_owned(&self, owner_id: &str) -> AppResult<Vec<Self::Record>>;

    /// The record with `id`, if `owner_id` owns it.
    async fn find_owned(&self, id: &str, owner_id: &str) -> AppResult<Option<Self::Record>>;

    /// Persist a new record.
    async fn insert(&self, fields: Self::Fields) -> AppResult<Self::Record>;

    /// Replace the fields of an existing record.
    async fn update(&self, current: Self::Record, fields: Self::Fields)
    -> AppResult<Self::Record>;

    /// Remove an existing record.
    async fn delete(&self, current: Self::Record) -> AppResult<()>;
}

/// A [`RecordStore`] restricted to the acting user's records.
#[derive(Clone)]
pub struct OwnerScoped<S> {
    store: S,
}

impl<S: RecordStore> OwnerScoped<S> {
    /// Wrap a store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The wrapped store.
    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.store
    }

    /// Records owned by the actor.
    pub async fn list(&self, actor: &Actor) -> AppResult<Vec<S::Record>> {
        self.store.list_owned(actor.user_id()).await
    }

    /// The actor's record with `id`.
    pub async fn get(&self, actor: &Actor, id: &str) -> AppResult<S::Record> {
        match self.store.find_owned(id, actor.user_id()).await? {
            Some(record) => Ok(record),
            None => {
                debug!(
                    record = self.store.name(),
                    id = %id,
                    user_id = %actor.user_id(),
                    "Record not found in actor's scope"
                );
                Err(self.not_found(id))
            }
        }
    }

    /// Create a record owned by the actor.
    pub async fn create(&self, actor: &Actor, mut fields: S::Fields) -> AppResult<S::Record> {
        fields.set_owner(actor.user_id());
        let record = self.store.insert(fields).await?;

        info!(
            record = self.store.name(),
            user_id = %actor.user_id(),
            "Record created"
        );
        Ok(record)
    }

    /// Update one of the actor's records.
    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        mut fields: S::Fields,
    ) -> AppResult<S::Record> {
        let current = self.get(actor, id).await?;
        fields.set_owner(actor.user_id());
        self.store.update(current, fields).await
    }

    /// Delete one of the actor's records.
    pub async fn delete(&self, actor: &Actor, id: &str) -> AppResult<()> {
        let current = self.get(actor, id).await?;
        self.store.delete(current).await?;

        info!(
            record = self.store.name(),
            id = %id,
            user_id = %actor.user_id(),
            "Record deleted"
        );
        Ok(())
    }

    fn not_found(&self, id: &str) -> AppError {
        AppError::NotFound(format!("{} not found: {id}", self.store.name()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Note {
        id: String,
        owner_id: String,
        body: String,
    }

    #[derive(Debug, Clone)]
    struct NoteFields {
        owner_id: String,
        body: String,
    }

    impl Attributed for NoteFields {
        fn set_owner(&mut self, owner_id: &str) {
            self.owner_id = owner_id.to_string();
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<Vec<Note>>,
    }

    impl MemoryStore {
        fn with(rows: Vec<Note>) -> Self {
            Self {
                rows: Mutex::new(rows),
            }
        }

        fn rows(&self) -> Vec<Note> {
            self.rows.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RecordStore for MemoryStore {
        type Record = Note;
        type Fields = NoteFields;

        fn name(&self) -> &'static str {
            "Note"
        }

        async fn list_owned(&self, owner_id: &str) -> AppResult<Vec<Note>> {
            Ok(self
                .rows()
                .into_iter()
                .filter(|n| n.owner_id == owner_id)
                .collect())
        }

        async fn find_owned(&self, id: &str, owner_id: &str) -> AppResult<Option<Note>> {
            Ok(self
                .rows()
                .into_iter()
                .find(|n| n.id == id && n.owner_id == owner_id))
        }

        async fn insert(&self, fields: NoteFields) -> AppResult<Note> {
            let mut rows = self.rows.lock().unwrap();
            let note = Note {
                id: format!("n{}", rows.len() + 1),
                owner_id: fields.owner_id,
                body: fields.body,
            };
            rows.push(note.clone());
            Ok(note)
        }

        async fn update(&self, current: Note, fields: NoteFields) -> AppResult<Note> {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.iter_mut().find(|n| n.id == current.id).unwrap();
            row.owner_id = fields.owner_id;
            row.body = fields.body;
            Ok(row.clone())
        }

        async fn delete(&self, current: Note) -> AppResult<()> {
            self.rows.lock().unwrap().retain(|n| n.id != current.id);
            Ok(())
        }
    }

    fn note(id: &str, owner_id: &str) -> Note {
        Note {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            body: format!("body of {id}"),
        }
    }

    fn fields(owner_id: &str, body: &str) -> NoteFields {
        NoteFields {
            owner_id: owner_id.to_string(),
            body: body.to_string(),
        }
    }

    fn two_owners() -> OwnerScoped<MemoryStore> {
        OwnerScoped::new(MemoryStore::with(vec![note("a", "u1"), note("b", "u2")]))
    }

    #[tokio::test]
    async fn test_list_only_returns_own_records() {
        let scoped = two_owners();

        let mine = scoped.list(&Actor::new("u1")).await.unwrap();

        assert_eq!(mine, vec![note("a", "u1")]);
    }

    #[tokio::test]
    async fn test_get_foreign_record_is_not_found() {
        let scoped = two_owners();

        let foreign = scoped.get(&Actor::new("u1"), "b").await.unwrap_err();
        let missing = scoped.get(&Actor::new("u1"), "zzz").await.unwrap_err();

        assert!(matches!(foreign, AppError::NotFound(_)));
        assert!(matches!(missing, AppError::NotFound(_)));
        assert_eq!(foreign.error_code(), missing.error_code());
    }

    #[tokio::test]
    async fn test_create_overrides_forged_owner() {
        let scoped = OwnerScoped::new(MemoryStore::default());

        let created = scoped
            .create(&Actor::new("u1"), fields("u2", "hello"))
            .await
            .unwrap();

        assert_eq!(created.owner_id, "u1");
        assert_eq!(scoped.inner().rows()[0].owner_id, "u1");
    }

    #[tokio::test]
    async fn test_update_foreign_record_is_not_found() {
        let scoped = two_owners();

        let err = scoped
            .update(&Actor::new("u1"), "b", fields("u1", "stolen"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(scoped.inner().rows()[1], note("b", "u2"));
    }

    #[tokio::test]
    async fn test_update_cannot_reassign_owner() {
        let scoped = two_owners();

        let updated = scoped
            .update(&Actor::new("u1"), "a", fields("u2", "edited"))
            .await
            .unwrap();

        assert_eq!(updated.owner_id, "u1");
        assert_eq!(updated.body, "edited");
    }

    #[tokio::test]
    async fn test_delete_foreign_record_is_not_found() {
        let scoped = two_owners();

        let err = scoped.delete(&Actor::new("u1"), "b").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(scoped.inner().rows().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_own_record() {
        let scoped = two_owners();

        scoped.delete(&Actor::new("u2"), "b").await.unwrap();

        assert_eq!(scoped.inner().rows(), vec![note("a", "u1")]);
    }
}
