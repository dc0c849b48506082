use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Note, NoteChanges, User};
use chrono::{DateTime, Utc};

/// Identity records. Email uniqueness is enforced by the implementation on
/// every write, so callers never need to check-then-insert.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`DatabaseError::DuplicateEmail`] if the email is taken.
    async fn insert(&self, user: User) -> Result<User, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    /// `email` must already be normalized.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    /// Replace name, email, hash and `updated_at` of an existing record.
    async fn update(&self, user: &User) -> Result<User, DatabaseError>;

    /// `false` if no such record existed. Notes owned by the record go with it.
    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

/// Note records. Every lookup and mutation carries the owner id and matches
/// on `owner_id == owner` as well as the note id, so a note owned by someone
/// else is indistinguishable from one that does not exist.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Most recently updated first
    async fn list_owned(&self, owner: Uuid) -> Result<Vec<Note>, DatabaseError>;

    /// Fails with [`DatabaseError::NotFound`] if the owner does not exist.
    async fn insert(&self, note: Note) -> Result<Note, DatabaseError>;

    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Note>, DatabaseError>;

    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: &NoteChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Note>, DatabaseError>;

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError>;

    /// Remove every note of `owner`, returning how many went.
    async fn delete_all_owned(&self, owner: Uuid) -> Result<u64, DatabaseError>;
}
