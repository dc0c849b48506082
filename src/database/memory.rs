//! Process-local store for development and tests. Each table sits behind its
//! own lock; a single write lock covers the uniqueness check and the write it
//! guards. When both are needed the users lock is taken first, which gives
//! note inserts and account deletion the same cascade as the Postgres
//! foreign key.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Note, NoteChanges, User};
use crate::database::repository::{NoteStore, UserStore};

struct StoredNote {
    note: Note,
    /// Write sequence; orders notes whose timestamps collide
    revision: u64,
}

#[derive(Default)]
struct NoteTable {
    rows: HashMap<Uuid, StoredNote>,
    /// Only advanced under the table's write lock, so revisions follow write order
    revision: u64,
}

impl NoteTable {
    fn next_revision(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }
}

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    notes: RwLock<NoteTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, user: User) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::DuplicateEmail);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update(&self, user: &User) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(DatabaseError::NotFound(format!("user {}", user.id)));
        }
        if users.values().any(|u| u.id != user.id && u.email == user.email) {
            return Err(DatabaseError::DuplicateEmail);
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut users = self.users.write().await;
        let mut notes = self.notes.write().await;
        notes.rows.retain(|_, s| s.note.owner_id != id);
        Ok(users.remove(&id).is_some())
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn list_owned(&self, owner: Uuid) -> Result<Vec<Note>, DatabaseError> {
        let notes = self.notes.read().await;
        let mut owned: Vec<&StoredNote> = notes
            .rows
            .values()
            .filter(|s| s.note.owner_id == owner)
            .collect();
        owned.sort_by(|a, b| {
            b.note
                .updated_at
                .cmp(&a.note.updated_at)
                .then(b.revision.cmp(&a.revision))
        });
        Ok(owned.into_iter().map(|s| s.note.clone()).collect())
    }

    async fn insert(&self, note: Note) -> Result<Note, DatabaseError> {
        // Held until the note is in, so a concurrent account delete sees it
        let users = self.users.read().await;
        if !users.contains_key(&note.owner_id) {
            return Err(DatabaseError::NotFound(format!("user {}", note.owner_id)));
        }

        let mut notes = self.notes.write().await;
        let revision = notes.next_revision();
        notes.rows.insert(
            note.id,
            StoredNote {
                note: note.clone(),
                revision,
            },
        );
        Ok(note)
    }

    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Note>, DatabaseError> {
        Ok(self
            .notes
            .read()
            .await
            .rows
            .get(&id)
            .filter(|s| s.note.owner_id == owner)
            .map(|s| s.note.clone()))
    }

    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: &NoteChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Note>, DatabaseError> {
        let mut notes = self.notes.write().await;
        if !notes.rows.get(&id).is_some_and(|s| s.note.owner_id == owner) {
            return Ok(None);
        }

        let revision = notes.next_revision();
        Ok(notes.rows.get_mut(&id).map(|stored| {
            stored.note.apply(changes, now);
            stored.revision = revision;
            stored.note.clone()
        }))
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let mut notes = self.notes.write().await;
        if notes.rows.get(&id).is_some_and(|s| s.note.owner_id == owner) {
            notes.rows.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn delete_all_owned(&self, owner: Uuid) -> Result<u64, DatabaseError> {
        let mut notes = self.notes.write().await;
        let before = notes.rows.len();
        notes.rows.retain(|_, s| s.note.owner_id != owner);
        Ok((before - notes.rows.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(email: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    async fn owner(store: &MemoryStore) -> Uuid {
        let email = format!("{}@example.com", Uuid::new_v4());
        UserStore::insert(store, user(&email)).await.unwrap().id
    }

    fn note(owner: Uuid, title: &str, at: DateTime<Utc>) -> Note {
        Note {
            id: Uuid::new_v4(),
            title: title.to_string(),
            content: "body".to_string(),
            owner_id: owner,
            created_at: at,
            updated_at: at,
        }
    }

    async fn titles(store: &MemoryStore, owner: Uuid) -> Vec<String> {
        store
            .list_owned(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect()
    }

    #[tokio::test]
    async fn enforces_unique_email_on_insert_and_update() {
        let store = MemoryStore::new();
        let a = UserStore::insert(&store, user("a@example.com")).await.unwrap();
        let b = UserStore::insert(&store, user("b@example.com")).await.unwrap();

        let dup = UserStore::insert(&store, user("a@example.com")).await;
        assert!(matches!(dup, Err(DatabaseError::DuplicateEmail)));

        let mut renamed = b.clone();
        renamed.email = a.email.clone();
        assert!(matches!(
            UserStore::update(&store, &renamed).await,
            Err(DatabaseError::DuplicateEmail)
        ));
    }

    #[tokio::test]
    async fn update_of_missing_user_is_not_found() {
        let store = MemoryStore::new();
        let ghost = user("ghost@example.com");
        assert!(matches!(
            UserStore::update(&store, &ghost).await,
            Err(DatabaseError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn scopes_notes_to_owner() {
        let store = MemoryStore::new();
        let owner = owner(&store).await;
        let stranger = Uuid::new_v4();
        let n = NoteStore::insert(&store, note(owner, "mine", Utc::now())).await.unwrap();

        assert!(store.find_owned(stranger, n.id).await.unwrap().is_none());
        assert!(store.find_owned(owner, n.id).await.unwrap().is_some());
        assert!(!store.delete_owned(stranger, n.id).await.unwrap());
        assert!(store.list_owned(stranger).await.unwrap().is_empty());
        assert!(store.delete_owned(owner, n.id).await.unwrap());
    }

    #[tokio::test]
    async fn note_for_missing_owner_is_rejected() {
        let store = MemoryStore::new();
        let nobody = Uuid::new_v4();

        let err = NoteStore::insert(&store, note(nobody, "orphan", Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
        assert!(store.list_owned(nobody).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_user_removes_their_notes() {
        let store = MemoryStore::new();
        let gone = owner(&store).await;
        let kept = owner(&store).await;
        NoteStore::insert(&store, note(gone, "g1", Utc::now())).await.unwrap();
        NoteStore::insert(&store, note(kept, "k1", Utc::now())).await.unwrap();

        assert!(UserStore::delete(&store, gone).await.unwrap());
        assert!(store.list_owned(gone).await.unwrap().is_empty());
        assert_eq!(titles(&store, kept).await, vec!["k1"]);

        // Late writes for the deleted account do not resurrect it
        let late = NoteStore::insert(&store, note(gone, "late", Utc::now())).await;
        assert!(matches!(late, Err(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn orders_by_update_time_then_write_order() {
        let store = MemoryStore::new();
        let owner = owner(&store).await;
        let t0 = Utc::now();
        NoteStore::insert(&store, note(owner, "old", t0 - Duration::seconds(5))).await.unwrap();
        let first = NoteStore::insert(&store, note(owner, "tie-1", t0)).await.unwrap();
        NoteStore::insert(&store, note(owner, "tie-2", t0)).await.unwrap();

        assert_eq!(titles(&store, owner).await, vec!["tie-2", "tie-1", "old"]);

        // Rewriting a tied note with the same timestamp moves it ahead
        store
            .update_owned(owner, first.id, &NoteChanges::default(), t0)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(titles(&store, owner).await, vec!["tie-1", "tie-2", "old"]);
    }

    #[tokio::test]
    async fn concurrent_inserts_get_distinct_revisions() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let owner = owner(&store).await;
        let at = Utc::now();

        let writers: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    NoteStore::insert(store.as_ref(), note(owner, &i.to_string(), at))
                        .await
                        .unwrap();
                })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap();
        }

        let notes = store.notes.read().await;
        let mut revisions: Vec<u64> = notes.rows.values().map(|s| s.revision).collect();
        revisions.sort_unstable();
        revisions.dedup();
        assert_eq!(revisions.len(), 16);
        assert_eq!(notes.revision, 16);
    }

    #[tokio::test]
    async fn delete_all_owned_leaves_other_owners() {
        let store = MemoryStore::new();
        let a = owner(&store).await;
        let b = owner(&store).await;
        NoteStore::insert(&store, note(a, "a1", Utc::now())).await.unwrap();
        NoteStore::insert(&store, note(a, "a2", Utc::now())).await.unwrap();
        NoteStore::insert(&store, note(b, "b1", Utc::now())).await.unwrap();

        assert_eq!(store.delete_all_owned(a).await.unwrap(), 2);
        assert!(store.list_owned(a).await.unwrap().is_empty());
        assert_eq!(store.list_owned(b).await.unwrap().len(), 1);
    }
}
