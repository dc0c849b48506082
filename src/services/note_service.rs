use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::database::{Note, NoteChanges, NoteStore, User};

use super::{ServiceError, Validator};

#[derive(Debug, Clone, Default)]
pub struct NoteInput {
    pub title: String,
    pub content: String,
}

/// Note CRUD on behalf of an authenticated identity. Every call passes the
/// identity's id down as the owner filter; a note belonging to anyone else
/// is reported as missing.
#[derive(Clone)]
pub struct NoteService {
    notes: Arc<dyn NoteStore>,
}

impl NoteService {
    pub fn new(notes: Arc<dyn NoteStore>) -> Self {
        Self { notes }
    }

    pub async fn list(&self, identity: &User) -> Result<Vec<Note>, ServiceError> {
        Ok(self.notes.list_owned(identity.id).await?)
    }

    pub async fn create(&self, identity: &User, input: NoteInput) -> Result<Note, ServiceError> {
        let mut v = Validator::default();
        v.check(!input.title.trim().is_empty(), "title", "Title is required");
        v.check(!input.content.trim().is_empty(), "content", "Content is required");
        v.finish()?;

        let now = Utc::now();
        Ok(self
            .notes
            .insert(Note {
                id: Uuid::new_v4(),
                title: input.title,
                content: input.content,
                owner_id: identity.id,
                created_at: now,
                updated_at: now,
            })
            .await?)
    }

    pub async fn get(&self, identity: &User, id: Uuid) -> Result<Note, ServiceError> {
        self.notes
            .find_owned(identity.id, id)
            .await?
            .ok_or(ServiceError::NotFound("Note"))
    }

    /// Fields left as `None` keep their value; a supplied field must not be blank.
    pub async fn update(&self, identity: &User, id: Uuid, changes: NoteChanges) -> Result<Note, ServiceError> {
        if changes.title.is_none() && changes.content.is_none() {
            return Err(ServiceError::validation("title", "Title or content is required"));
        }

        let mut v = Validator::default();
        if let Some(title) = &changes.title {
            v.check(!title.trim().is_empty(), "title", "Title is required");
        }
        if let Some(content) = &changes.content {
            v.check(!content.trim().is_empty(), "content", "Content is required");
        }
        v.finish()?;

        self.notes
            .update_owned(identity.id, id, &changes, Utc::now())
            .await?
            .ok_or(ServiceError::NotFound("Note"))
    }

    pub async fn delete(&self, identity: &User, id: Uuid) -> Result<(), ServiceError> {
        if self.notes.delete_owned(identity.id, id).await? {
            Ok(())
        } else {
            Err(ServiceError::NotFound("Note"))
        }
    }
}
