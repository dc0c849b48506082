use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Note, NoteChanges, User};
use crate::database::repository::{NoteStore, UserStore};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";
const NOTE_COLUMNS: &str = "id, owner_id, title, content, created_at, updated_at";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert(&self, user: User) -> Result<User, DatabaseError> {
        let query = format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_write)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        Ok(sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        Ok(sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update(&self, user: &User) -> Result<User, DatabaseError> {
        let query = format!(
            "UPDATE users SET name = $2, email = $3, password_hash = $4, updated_at = $5 \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_write)?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user.id)))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl NoteStore for PgStore {
    async fn list_owned(&self, owner: Uuid) -> Result<Vec<Note>, DatabaseError> {
        let query = format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE owner_id = $1 ORDER BY updated_at DESC, created_at DESC"
        );

        Ok(sqlx::query_as::<_, Note>(&query)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert(&self, note: Note) -> Result<Note, DatabaseError> {
        let query = format!(
            "INSERT INTO notes ({NOTE_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {NOTE_COLUMNS}"
        );

        sqlx::query_as::<_, Note>(&query)
            .bind(note.id)
            .bind(note.owner_id)
            .bind(&note.title)
            .bind(&note.content)
            .bind(note.created_at)
            .bind(note.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_write)
    }

    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<Note>, DatabaseError> {
        let query = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1 AND owner_id = $2");

        Ok(sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn update_owned(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: &NoteChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Note>, DatabaseError> {
        let query = format!(
            "UPDATE notes SET title = COALESCE($3, title), content = COALESCE($4, content), updated_at = $5 \
             WHERE id = $1 AND owner_id = $2 RETURNING {NOTE_COLUMNS}"
        );

        Ok(sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(owner)
            .bind(changes.title.as_deref())
            .bind(changes.content.as_deref())
            .bind(now)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_owned(&self, owner: Uuid, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_owned(&self, owner: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM notes WHERE owner_id = $1")
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
