use std::sync::Arc;
use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::memory::MemoryStore;
use crate::database::postgres::PgStore;
use crate::database::repository::{NoteStore, UserStore};

/// Errors from the persistent store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Unsupported database scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Map a driver error, translating the unique-email violation and a
    /// note whose owner no longer exists.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => DatabaseError::DuplicateEmail,
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                DatabaseError::NotFound("note owner".to_string())
            }
            _ => DatabaseError::Sqlx(err),
        }
    }
}

#[derive(Clone)]
enum Backend {
    Postgres(PgPool),
    Memory,
}

/// Handle to the configured store. Both trait objects point at the same
/// backend instance.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserStore>,
    pub notes: Arc<dyn NoteStore>,
    backend: Backend,
}

impl Store {
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            notes: store,
            backend: Backend::Memory,
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool.clone()));
        Self {
            users: store.clone(),
            notes: store,
            backend: Backend::Postgres(pool),
        }
    }

    /// Pings the backend to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        match &self.backend {
            Backend::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
            Backend::Memory => Ok(()),
        }
    }

    /// Close pooled connections (e.g., on shutdown)
    pub async fn close(&self) {
        if let Backend::Postgres(pool) = &self.backend {
            pool.close().await;
            info!("Closed database pool");
        }
    }
}

/// Opens the store named by the configured connection string
pub struct DatabaseManager;

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<Store, DatabaseError> {
        let url = url::Url::parse(&config.url)
            .map_err(|e| DatabaseError::InvalidDatabaseUrl(e.to_string()))?;

        match url.scheme() {
            "memory" => {
                info!("Using in-memory store; data will not survive a restart");
                Ok(Store::memory())
            }
            "postgres" | "postgresql" => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(Duration::from_secs(config.connection_timeout))
                    .connect(&config.url)
                    .await?;

                Self::ensure_schema(&pool).await?;
                info!(
                    "Connected to postgres at {}",
                    url.host_str().unwrap_or("localhost")
                );
                Ok(Store::postgres(pool))
            }
            other => Err(DatabaseError::UnsupportedScheme(other.to_string())),
        }
    }

    /// Create tables and indexes if they are missing. Notes cascade with
    /// their owner at the store level as well as in the account service.
    async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
        const STATEMENTS: [&str; 3] = [
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id            UUID PRIMARY KEY,
                name          TEXT NOT NULL,
                email         TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at    TIMESTAMPTZ NOT NULL,
                updated_at    TIMESTAMPTZ NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS notes (
                id         UUID PRIMARY KEY,
                owner_id   UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title      TEXT NOT NULL,
                content    TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
            "CREATE INDEX IF NOT EXISTS notes_owner_updated_idx ON notes (owner_id, updated_at DESC)",
        ];

        for statement in STATEMENTS {
            sqlx::query(statement).execute(pool).await?;
        }
        Ok(())
    }
}
