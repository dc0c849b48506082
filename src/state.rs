use crate::auth::{PasswordError, PasswordService, TokenError, TokenService};
use crate::config::AppConfig;
use crate::database::Store;
use crate::services::{CredentialService, NoteService};

/// Everything a handler needs, built once at startup from [`AppConfig`]
#[derive(Clone)]
pub struct AppState {
    pub credentials: CredentialService,
    pub notes: NoteService,
    pub tokens: TokenService,
    pub store: Store,
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl AppState {
    pub fn new(config: &AppConfig, store: Store) -> Result<Self, StateError> {
        let tokens = TokenService::new(&config.security.jwt_secret)?;
        let passwords = PasswordService::new(&config.password)?;

        Ok(Self {
            credentials: CredentialService::new(store.users.clone(), store.notes.clone(), passwords),
            notes: NoteService::new(store.notes.clone()),
            tokens,
            store,
        })
    }
}
