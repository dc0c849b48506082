pub mod credential_service;
pub mod note_service;

use std::collections::HashMap;

use thiserror::Error;

use crate::auth::PasswordError;
use crate::database::DatabaseError;

pub use credential_service::{CredentialService, NewAccount, ProfileChanges};
pub use note_service::{NoteInput, NoteService};

/// Domain failures shared by the account and note services
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    #[error("User with this email already exists")]
    DuplicateEmail,

    /// Unknown email and wrong password both land here
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub(crate) fn validation(field: &str, reason: &str) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), reason.to_string());
        ServiceError::Validation {
            message: reason.to_string(),
            field_errors,
        }
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::DuplicateEmail => ServiceError::DuplicateEmail,
            // Store-level misses always name a missing account
            DatabaseError::NotFound(_) => ServiceError::NotFound("User"),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

/// Collects per-field validation failures so a request reports all of them
/// at once.
#[derive(Debug, Default)]
pub(crate) struct Validator {
    field_errors: HashMap<String, String>,
    first: Option<String>,
}

impl Validator {
    pub(crate) fn check(&mut self, ok: bool, field: &str, reason: &str) {
        if !ok && !self.field_errors.contains_key(field) {
            self.field_errors.insert(field.to_string(), reason.to_string());
            self.first.get_or_insert_with(|| reason.to_string());
        }
    }

    pub(crate) fn finish(self) -> Result<(), ServiceError> {
        match self.first {
            None => Ok(()),
            Some(first) => {
                let message = if self.field_errors.len() == 1 {
                    first
                } else {
                    "Validation failed".to_string()
                };
                Err(ServiceError::Validation {
                    message,
                    field_errors: self.field_errors,
                })
            }
        }
    }
}
