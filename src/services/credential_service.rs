use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::auth::PasswordService;
use crate::database::models::normalize_email;
use crate::database::{NoteStore, User, UserStore};

use super::{ServiceError, Validator};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Identity records and the passwords that guard them
#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserStore>,
    notes: Arc<dyn NoteStore>,
    passwords: PasswordService,
}

impl CredentialService {
    pub fn new(users: Arc<dyn UserStore>, notes: Arc<dyn NoteStore>, passwords: PasswordService) -> Self {
        Self {
            users,
            notes,
            passwords,
        }
    }

    /// Register a new identity. The plaintext is hashed before anything is
    /// written.
    pub async fn create(&self, account: NewAccount) -> Result<User, ServiceError> {
        let name = account.name.trim().to_string();
        let email = normalize_email(&account.email);

        let mut v = Validator::default();
        v.check(!name.is_empty(), "name", "Please provide a name");
        v.check(!email.is_empty(), "email", "Please provide an email");
        v.check(email.is_empty() || is_valid_email(&email), "email", "Please provide a valid email");
        check_password(&mut v, "password", &account.password);
        v.finish()?;

        let password_hash = self.passwords.hash(&account.password).await?;
        let now = Utc::now();
        let user = self
            .users
            .insert(User {
                id: Uuid::new_v4(),
                name,
                email,
                password_hash,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!("Registered user {}", user.id);
        Ok(user)
    }

    /// Check an email/password pair. Every failure mode reports the same
    /// [`ServiceError::InvalidCredentials`].
    pub async fn verify(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let Some(user) = self.users.find_by_email(&normalize_email(email)).await? else {
            self.passwords.verify_dummy(password).await?;
            return Err(ServiceError::InvalidCredentials);
        };

        if !self.passwords.verify(password, &user.password_hash).await? {
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<User>, ServiceError> {
        Ok(self.users.find_by_id(id).await?)
    }

    pub async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<User, ServiceError> {
        let name = changes.name.map(|n| n.trim().to_string());
        let email = changes.email.map(|e| normalize_email(&e));

        if name.is_none() && email.is_none() {
            return Err(ServiceError::validation("name", "Please provide a name or email to update"));
        }

        let mut v = Validator::default();
        if let Some(name) = &name {
            v.check(!name.is_empty(), "name", "Please provide a name");
        }
        if let Some(email) = &email {
            v.check(!email.is_empty(), "email", "Please provide an email");
            v.check(email.is_empty() || is_valid_email(email), "email", "Please provide a valid email");
        }
        v.finish()?;

        let mut user = self.existing(id).await?;
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }
        user.updated_at = Utc::now();

        Ok(self.users.update(&user).await?)
    }

    /// Replace the password after re-checking the current one
    pub async fn change_password(&self, id: Uuid, current: &str, new: &str) -> Result<(), ServiceError> {
        let mut v = Validator::default();
        check_password(&mut v, "newPassword", new);
        v.finish()?;

        let mut user = self.existing(id).await?;
        if !self.passwords.verify(current, &user.password_hash).await? {
            return Err(ServiceError::InvalidCredentials);
        }

        user.password_hash = self.passwords.hash(new).await?;
        user.updated_at = Utc::now();
        self.users.update(&user).await?;

        info!("Password changed for user {}", id);
        Ok(())
    }

    /// Delete an identity together with every note it owns. Tokens already
    /// issued to it stay signed but stop resolving to an identity.
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.existing(id).await?;

        let removed = self.notes.delete_all_owned(id).await?;
        if !self.users.delete(id).await? {
            return Err(ServiceError::NotFound("User"));
        }

        info!("Deleted user {} and {} notes", id, removed);
        Ok(())
    }

    async fn existing(&self, id: Uuid) -> Result<User, ServiceError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("User"))
    }
}

fn check_password(v: &mut Validator, field: &str, password: &str) {
    if password.is_empty() {
        v.check(false, field, "Please provide a password");
    } else {
        v.check(
            password.chars().count() >= MIN_PASSWORD_LEN,
            field,
            "Password must be at least 6 characters",
        );
    }
}

/// `local@domain.tld` with no whitespace anywhere: some non-empty text, an
/// `@`, then a domain holding a dot that is neither first nor last.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    email.match_indices('@').any(|(at, _)| {
        let domain = &email[at + 1..];
        at > 0
            && domain
                .match_indices('.')
                .any(|(dot, _)| dot > 0 && dot + 1 < domain.len())
    })
}
