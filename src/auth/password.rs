//! Password hashing and verification with Argon2id.
//!
//! Hashes are PHC-format strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`)
//! carrying their own parameters, so raising the configured cost only affects
//! newly hashed passwords. Both operations run on the blocking thread pool;
//! they are deliberately expensive and must not stall the async workers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

use crate::config::PasswordConfig;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),

    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),

    #[error("Password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone)]
pub struct PasswordService {
    params: Params,
    /// Hash of a throwaway secret under the configured cost, verified against
    /// when a login names no account so both outcomes take the same time
    dummy_hash: Arc<str>,
    verifications: Arc<AtomicU64>,
}

impl PasswordService {
    pub fn new(config: &PasswordConfig) -> Result<Self, PasswordError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;
        let dummy_hash = hash_with(&params, "no-such-account")?;

        Ok(Self {
            params,
            dummy_hash: dummy_hash.into(),
            verifications: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Hash a plaintext password with a fresh random salt.
    pub async fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let params = self.params.clone();
        let plaintext = plaintext.to_owned();

        tokio::task::spawn_blocking(move || hash_with(&params, &plaintext)).await?
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash cannot be parsed.
    pub async fn verify(&self, plaintext: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        let plaintext = plaintext.to_owned();
        let stored_hash = stored_hash.to_owned();
        self.verifications.fetch_add(1, Ordering::Relaxed);

        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&stored_hash)
                .map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
            Ok(Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok())
        })
        .await?
    }

    /// Spend one verification on a hash no password matches. Used when the
    /// account lookup misses.
    pub async fn verify_dummy(&self, plaintext: &str) -> Result<(), PasswordError> {
        let dummy = self.dummy_hash.clone();
        self.verify(plaintext, &dummy).await.map(|_| ())
    }

    /// Verifications run so far, shared across clones.
    pub fn verifications(&self) -> u64 {
        self.verifications.load(Ordering::Relaxed)
    }
}

fn hash_with(params: &Params, plaintext: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone())
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}
