// handlers/public/auth/mod.rs - Token acquisition endpoints

use serde::Serialize;

use crate::database::PublicUser;

pub mod login; // POST /api/auth/login - verify credentials and issue a token
pub mod signup; // POST /api/auth/signup - create an account and issue a token

pub use login::login;
pub use signup::signup;

/// Body shared by signup and login responses
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub message: &'static str,
    pub token: String,
    pub user: PublicUser,
}
