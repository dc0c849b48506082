// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition plus liveness. Nothing here trusts the caller, so every
// body is validated before it reaches a service.

pub mod auth;
pub mod health;

pub use auth::{login, signup};
pub use health::{health, root};
