// handlers/protected/auth/mod.rs - Account endpoints for the authenticated identity

pub mod me; // GET/PUT/DELETE /api/auth/me
pub mod password; // PUT /api/auth/password

pub use me::{me_delete, me_get, me_put};
pub use password::password_put;
