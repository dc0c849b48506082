// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every route here sits behind `middleware::require_auth`, which binds the
// caller's identity as an `AuthUser` extension before the handler runs.
// Handlers pass that identity to the services; nothing here takes an owner
// id from the request itself.

pub mod auth; // Account of the calling identity
pub mod notes; // Owner-scoped note CRUD
