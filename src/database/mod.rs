pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager, Store};
pub use models::{Note, NoteChanges, PublicUser, User};
pub use repository::{NoteStore, UserStore};
