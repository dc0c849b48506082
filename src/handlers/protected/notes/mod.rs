// handlers/protected/notes/mod.rs - /api/notes
//
// Collection: GET (list, newest update first) and POST (create).
// Record: GET, PUT, DELETE by id. A note owned by someone else answers
// exactly like one that does not exist (404).

pub mod collection;
pub mod record;

pub use collection::{notes_get, notes_post};
pub use record::{note_delete, note_get, note_put};
