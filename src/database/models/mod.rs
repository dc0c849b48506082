pub mod note;
pub mod user;

pub use note::{Note, NoteChanges};
pub use user::{normalize_email, PublicUser, User};
