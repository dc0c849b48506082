use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::{Note, NoteChanges};
use crate::error::ApiError;
use crate::handlers::{json_body, parse_id};
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// GET /api/notes/:id
pub async fn note_get(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Note>, ApiError> {
    let id = parse_id(&id, "Note")?;
    Ok(Json(state.notes.get(&user, id).await?))
}

/// PUT /api/notes/:id - Replace title and/or content. The owner never changes.
pub async fn note_put(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
    let id = parse_id(&id, "Note")?;
    let body = json_body(payload)?;

    let note = state
        .notes
        .update(
            &user,
            id,
            NoteChanges {
                title: body.title,
                content: body.content,
            },
        )
        .await?;

    Ok(Json(note))
}

/// DELETE /api/notes/:id
pub async fn note_delete(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id, "Note")?;
    state.notes.delete(&user, id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Note deleted",
    })))
}
