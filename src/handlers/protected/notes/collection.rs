use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::database::Note;
use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::AuthUser;
use crate::services::NoteInput;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// GET /api/notes - Every note of the caller, most recently updated first
pub async fn notes_get(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> Result<Json<Vec<Note>>, ApiError> {
    Ok(Json(state.notes.list(&user).await?))
}

/// POST /api/notes - Create a note; both title and content are required
pub async fn notes_post(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let body = json_body(payload)?;

    let note = state
        .notes
        .create(
            &user,
            NoteInput {
                title: body.title.unwrap_or_default(),
                content: body.content.unwrap_or_default(),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(note)))
}
