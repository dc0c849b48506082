use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::AuthUser;
use crate::services::ProfileChanges;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// GET /api/auth/me - Current identity
pub async fn me_get(Extension(AuthUser(user)): Extension<AuthUser>) -> Json<Value> {
    Json(json!({
        "success": true,
        "user": user.to_public(),
    }))
}

/// PUT /api/auth/me - Update name and/or email
pub async fn me_put(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = json_body(payload)?;

    let updated = state
        .credentials
        .update_profile(
            user.id,
            ProfileChanges {
                name: body.name,
                email: body.email,
            },
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "user": updated.to_public(),
    })))
}

/// DELETE /api/auth/me - Delete the account and every note it owns
///
/// Outstanding tokens for the account are not revoked; the auth gate rejects
/// them once the identity is gone.
pub async fn me_delete(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    state.credentials.delete(user.id).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Account deleted successfully",
    })))
}
