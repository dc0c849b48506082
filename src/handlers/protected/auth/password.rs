use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// PUT /api/auth/password - Change password
///
/// Expected Input:
/// ```json
/// { "currentPassword": "old-secret", "newPassword": "new-secret" }
/// ```
///
/// A wrong current password is a 401 with the same text as a failed login.
/// Tokens issued before the change keep working until they expire.
pub async fn password_put(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    payload: Result<Json<PasswordRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = json_body(payload)?;

    let (Some(current), Some(new)) = (body.current_password, body.new_password) else {
        return Err(ApiError::bad_request(
            "Please provide currentPassword and newPassword",
        ));
    };

    state.credentials.change_password(user.id, &current, &new).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Password changed successfully",
    })))
}
