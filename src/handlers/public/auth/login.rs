use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use super::TokenResponse;
use crate::error::ApiError;
use crate::handlers::{json_body, provided};
use crate::services::ServiceError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/login - Authenticate and receive a token
///
/// Unknown email and wrong password produce the same 401 body.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let body = json_body(payload)?;

    if !provided(&body.email) || !body.password.as_deref().is_some_and(|p| !p.is_empty()) {
        return Err(ApiError::bad_request("Please provide email and password"));
    }

    let email = body.email.unwrap_or_default();
    let user = match state
        .credentials
        .verify(&email, body.password.as_deref().unwrap_or_default())
        .await
    {
        Ok(user) => user,
        Err(ServiceError::InvalidCredentials) => {
            tracing::warn!("Failed login attempt");
            return Err(ServiceError::InvalidCredentials.into());
        }
        Err(other) => return Err(other.into()),
    };

    let token = state.tokens.issue(user.id).map_err(|e| {
        tracing::error!("Token issue failed for user {}: {}", user.id, e);
        ApiError::internal_server_error("Server error during login")
    })?;

    Ok(Json(TokenResponse {
        success: true,
        message: "Login successful",
        token,
        user: user.to_public(),
    }))
}
