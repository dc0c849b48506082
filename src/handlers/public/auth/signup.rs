use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::TokenResponse;
use crate::error::ApiError;
use crate::handlers::{json_body, provided};
use crate::services::NewAccount;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/signup - Register an account and receive a token
///
/// Expected Input:
/// ```json
/// { "name": "Ada", "email": "ada@example.com", "password": "at-least-6" }
/// ```
///
/// Responds 201 with `{ success, message, token, user }`. Missing fields,
/// malformed email, short password and an already registered email are all 400.
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let body = json_body(payload)?;

    // Passwords are taken verbatim; length rules live in the credential service
    let has_password = body.password.as_deref().is_some_and(|p| !p.is_empty());
    if !provided(&body.name) || !provided(&body.email) || !has_password {
        return Err(ApiError::bad_request("Please provide name, email, and password"));
    }

    let user = state
        .credentials
        .create(NewAccount {
            name: body.name.unwrap_or_default(),
            email: body.email.unwrap_or_default(),
            password: body.password.unwrap_or_default(),
        })
        .await?;

    let token = state.tokens.issue(user.id).map_err(|e| {
        tracing::error!("Token issue failed for new user {}: {}", user.id, e);
        ApiError::internal_server_error("Server error during signup")
    })?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            success: true,
            message: "User registered successfully",
            token,
            user: user.to_public(),
        }),
    ))
}
