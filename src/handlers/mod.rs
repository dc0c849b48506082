// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer token, identity bound by the auth gate)
pub mod protected; // Requires `middleware::require_auth` (/api/auth/me*, /api/notes*)
pub mod public; // No authentication (/api/auth/signup, /api/auth/login, /api/health)

use axum::extract::rejection::JsonRejection;
use axum::Json;
use uuid::Uuid;

use crate::error::ApiError;

/// Unwrap a JSON body, turning framework rejections into our error envelope
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::invalid_json(rejection.body_text()))
}

/// Path ids that are not UUIDs cannot name an existing note
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(format!("{} not found", what)))
}

/// Treat absent and whitespace-only strings the same way
pub(crate) fn provided(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}
