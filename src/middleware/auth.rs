use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use thiserror::Error;

use crate::auth::TokenError;
use crate::database::User;
use crate::error::{ApiError, ACCESS_DENIED};
use crate::state::AppState;

/// Identity resolved for the current request
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

/// Why a request was turned away. Only ever logged; clients see one
/// uniform 401.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("no bearer token")]
    NoToken,

    #[error("invalid token: {0}")]
    InvalidToken(TokenError),

    #[error("token subject no longer exists")]
    UnknownIdentity,
}

/// Bearer authentication middleware: verifies the token, loads the identity
/// it names and injects it into request extensions as [`AuthUser`].
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = match authorize(&state, request.headers()).await {
        Ok(user) => user,
        Err(AuthFailure::Denied(reason)) => {
            tracing::warn!(
                "Rejected {} {}: {}",
                request.method(),
                request.uri().path(),
                reason
            );
            return Err(ApiError::unauthorized(ACCESS_DENIED));
        }
        Err(AuthFailure::Internal(err)) => return Err(err),
    };

    request.extensions_mut().insert(AuthUser(user));
    Ok(next.run(request).await)
}

enum AuthFailure {
    Denied(GateError),
    Internal(ApiError),
}

async fn authorize(state: &AppState, headers: &HeaderMap) -> Result<User, AuthFailure> {
    let token = extract_bearer(headers).ok_or(AuthFailure::Denied(GateError::NoToken))?;

    let subject = state
        .tokens
        .verify(token)
        .map_err(|e| AuthFailure::Denied(GateError::InvalidToken(e)))?;

    state
        .credentials
        .find(subject)
        .await
        .map_err(|e| AuthFailure::Internal(e.into()))?
        .ok_or(AuthFailure::Denied(GateError::UnknownIdentity))
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
