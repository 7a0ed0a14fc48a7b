//! Admin token extraction.
//!
//! Admin endpoints are guarded by a shared token carried in the
//! `X-Content-Token` header. When no token is configured the endpoints are
//! open, which is the intended development mode.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

use crate::AppState;

/// Header carrying the operator token.
pub const TOKEN_HEADER: &str = "x-content-token";

/// Proof that the request carried a valid operator token (or that none is
/// required).
#[derive(Debug, Clone)]
pub struct ContentToken;

impl FromRequestParts<AppState> for ContentToken {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.admin_token.as_deref() else {
            // No token configured, allow anonymous operator access
            return Ok(ContentToken);
        };

        let provided = parts
            .headers
            .get(TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());

        match provided {
            Some(token) if token == expected => Ok(ContentToken),
            Some(_) => Err((StatusCode::UNAUTHORIZED, "Invalid content token")),
            None => Err((StatusCode::UNAUTHORIZED, "Missing X-Content-Token header")),
        }
    }
}
