//! Session token extraction and activity tracking

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;

use crate::api::server::SharedState;

/// Header the portal frontend uses for the session token
pub const SESSION_HEADER: &str = "x-session-id";

/// Cookie fallback for the session token
pub const SESSION_COOKIE: &str = "portal_session";

/// Pull the session token out of request headers
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(SESSION_HEADER) {
        if let Ok(token) = value.to_str() {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    // Try to get token from Authorization header
    if let Some(auth_header) = headers.get("Authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                let token = token.trim();
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
    }

    // Try to get token from cookie
    if let Some(cookie_header) = headers.get("Cookie") {
        if let Ok(cookie_str) = cookie_header.to_str() {
            let prefix = format!("{}=", SESSION_COOKIE);
            for cookie in cookie_str.split(';') {
                if let Some(token) = cookie.trim().strip_prefix(prefix.as_str()) {
                    let token = token.trim();
                    if !token.is_empty() {
                        return Some(token.to_string());
                    }
                }
            }
        }
    }

    None
}

/// Extractor for an optional session token
#[derive(Debug, Clone, Default)]
pub struct SessionToken(pub Option<String>);

impl SessionToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(SessionToken(session_token(&parts.headers)))
    }
}

/// Refresh the caller's session on every request that carries a token.
/// Expired sessions are left expired.
pub async fn track_activity(
    State(state): State<SharedState>,
    req: Request,
    next: Next,
) -> Response {
    if let Some(token) = session_token(req.headers()) {
        state.auth.sessions().touch(&token).await;
    }
    next.run(req).await
}
