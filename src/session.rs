//! Anonymous session identity carried in the `sessionId` cookie.
//!
//! A session id is a capability: whoever presents it owns the meals filed
//! under it. Handlers pull it out of the request and pass it to the meal
//! service explicitly.

use std::fmt;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
};
use tracing::debug;
use uuid::Uuid;

use crate::error::AppError;

pub const SESSION_COOKIE: &str = "sessionId";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn mint() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Looks for `sessionId` across every `Cookie` header. Values that are not
/// UUIDs are treated as absent.
pub fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| match Uuid::parse_str(value.trim_matches('"')) {
            Ok(id) => Some(SessionId(id)),
            Err(_) => {
                debug!("ignoring malformed session cookie");
                None
            }
        })
}

pub fn session_cookie(id: SessionId, max_age: time::Duration) -> anyhow::Result<HeaderValue> {
    let cookie = format!(
        "{SESSION_COOKIE}={id}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        max_age.whole_seconds()
    );
    Ok(HeaderValue::from_str(&cookie)?)
}

/// Session required; rejects with 401 when the cookie is missing.
pub struct RequireSession(pub SessionId);

#[async_trait]
impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_from_headers(&parts.headers)
            .map(RequireSession)
            .ok_or(AppError::Unauthorized)
    }
}

/// Session if the client already has one.
pub struct MaybeSession(pub Option<SessionId>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(session_from_headers(&parts.headers)))
    }
}
