use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use tracing::warn;

use super::jwt::JwtKeys;
use super::repo_types::User;
use crate::error::AppError;
use crate::state::AppState;

/// Extracts the bearer token, verifies it and resolves the full user record.
/// Handlers taking an `Actor` never run for unauthenticated requests.
pub struct Actor(pub User);

/// Like `Actor`, but every failure degrades silently to `None`. Used where
/// attribution is nice to have but the operation is public (course views).
pub struct OptionalActor(pub Option<User>);

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?;
    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .filter(|t| !t.trim().is_empty())
}

async fn resolve_actor(parts: &Parts, state: &AppState) -> Result<User, AppError> {
    let token = bearer_token(&parts.headers).ok_or(AppError::MissingCredential)?;

    let keys = JwtKeys::from_ref(state);
    let claims = keys.verify(token).map_err(|e| {
        warn!(error = %e, "token verification failed");
        AppError::InvalidCredential
    })?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await
        .map_err(AppError::Internal)?;
    user.ok_or(AppError::UnknownSubject)
}

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_actor(parts, state).await.map(Actor)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OptionalActor {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // A malformed or stale token on a public route is ignored, not surfaced.
        Ok(OptionalActor(resolve_actor(parts, state).await.ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(
            bearer_token(&headers_with("Bearer abc.def.ghi")),
            Some("abc.def.ghi")
        );
        assert_eq!(
            bearer_token(&headers_with("bearer abc.def.ghi")),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&headers_with("abc.def.ghi")), None);
    }
}
