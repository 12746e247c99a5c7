//! Session resolution: maps the request's session cookie to a user.
//!
//! Every mutation handler takes a [`CurrentUser`], so axum resolves the
//! identity before the request body is even read. Missing, unknown and
//! expired sessions all fail closed with `Unauthenticated`.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};

use crate::auth::SESSION_COOKIE;
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;
use crate::store::Store;

/// Authenticated caller. Extraction fails with `AppError::Unauthenticated`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Caller identity for public pages that adapt to a signed-in user.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

pub async fn resolve_current_user(
    store: &dyn Store,
    session_token: Option<&str>,
    now: DateTime<Utc>,
) -> Result<User, AppError> {
    let token = session_token
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthenticated)?;

    match store.find_live_session(token, now).await? {
        Some((_, user)) => Ok(user),
        None => {
            tracing::debug!("session token did not resolve to a live session");
            Err(AppError::Unauthenticated)
        }
    }
}

fn session_token(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(parts);
        let user = resolve_current_user(state.store.as_ref(), token.as_deref(), Utc::now()).await?;
        Ok(CurrentUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(parts);
        match resolve_current_user(state.store.as_ref(), token.as_deref(), Utc::now()).await {
            Ok(user) => Ok(MaybeUser(Some(user))),
            Err(AppError::Unauthenticated) => Ok(MaybeUser(None)),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use chrono::Duration;

    #[tokio::test]
    async fn test_missing_token_is_unauthenticated() {
        let store = MemoryStore::new();
        let err = resolve_current_user(&store, None, Utc::now()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));

        let err = resolve_current_user(&store, Some(""), Utc::now()).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_unknown_token_is_unauthenticated() {
        let store = MemoryStore::new();
        let err = resolve_current_user(&store, Some("nope"), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_live_session_resolves_user() {
        let store = MemoryStore::new();
        let user = store.seed_user("Grace");
        let now = Utc::now();
        store
            .create_session(user.id, "tok-1", now + Duration::days(1))
            .await
            .unwrap();

        let resolved = resolve_current_user(&store, Some("tok-1"), now).await.unwrap();
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn test_expired_session_is_unauthenticated() {
        let store = MemoryStore::new();
        let user = store.seed_user("Grace");
        let now = Utc::now();
        store
            .create_session(user.id, "tok-old", now - Duration::minutes(1))
            .await
            .unwrap();

        let err = resolve_current_user(&store, Some("tok-old"), now)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));
    }
}
