//! Auth wiring: the process-wide authentication configuration.
//!
//! [`AuthConfig`] is built once in `main` from [`Config`] and shared
//! read-only through `AppState`. It binds the active OAuth providers
//! (GitHub, Google) to the record store and exposes the sign-in, sign-out
//! and current-session capabilities used by the auth routes.

pub mod adapter;
pub mod handlers;
pub mod providers;

use anyhow::{Context, Result};
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::info;
use url::Url;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::user::{Session, User, UserType};
use crate::store::Store;

use self::providers::{OAuthProvider, ProviderClient, ProviderKind};

pub const SESSION_COOKIE: &str = "authjs.session-token";
pub const STATE_COOKIE: &str = "authjs.state";

/// How long a pending sign-in may take before the state cookie lapses.
const STATE_MAX_AGE_SECS: i64 = 15 * 60;

#[derive(Debug)]
pub struct AuthConfig {
    base_url: Url,
    providers: Vec<OAuthProvider>,
    session_max_age: Duration,
}

/// Public view of the signed-in session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub user: SessionUser,
    pub expires: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
    pub user_type: Option<UserType>,
    pub onboarding_completed: bool,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            image: user.image,
            user_type: user.user_type,
            onboarding_completed: user.onboarding_completed,
        }
    }
}

impl AuthConfig {
    pub fn new(base_url: Url, providers: Vec<OAuthProvider>, session_max_age: Duration) -> Self {
        Self {
            base_url,
            providers,
            session_max_age,
        }
    }

    /// GitHub and Google, with credentials from the environment.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.auth_url)
            .with_context(|| format!("AUTH_URL '{}' is not a valid URL", config.auth_url))?;

        let providers = vec![
            OAuthProvider {
                kind: ProviderKind::GitHub,
                client_id: config.github_client_id.clone(),
                client_secret: config.github_client_secret.clone(),
            },
            OAuthProvider {
                kind: ProviderKind::Google,
                client_id: config.google_client_id.clone(),
                client_secret: config.google_client_secret.clone(),
            },
        ];

        info!(
            "Auth configured with providers: {}",
            providers
                .iter()
                .map(|p| p.kind.id())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self::new(
            base_url,
            providers,
            Duration::days(config.session_max_age_days),
        ))
    }

    pub fn provider(&self, id: &str) -> Result<&OAuthProvider, AppError> {
        self.providers
            .iter()
            .find(|p| p.kind.id() == id)
            .ok_or_else(|| AppError::UnknownProvider(id.to_string()))
    }

    pub fn callback_url(&self, provider: &OAuthProvider) -> String {
        let mut url = self.base_url.clone();
        url.set_path(&format!("/api/auth/callback/{}", provider.kind.id()));
        url.to_string()
    }

    /// Provider authorization URL for a new sign-in carrying `state`.
    pub fn authorization_url(&self, provider_id: &str, state: &str) -> Result<Url, AppError> {
        let provider = self.provider(provider_id)?;
        let mut url = Url::parse(provider.kind.authorization_endpoint())
            .context("provider authorization endpoint is not a valid URL")?;
        url.query_pairs_mut()
            .append_pair("client_id", &provider.client_id)
            .append_pair("redirect_uri", &self.callback_url(provider))
            .append_pair("response_type", "code")
            .append_pair("scope", provider.kind.scope())
            .append_pair("state", state);
        Ok(url)
    }

    /// Finishes the OAuth callback: verifies state, exchanges the code,
    /// links or creates the user, and opens a session.
    pub async fn complete_sign_in(
        &self,
        store: &dyn Store,
        client: &dyn ProviderClient,
        provider_id: &str,
        code: &str,
        state: Option<&str>,
        expected_state: Option<&str>,
    ) -> Result<(Session, User), AppError> {
        let provider = self.provider(provider_id)?;

        match (state, expected_state) {
            (Some(got), Some(want)) if !got.is_empty() && got == want => {}
            _ => return Err(AppError::OAuthStateMismatch),
        }

        let tokens = client
            .exchange_code(provider, code, &self.callback_url(provider))
            .await?;
        let profile = client.fetch_profile(provider, &tokens).await?;

        let user = adapter::link_or_create_user(store, provider.kind, &profile, &tokens).await?;
        let session =
            adapter::open_session(store, user.id, Utc::now() + self.session_max_age).await?;

        info!("User {} signed in via {}", user.id, provider.kind.id());
        Ok((session, user))
    }

    pub async fn sign_out(&self, store: &dyn Store, session_token: Option<&str>) -> Result<(), AppError> {
        if let Some(token) = session_token {
            store.delete_session(token).await?;
        }
        Ok(())
    }

    pub async fn current_session(
        &self,
        store: &dyn Store,
        session_token: Option<&str>,
    ) -> Result<Option<SessionView>, AppError> {
        let Some(token) = session_token else {
            return Ok(None);
        };
        Ok(store
            .find_live_session(token, Utc::now())
            .await?
            .map(|(session, user)| SessionView {
                user: user.into(),
                expires: session.expires,
            }))
    }

    fn secure_cookies(&self) -> bool {
        self.base_url.scheme() == "https"
    }

    pub fn session_cookie(&self, session: &Session) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, session.session_token.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies())
            .max_age(time::Duration::seconds(self.session_max_age.num_seconds()))
            .build()
    }

    pub fn state_cookie(&self, state: &str) -> Cookie<'static> {
        Cookie::build((STATE_COOKIE, state.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure_cookies())
            .max_age(time::Duration::seconds(STATE_MAX_AGE_SECS))
            .build()
    }
}

/// Cookie handle used to clear `name` on the client.
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

pub fn new_state() -> String {
    Uuid::new_v4().simple().to_string()
}
