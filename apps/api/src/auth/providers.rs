//! OAuth identity providers and the HTTP client that talks to them.
//!
//! All provider network traffic goes through a [`ProviderClient`] so the
//! sign-in flow can be exercised without reaching GitHub or Google.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token request rejected: {error}{}", parenthesized(.description))]
    TokenRejected {
        error: String,
        description: Option<String>,
    },

    #[error("token response carried no access token")]
    MissingAccessToken,
}

fn parenthesized(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(" ({d})"))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    GitHub,
    Google,
}

impl ProviderKind {
    /// Path segment used in sign-in and callback URLs.
    pub fn id(self) -> &'static str {
        match self {
            ProviderKind::GitHub => "github",
            ProviderKind::Google => "google",
        }
    }

    pub fn authorization_endpoint(self) -> &'static str {
        match self {
            ProviderKind::GitHub => "https://github.com/login/oauth/authorize",
            ProviderKind::Google => "https://accounts.google.com/o/oauth2/v2/auth",
        }
    }

    pub fn token_endpoint(self) -> &'static str {
        match self {
            ProviderKind::GitHub => "https://github.com/login/oauth/access_token",
            ProviderKind::Google => "https://oauth2.googleapis.com/token",
        }
    }

    pub fn scope(self) -> &'static str {
        match self {
            ProviderKind::GitHub => "read:user user:email",
            ProviderKind::Google => "openid email profile",
        }
    }
}

/// A configured provider: kind plus the app's client credentials.
#[derive(Clone)]
pub struct OAuthProvider {
    pub kind: ProviderKind,
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for OAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthProvider")
            .field("kind", &self.kind)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub token_type: Option<String>,
    pub scope: Option<String>,
}

/// Normalized profile returned by any provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthProfile {
    pub provider_account_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn exchange_code(
        &self,
        provider: &OAuthProvider,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenSet, ProviderError>;

    async fn fetch_profile(
        &self,
        provider: &OAuthProvider,
        tokens: &TokenSet,
    ) -> Result<OAuthProfile, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    token_type: Option<String>,
    scope: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    id: u64,
    login: String,
    name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

#[derive(Debug, Deserialize)]
struct GoogleUser {
    sub: String,
    name: Option<String>,
    email: Option<String>,
    picture: Option<String>,
}

const GITHUB_USER_URL: &str = "https://api.github.com/user";
const GITHUB_EMAILS_URL: &str = "https://api.github.com/user/emails";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";

/// Reqwest-backed provider client used in production.
#[derive(Clone)]
pub struct HttpProviderClient {
    http: Client,
}

impl HttpProviderClient {
    pub fn new() -> Result<Self, ProviderError> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    async fn github_profile(&self, tokens: &TokenSet) -> Result<OAuthProfile, ProviderError> {
        let user: GitHubUser = self
            .http
            .get(GITHUB_USER_URL)
            .bearer_auth(&tokens.access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // Private emails are omitted from /user; fall back to the primary verified one.
        let email = match user.email {
            Some(email) => Some(email),
            None => {
                debug!("GitHub profile has no public email, reading /user/emails");
                let emails: Vec<GitHubEmail> = self
                    .http
                    .get(GITHUB_EMAILS_URL)
                    .bearer_auth(&tokens.access_token)
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;
                primary_verified_email(emails)
            }
        };

        Ok(OAuthProfile {
            provider_account_id: user.id.to_string(),
            name: user.name.or(Some(user.login)),
            email,
            image: user.avatar_url,
        })
    }

    async fn google_profile(&self, tokens: &TokenSet) -> Result<OAuthProfile, ProviderError> {
        let user: GoogleUser = self
            .http
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(&tokens.access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(OAuthProfile {
            provider_account_id: user.sub,
            name: user.name,
            email: user.email,
            image: user.picture,
        })
    }
}

fn primary_verified_email(emails: Vec<GitHubEmail>) -> Option<String> {
    emails
        .into_iter()
        .find(|e| e.primary && e.verified)
        .map(|e| e.email)
}

#[async_trait]
impl ProviderClient for HttpProviderClient {
    async fn exchange_code(
        &self,
        provider: &OAuthProvider,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenSet, ProviderError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", provider.client_id.as_str()),
            ("client_secret", provider.client_secret.as_str()),
        ];

        let response: TokenResponse = self
            .http
            .post(provider.kind.token_endpoint())
            .header(header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await?
            .json()
            .await?;

        into_token_set(response)
    }

    async fn fetch_profile(
        &self,
        provider: &OAuthProvider,
        tokens: &TokenSet,
    ) -> Result<OAuthProfile, ProviderError> {
        match provider.kind {
            ProviderKind::GitHub => self.github_profile(tokens).await,
            ProviderKind::Google => self.google_profile(tokens).await,
        }
    }
}

fn into_token_set(response: TokenResponse) -> Result<TokenSet, ProviderError> {
    if let Some(error) = response.error {
        return Err(ProviderError::TokenRejected {
            error,
            description: response.error_description,
        });
    }
    let access_token = response
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or(ProviderError::MissingAccessToken)?;
    Ok(TokenSet {
        access_token,
        token_type: response.token_type,
        scope: response.scope,
    })
}
