//! Binds OAuth sign-ins to the record store: users, linked accounts and
//! database sessions.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::auth::providers::{OAuthProfile, ProviderKind, TokenSet};
use crate::errors::AppError;
use crate::models::user::{NewAccount, NewUser, Session, User};
use crate::store::Store;

/// Returns the user linked to this provider account, creating one on first
/// sign-in. An email already owned by a user of another provider is refused
/// rather than silently linked.
pub async fn link_or_create_user(
    store: &dyn Store,
    provider: ProviderKind,
    profile: &OAuthProfile,
    tokens: &TokenSet,
) -> Result<User, AppError> {
    if let Some(user) = store
        .find_user_by_account(provider.id(), &profile.provider_account_id)
        .await?
    {
        return Ok(user);
    }

    if let Some(email) = &profile.email {
        if store.find_user_by_email(email).await?.is_some() {
            return Err(AppError::OAuthAccountNotLinked {
                email: email.clone(),
            });
        }
    }

    let user = store
        .create_user_with_account(
            &NewUser {
                name: profile.name.clone(),
                email: profile.email.clone(),
                image: profile.image.clone(),
            },
            &NewAccount {
                provider: provider.id().to_string(),
                provider_account_id: profile.provider_account_id.clone(),
                access_token: Some(tokens.access_token.clone()),
                token_type: tokens.token_type.clone(),
                scope: tokens.scope.clone(),
            },
        )
        .await?;

    info!("Created user {} via {}", user.id, provider.id());
    Ok(user)
}

/// Opens a database session for `user_id` that expires at `expires`.
pub async fn open_session(
    store: &dyn Store,
    user_id: Uuid,
    expires: DateTime<Utc>,
) -> Result<Session, AppError> {
    let token = new_session_token();
    Ok(store.create_session(user_id, &token, expires).await?)
}

fn new_session_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}
