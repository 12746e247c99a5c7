use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::auth::providers::ProviderError;
use crate::auth::{new_state, removal_cookie, SessionView, SESSION_COOKIE, STATE_COOKIE};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// GET /api/auth/signin/:provider
pub async fn handle_sign_in(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    let csrf_state = new_state();
    let url = state.auth.authorization_url(&provider, &csrf_state)?;
    let jar = jar.add(state.auth.state_cookie(&csrf_state));
    Ok((jar, Redirect::to(url.as_str())))
}

/// GET /api/auth/callback/:provider
pub async fn handle_callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<CallbackQuery>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    if let Some(error) = query.error {
        return Err(ProviderError::TokenRejected {
            error,
            description: query.error_description,
        }
        .into());
    }
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or(AppError::OAuthMissingCode)?;
    let expected_state = jar.get(STATE_COOKIE).map(|c| c.value().to_string());

    let (session, _user) = state
        .auth
        .complete_sign_in(
            state.store.as_ref(),
            state.oauth.as_ref(),
            &provider,
            &code,
            query.state.as_deref(),
            expected_state.as_deref(),
        )
        .await?;

    let jar = jar
        .remove(removal_cookie(STATE_COOKIE))
        .add(state.auth.session_cookie(&session));
    Ok((jar, Redirect::to("/")))
}

/// POST /api/auth/signout
pub async fn handle_sign_out(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    let token = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    state
        .auth
        .sign_out(state.store.as_ref(), token.as_deref())
        .await?;
    Ok((jar.remove(removal_cookie(SESSION_COOKIE)), Redirect::to("/")))
}

/// GET /api/auth/session
pub async fn handle_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<Option<SessionView>>, AppError> {
    let token = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let session = state
        .auth
        .current_session(state.store.as_ref(), token.as_deref())
        .await?;
    Ok(Json(session))
}
