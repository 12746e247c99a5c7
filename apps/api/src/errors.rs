use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::providers::ProviderError;
use crate::store::StoreError;
use crate::validation::ValidationErrors;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] JsonRejection),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Unknown sign-in provider: {0}")]
    UnknownProvider(String),

    #[error("OAuth state mismatch")]
    OAuthStateMismatch,

    #[error("OAuth callback is missing the authorization code")]
    OAuthMissingCode,

    #[error("Account for {email} is linked to a different sign-in provider")]
    OAuthAccountNotLinked { email: String },

    #[error("OAuth provider error: {0}")]
    OAuthProvider(#[from] ProviderError),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => AppError::NotFound(what),
            StoreError::ConstraintViolation(constraint) => AppError::ConstraintViolation(constraint),
            StoreError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(errors) => {
                let body = Json(json!({
                    "error": {
                        "code": "VALIDATION_ERROR",
                        "message": "Invalid input",
                        "issues": errors.issues,
                    }
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                "Sign in required".to_string(),
            ),
            AppError::MalformedBody(rejection) => (
                StatusCode::BAD_REQUEST,
                "MALFORMED_BODY",
                rejection.body_text(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::ConstraintViolation(constraint) => (
                StatusCode::CONFLICT,
                "CONSTRAINT_VIOLATION",
                format!("Request conflicts with existing data ({constraint})"),
            ),
            AppError::UnknownProvider(provider) => (
                StatusCode::NOT_FOUND,
                "UNKNOWN_PROVIDER",
                format!("Sign-in provider '{provider}' is not configured"),
            ),
            AppError::OAuthStateMismatch => (
                StatusCode::BAD_REQUEST,
                "OAUTH_STATE_MISMATCH",
                "Sign-in request could not be verified".to_string(),
            ),
            AppError::OAuthMissingCode => (
                StatusCode::BAD_REQUEST,
                "OAUTH_MISSING_CODE",
                "Sign-in callback did not include an authorization code".to_string(),
            ),
            AppError::OAuthAccountNotLinked { .. } => (
                StatusCode::CONFLICT,
                "OAUTH_ACCOUNT_NOT_LINKED",
                "This email is already registered with another sign-in provider".to_string(),
            ),
            AppError::OAuthProvider(e) => {
                tracing::error!("OAuth provider error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "OAUTH_PROVIDER_ERROR",
                    "The sign-in provider could not be reached".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
