//! Axum route handlers for the mutation endpoints.
//!
//! `CurrentUser` is extracted before the body, so an unauthenticated request
//! is rejected before its payload is validated.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use crate::actions::{job_posts, onboarding, saved_job_posts, ActionOutcome};
use crate::errors::AppError;
use crate::session::CurrentUser;
use crate::state::AppState;

/// POST /api/onboarding/company
pub async fn handle_onboard_company(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<Value>,
) -> Result<Json<ActionOutcome>, AppError> {
    let outcome = onboarding::onboard_company(state.store.as_ref(), &user, &input).await?;
    Ok(Json(outcome))
}

/// POST /api/onboarding/job-seeker
pub async fn handle_onboard_job_seeker(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<Value>,
) -> Result<Json<ActionOutcome>, AppError> {
    let outcome = onboarding::onboard_job_seeker(state.store.as_ref(), &user, &input).await?;
    Ok(Json(outcome))
}

/// POST /api/jobs
///
/// Extraction failures (identity, body) are logged like any other failed create.
pub async fn handle_create_job_post(
    State(state): State<AppState>,
    user: Result<CurrentUser, AppError>,
    input: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ActionOutcome>, AppError> {
    let CurrentUser(user) = user.map_err(|err| {
        job_posts::log_create_failure(None, &err);
        err
    })?;
    let Json(input) = input.map_err(|rejection| {
        let err = AppError::from(rejection);
        job_posts::log_create_failure(Some(user.id), &err);
        err
    })?;

    let outcome = job_posts::create_job_post(state.store.as_ref(), &user, &input).await?;
    Ok(Json(outcome))
}

/// PUT /api/jobs/:job_id
pub async fn handle_update_job_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(job_id): Path<Uuid>,
    Json(input): Json<Value>,
) -> Result<Json<ActionOutcome>, AppError> {
    let outcome =
        job_posts::update_job_post(state.store.as_ref(), &user, &input, job_id).await?;
    Ok(Json(outcome))
}

/// DELETE /api/jobs/:job_id
pub async fn handle_delete_job_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ActionOutcome>, AppError> {
    let outcome = job_posts::delete_job_post(state.store.as_ref(), &user, job_id).await?;
    Ok(Json(outcome))
}

/// POST /api/jobs/:job_id/save
pub async fn handle_save_job_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ActionOutcome>, AppError> {
    let outcome = saved_job_posts::save_job_post(state.store.as_ref(), &user, job_id).await?;
    Ok(Json(outcome))
}

/// DELETE /api/saved-jobs/:saved_job_post_id
pub async fn handle_unsave_job_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(saved_job_post_id): Path<Uuid>,
) -> Result<Json<ActionOutcome>, AppError> {
    let outcome =
        saved_job_posts::unsave_job_post(state.store.as_ref(), &user, saved_job_post_id).await?;
    Ok(Json(outcome))
}
