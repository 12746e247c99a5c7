use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job_post::{JobPost, JobPostListing};
use crate::queries::{self, JobPostDetail, JobPostPage, Pagination};
use crate::session::{CurrentUser, MaybeUser};
use crate::state::AppState;

/// GET /api/jobs
pub async fn handle_list_job_posts(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<JobPostPage>, AppError> {
    let page = queries::list_job_posts(state.store.as_ref(), pagination).await?;
    Ok(Json(page))
}

/// GET /api/jobs/:job_id
pub async fn handle_get_job_post(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobPostDetail>, AppError> {
    let detail = queries::get_job_post(state.store.as_ref(), viewer.as_ref(), job_id).await?;
    Ok(Json(detail))
}

/// GET /api/my-jobs
pub async fn handle_list_my_job_posts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<JobPost>>, AppError> {
    let jobs = queries::list_my_job_posts(state.store.as_ref(), &user).await?;
    Ok(Json(jobs))
}

/// GET /api/favorites
pub async fn handle_list_saved_job_posts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<JobPostListing>>, AppError> {
    let saved = queries::list_saved_job_posts(state.store.as_ref(), &user).await?;
    Ok(Json(saved))
}
