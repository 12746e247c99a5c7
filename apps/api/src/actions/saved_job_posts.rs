use tracing::info;
use uuid::Uuid;

use crate::actions::{job_detail_path, ActionOutcome};
use crate::errors::AppError;
use crate::models::user::User;
use crate::store::Store;

/// Bookmarks a posting for the caller. Saving the same posting twice is a
/// constraint violation.
pub async fn save_job_post(
    store: &dyn Store,
    user: &User,
    job_id: Uuid,
) -> Result<ActionOutcome, AppError> {
    let saved = store.create_saved_job_post(user.id, job_id).await?;
    info!("User {} saved job post {job_id} ({})", user.id, saved.id);

    Ok(ActionOutcome::revalidate(job_detail_path(job_id)))
}

/// Removes one of the caller's bookmarks and marks the posting's page stale.
pub async fn unsave_job_post(
    store: &dyn Store,
    user: &User,
    saved_job_post_id: Uuid,
) -> Result<ActionOutcome, AppError> {
    let job_id = store
        .delete_owned_saved_job_post(saved_job_post_id, user.id)
        .await?;
    info!("User {} unsaved job post {job_id}", user.id);

    Ok(ActionOutcome::revalidate(job_detail_path(job_id)))
}
