use serde_json::Value;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::actions::{ActionOutcome, HOME_PATH, MY_JOBS_PATH};
use crate::errors::AppError;
use crate::models::user::User;
use crate::store::Store;
use crate::validation::parse_job_post;

/// Creates a posting for the caller's company.
///
/// A caller without a company profile is sent home instead of failing. Any
/// error is logged with its full source chain and returned unchanged.
pub async fn create_job_post(
    store: &dyn Store,
    user: &User,
    input: &Value,
) -> Result<ActionOutcome, AppError> {
    let result = try_create_job_post(store, user, input).await;
    if let Err(err) = &result {
        log_create_failure(Some(user.id), err);
    }
    result
}

/// Logs a failed create, including failures before the caller is known.
pub(crate) fn log_create_failure(user_id: Option<Uuid>, err: &AppError) {
    let user = user_id.map_or_else(|| "anonymous".to_string(), |id| id.to_string());
    error!(user_id = %user, "create_job_post failed: {err}");
    error!(user_id = %user, "create_job_post error detail: {err:?}");
}

async fn try_create_job_post(
    store: &dyn Store,
    user: &User,
    input: &Value,
) -> Result<ActionOutcome, AppError> {
    debug!(user_id = %user.id, "create_job_post: starting");

    let draft = parse_job_post(input)?;
    debug!(user_id = %user.id, ?draft, "create_job_post: input validated");

    let Some(company) = store.find_company_by_user(user.id).await? else {
        debug!(user_id = %user.id, "create_job_post: no company profile, redirecting home");
        return Ok(ActionOutcome::redirect(HOME_PATH));
    };

    let job = store.create_job_post(company.id, &draft).await?;
    info!("Company {} created job post {}", company.id, job.id);

    Ok(ActionOutcome::redirect(MY_JOBS_PATH))
}

/// Replaces a posting's fields. Only matches posts of the caller's company;
/// anything else is `NotFound`.
pub async fn update_job_post(
    store: &dyn Store,
    user: &User,
    input: &Value,
    job_id: Uuid,
) -> Result<ActionOutcome, AppError> {
    let draft = parse_job_post(input)?;

    let job = store.update_owned_job_post(job_id, user.id, &draft).await?;
    info!("User {} updated job post {}", user.id, job.id);

    Ok(ActionOutcome::redirect(MY_JOBS_PATH))
}

/// Deletes a posting of the caller's company; anything else is `NotFound`.
pub async fn delete_job_post(
    store: &dyn Store,
    user: &User,
    job_id: Uuid,
) -> Result<ActionOutcome, AppError> {
    store.delete_owned_job_post(job_id, user.id).await?;
    info!("User {} deleted job post {job_id}", user.id);

    Ok(ActionOutcome::redirect(MY_JOBS_PATH))
}
