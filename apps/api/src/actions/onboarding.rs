use serde_json::Value;
use tracing::info;

use crate::actions::{ActionOutcome, HOME_PATH};
use crate::errors::AppError;
use crate::models::user::User;
use crate::store::Store;
use crate::validation::{parse_company, parse_job_seeker};

/// Completes onboarding as a company: sets the role, flags onboarding done
/// and creates the company profile in one transaction.
///
/// A second attempt fails on the store's one-profile-per-user constraint.
pub async fn onboard_company(
    store: &dyn Store,
    user: &User,
    input: &Value,
) -> Result<ActionOutcome, AppError> {
    let company = parse_company(input)?;

    let created = store.complete_company_onboarding(user.id, &company).await?;
    info!("User {} onboarded as company {}", user.id, created.id);

    Ok(ActionOutcome::redirect(HOME_PATH))
}

/// Completes onboarding as a job seeker. Mirrors [`onboard_company`].
pub async fn onboard_job_seeker(
    store: &dyn Store,
    user: &User,
    input: &Value,
) -> Result<ActionOutcome, AppError> {
    let job_seeker = parse_job_seeker(input)?;

    let created = store
        .complete_job_seeker_onboarding(user.id, &job_seeker)
        .await?;
    info!("User {} onboarded as job seeker {}", user.id, created.id);

    Ok(ActionOutcome::redirect(HOME_PATH))
}
