//! Mutation handlers.
//!
//! Each handler runs the same fixed pipeline: the caller's identity is
//! resolved first (the `CurrentUser` extractor), the payload is validated,
//! exactly one persistence operation runs, and the handler returns an
//! [`ActionOutcome`] telling the caller where to navigate or which view went
//! stale. Failures are returned unchanged; nothing here retries or rolls back
//! beyond the store's own transaction.

pub mod handlers;
pub mod job_posts;
pub mod onboarding;
pub mod saved_job_posts;

use serde::Serialize;
use uuid::Uuid;

pub const HOME_PATH: &str = "/";
pub const MY_JOBS_PATH: &str = "/my-jobs";

pub fn job_detail_path(job_id: Uuid) -> String {
    format!("/job/{job_id}")
}

/// What the caller should do after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Navigate to `location`.
    Redirect { location: String },
    /// Cached renderings of `path` are stale.
    Revalidate { path: String },
}

impl ActionOutcome {
    pub fn redirect(location: impl Into<String>) -> Self {
        ActionOutcome::Redirect {
            location: location.into(),
        }
    }

    pub fn revalidate(path: impl Into<String>) -> Self {
        ActionOutcome::Revalidate { path: path.into() }
    }
}
