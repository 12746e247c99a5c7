//! Persistence: the record store the handlers and the auth adapter
//! talk to.
//!
//! Ownership is expressed in the queries themselves: the `*_owned` operations
//! filter on the record id AND the owning user id, so a request for someone
//! else's record matches zero rows and surfaces as `NotFound`.
//!
//! `AppState` holds an `Arc<dyn Store>`; production uses [`PgStore`].

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::job_post::{JobPost, JobPostDraft, JobPostListing};
use crate::models::profile::{Company, JobSeeker, NewCompany, NewJobSeeker};
use crate::models::saved_job_post::SavedJobPost;
use crate::models::user::{NewAccount, NewUser, Session, User};

pub use postgres::PgStore;

/// Reported when a user who finished onboarding tries to onboard again.
pub const ALREADY_ONBOARDED: &str = "users_onboarding_completed";

#[derive(Debug, Error)]
pub enum StoreError {
    /// The id/ownership filter matched no row.
    #[error("{0} not found")]
    NotFound(String),

    /// Unique or foreign-key constraint rejected the write.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("record".to_string()),
            sqlx::Error::Database(db)
                if db.is_unique_violation() || db.is_foreign_key_violation() =>
            {
                let constraint = db
                    .constraint()
                    .map(str::to_string)
                    .unwrap_or_else(|| db.message().to_string());
                StoreError::ConstraintViolation(constraint)
            }
            other => StoreError::Database(other),
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    // ── Users, accounts and sessions (auth adapter) ──────────────────────────

    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_account(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<User>, StoreError>;

    /// Creates a user and links the provider account in one transaction.
    async fn create_user_with_account(
        &self,
        user: &NewUser,
        account: &NewAccount,
    ) -> Result<User, StoreError>;

    async fn create_session(
        &self,
        user_id: Uuid,
        session_token: &str,
        expires: DateTime<Utc>,
    ) -> Result<Session, StoreError>;

    /// Returns the session and its user when the token exists and has not
    /// expired at `now`.
    async fn find_live_session(
        &self,
        session_token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<(Session, User)>, StoreError>;

    /// Removes the session; a missing token is not an error.
    async fn delete_session(&self, session_token: &str) -> Result<(), StoreError>;

    // ── Onboarding ───────────────────────────────────────────────────────────

    /// Marks the user onboarded as a company and creates the profile, atomically.
    async fn complete_company_onboarding(
        &self,
        user_id: Uuid,
        company: &NewCompany,
    ) -> Result<Company, StoreError>;

    /// Marks the user onboarded as a job seeker and creates the profile, atomically.
    async fn complete_job_seeker_onboarding(
        &self,
        user_id: Uuid,
        job_seeker: &NewJobSeeker,
    ) -> Result<JobSeeker, StoreError>;

    async fn find_company_by_user(&self, user_id: Uuid) -> Result<Option<Company>, StoreError>;

    // ── Job posts ────────────────────────────────────────────────────────────

    async fn create_job_post(
        &self,
        company_id: Uuid,
        draft: &JobPostDraft,
    ) -> Result<JobPost, StoreError>;

    /// Updates the post only if its company belongs to `owner_id`.
    async fn update_owned_job_post(
        &self,
        job_id: Uuid,
        owner_id: Uuid,
        draft: &JobPostDraft,
    ) -> Result<JobPost, StoreError>;

    /// Deletes the post only if its company belongs to `owner_id`.
    async fn delete_owned_job_post(&self, job_id: Uuid, owner_id: Uuid)
        -> Result<(), StoreError>;

    async fn find_job_post(&self, job_id: Uuid)
        -> Result<Option<(JobPost, Company)>, StoreError>;

    /// Newest first.
    async fn list_job_posts(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<JobPostListing>, StoreError>;

    /// Posts of the company owned by `owner_id`, newest first.
    async fn list_company_job_posts(&self, owner_id: Uuid) -> Result<Vec<JobPost>, StoreError>;

    // ── Saved job posts ──────────────────────────────────────────────────────

    async fn create_saved_job_post(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<SavedJobPost, StoreError>;

    /// Deletes the bookmark if it belongs to `user_id`; returns its job id.
    async fn delete_owned_saved_job_post(
        &self,
        saved_job_post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Uuid, StoreError>;

    async fn find_saved_job_post(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<SavedJobPost>, StoreError>;

    /// Bookmarked posts, most recently saved first.
    async fn list_saved_job_posts(&self, user_id: Uuid)
        -> Result<Vec<JobPostListing>, StoreError>;
}
