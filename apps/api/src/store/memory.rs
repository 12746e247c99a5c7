//! In-memory `Store` for handler tests. Mirrors the Postgres constraints that
//! the handlers rely on (unique profile per user, unique bookmark per user and
//! job, ownership filters) and counts every successful write.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::models::job_post::{JobPost, JobPostDraft, JobPostListing};
use crate::models::profile::{Company, JobSeeker, NewCompany, NewJobSeeker};
use crate::models::saved_job_post::SavedJobPost;
use crate::models::user::{NewAccount, NewUser, Session, User, UserType};
use crate::store::{Store, StoreError, ALREADY_ONBOARDED};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    accounts: Vec<(Uuid, NewAccount)>,
    sessions: Vec<Session>,
    companies: Vec<Company>,
    job_seekers: Vec<JobSeeker>,
    job_posts: Vec<JobPost>,
    saved: Vec<SavedJobPost>,
    writes: usize,
    /// Monotonic clock so "newest first" ordering is deterministic.
    tick: i64,
}

impl Tables {
    fn now(&mut self) -> DateTime<Utc> {
        self.tick += 1;
        Utc.timestamp_opt(1_700_000_000 + self.tick, 0).unwrap()
    }

    fn company_of(&self, owner_id: Uuid) -> Option<&Company> {
        self.companies.iter().find(|c| c.user_id == owner_id)
    }

    fn listing(&self, job: &JobPost) -> Option<JobPostListing> {
        let company = self.companies.iter().find(|c| c.id == job.company_id)?;
        Some(JobPostListing {
            job: job.clone(),
            company_name: company.name.clone(),
            company_logo: company.logo.clone(),
            company_location: company.location.clone(),
        })
    }

    fn onboard(&mut self, user_id: Uuid, user_type: UserType) -> Result<(), StoreError> {
        let now = self.now();
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| StoreError::NotFound(format!("User {user_id}")))?;
        if user.onboarding_completed {
            return Err(StoreError::ConstraintViolation(
                ALREADY_ONBOARDED.to_string(),
            ));
        }
        user.onboarding_completed = true;
        user.user_type = Some(user_type);
        user.updated_at = now;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes since construction.
    pub fn writes(&self) -> usize {
        self.tables.lock().unwrap().writes
    }

    /// Inserts a freshly signed-up user, as the auth adapter would.
    pub fn seed_user(&self, name: &str) -> User {
        let mut t = self.tables.lock().unwrap();
        let now = t.now();
        let user = User {
            id: Uuid::new_v4(),
            name: Some(name.to_string()),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            email_verified: None,
            image: None,
            user_type: None,
            onboarding_completed: false,
            created_at: now,
            updated_at: now,
        };
        t.users.push(user.clone());
        user
    }

    pub fn user(&self, user_id: Uuid) -> Option<User> {
        let t = self.tables.lock().unwrap();
        t.users.iter().find(|u| u.id == user_id).cloned()
    }

    pub fn companies(&self) -> Vec<Company> {
        self.tables.lock().unwrap().companies.clone()
    }

    pub fn job_seekers(&self) -> Vec<JobSeeker> {
        self.tables.lock().unwrap().job_seekers.clone()
    }

    pub fn job_posts(&self) -> Vec<JobPost> {
        self.tables.lock().unwrap().job_posts.clone()
    }

    pub fn saved_job_posts(&self) -> Vec<SavedJobPost> {
        self.tables.lock().unwrap().saved.clone()
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.tables.lock().unwrap().sessions.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.user(user_id))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let t = self.tables.lock().unwrap();
        Ok(t
            .users
            .iter()
            .find(|u| u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn find_user_by_account(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<User>, StoreError> {
        let t = self.tables.lock().unwrap();
        let user_id = t.accounts.iter().find_map(|(user_id, a)| {
            (a.provider == provider && a.provider_account_id == provider_account_id)
                .then_some(*user_id)
        });
        Ok(user_id.and_then(|id| t.users.iter().find(|u| u.id == id).cloned()))
    }

    async fn create_user_with_account(
        &self,
        user: &NewUser,
        account: &NewAccount,
    ) -> Result<User, StoreError> {
        let mut t = self.tables.lock().unwrap();
        if let Some(email) = &user.email {
            if t.users.iter().any(|u| u.email.as_ref() == Some(email)) {
                return Err(StoreError::ConstraintViolation("users_email_key".into()));
            }
        }
        let now = t.now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name.clone(),
            email: user.email.clone(),
            email_verified: None,
            image: user.image.clone(),
            user_type: None,
            onboarding_completed: false,
            created_at: now,
            updated_at: now,
        };
        t.users.push(created.clone());
        t.accounts.push((created.id, account.clone()));
        t.writes += 1;
        Ok(created)
    }

    async fn create_session(
        &self,
        user_id: Uuid,
        session_token: &str,
        expires: DateTime<Utc>,
    ) -> Result<Session, StoreError> {
        let mut t = self.tables.lock().unwrap();
        let session = Session {
            id: Uuid::new_v4(),
            session_token: session_token.to_string(),
            user_id,
            expires,
        };
        t.sessions.push(session.clone());
        t.writes += 1;
        Ok(session)
    }

    async fn find_live_session(
        &self,
        session_token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<(Session, User)>, StoreError> {
        let t = self.tables.lock().unwrap();
        let Some(session) = t
            .sessions
            .iter()
            .find(|s| s.session_token == session_token && s.expires > now)
        else {
            return Ok(None);
        };
        let user = t.users.iter().find(|u| u.id == session.user_id).cloned();
        Ok(user.map(|u| (session.clone(), u)))
    }

    async fn delete_session(&self, session_token: &str) -> Result<(), StoreError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.sessions.len();
        t.sessions.retain(|s| s.session_token != session_token);
        if t.sessions.len() != before {
            t.writes += 1;
        }
        Ok(())
    }

    async fn complete_company_onboarding(
        &self,
        user_id: Uuid,
        company: &NewCompany,
    ) -> Result<Company, StoreError> {
        let mut t = self.tables.lock().unwrap();
        t.onboard(user_id, UserType::Company)?;
        let now = t.now();
        let created = Company {
            id: Uuid::new_v4(),
            user_id,
            name: company.name.clone(),
            location: company.location.clone(),
            about: company.about.clone(),
            logo: company.logo.clone(),
            website: company.website.clone(),
            x_account: company.x_account.clone(),
            created_at: now,
            updated_at: now,
        };
        t.companies.push(created.clone());
        t.writes += 1;
        Ok(created)
    }

    async fn complete_job_seeker_onboarding(
        &self,
        user_id: Uuid,
        job_seeker: &NewJobSeeker,
    ) -> Result<JobSeeker, StoreError> {
        let mut t = self.tables.lock().unwrap();
        t.onboard(user_id, UserType::JobSeeker)?;
        let now = t.now();
        let created = JobSeeker {
            id: Uuid::new_v4(),
            user_id,
            name: job_seeker.name.clone(),
            about: job_seeker.about.clone(),
            resume: job_seeker.resume.clone(),
            created_at: now,
            updated_at: now,
        };
        t.job_seekers.push(created.clone());
        t.writes += 1;
        Ok(created)
    }

    async fn find_company_by_user(&self, user_id: Uuid) -> Result<Option<Company>, StoreError> {
        let t = self.tables.lock().unwrap();
        Ok(t.company_of(user_id).cloned())
    }

    async fn create_job_post(
        &self,
        company_id: Uuid,
        draft: &JobPostDraft,
    ) -> Result<JobPost, StoreError> {
        let mut t = self.tables.lock().unwrap();
        if !t.companies.iter().any(|c| c.id == company_id) {
            return Err(StoreError::ConstraintViolation(
                "job_posts_company_id_fkey".into(),
            ));
        }
        let now = t.now();
        let created = JobPost {
            id: Uuid::new_v4(),
            company_id,
            job_title: draft.job_title.clone(),
            job_description: draft.job_description.clone(),
            employment_type: draft.employment_type,
            location: draft.location.clone(),
            salary_from: draft.salary_from,
            salary_to: draft.salary_to,
            listing_duration: draft.listing_duration,
            benefits: draft.benefits.clone(),
            created_at: now,
            updated_at: now,
        };
        t.job_posts.push(created.clone());
        t.writes += 1;
        Ok(created)
    }

    async fn update_owned_job_post(
        &self,
        job_id: Uuid,
        owner_id: Uuid,
        draft: &JobPostDraft,
    ) -> Result<JobPost, StoreError> {
        let mut t = self.tables.lock().unwrap();
        let company_id = t.company_of(owner_id).map(|c| c.id);
        let now = t.now();
        let job = t
            .job_posts
            .iter_mut()
            .find(|j| j.id == job_id && Some(j.company_id) == company_id)
            .ok_or_else(|| StoreError::NotFound(format!("Job post {job_id}")))?;
        job.job_title = draft.job_title.clone();
        job.job_description = draft.job_description.clone();
        job.employment_type = draft.employment_type;
        job.location = draft.location.clone();
        job.salary_from = draft.salary_from;
        job.salary_to = draft.salary_to;
        job.listing_duration = draft.listing_duration;
        job.benefits = draft.benefits.clone();
        job.updated_at = now;
        let updated = job.clone();
        t.writes += 1;
        Ok(updated)
    }

    async fn delete_owned_job_post(
        &self,
        job_id: Uuid,
        owner_id: Uuid,
    ) -> Result<(), StoreError> {
        let mut t = self.tables.lock().unwrap();
        let company_id = t.company_of(owner_id).map(|c| c.id);
        let position = t
            .job_posts
            .iter()
            .position(|j| j.id == job_id && Some(j.company_id) == company_id)
            .ok_or_else(|| StoreError::NotFound(format!("Job post {job_id}")))?;
        t.job_posts.remove(position);
        t.saved.retain(|s| s.job_id != job_id);
        t.writes += 1;
        Ok(())
    }

    async fn find_job_post(
        &self,
        job_id: Uuid,
    ) -> Result<Option<(JobPost, Company)>, StoreError> {
        let t = self.tables.lock().unwrap();
        Ok(t.job_posts.iter().find(|j| j.id == job_id).and_then(|j| {
            t.companies
                .iter()
                .find(|c| c.id == j.company_id)
                .map(|c| (j.clone(), c.clone()))
        }))
    }

    async fn list_job_posts(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<JobPostListing>, StoreError> {
        let t = self.tables.lock().unwrap();
        let mut jobs: Vec<&JobPost> = t.job_posts.iter().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .filter_map(|j| t.listing(j))
            .collect())
    }

    async fn list_company_job_posts(&self, owner_id: Uuid) -> Result<Vec<JobPost>, StoreError> {
        let t = self.tables.lock().unwrap();
        let Some(company_id) = t.company_of(owner_id).map(|c| c.id) else {
            return Ok(Vec::new());
        };
        let mut jobs: Vec<JobPost> = t
            .job_posts
            .iter()
            .filter(|j| j.company_id == company_id)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn create_saved_job_post(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<SavedJobPost, StoreError> {
        let mut t = self.tables.lock().unwrap();
        if !t.job_posts.iter().any(|j| j.id == job_id) {
            return Err(StoreError::ConstraintViolation(
                "saved_job_posts_job_id_fkey".into(),
            ));
        }
        if t.saved.iter().any(|s| s.user_id == user_id && s.job_id == job_id) {
            return Err(StoreError::ConstraintViolation(
                "saved_job_posts_user_id_job_id_key".into(),
            ));
        }
        let now = t.now();
        let saved = SavedJobPost {
            id: Uuid::new_v4(),
            user_id,
            job_id,
            created_at: now,
        };
        t.saved.push(saved.clone());
        t.writes += 1;
        Ok(saved)
    }

    async fn delete_owned_saved_job_post(
        &self,
        saved_job_post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Uuid, StoreError> {
        let mut t = self.tables.lock().unwrap();
        let position = t
            .saved
            .iter()
            .position(|s| s.id == saved_job_post_id && s.user_id == user_id)
            .ok_or_else(|| StoreError::NotFound(format!("Saved job post {saved_job_post_id}")))?;
        let removed = t.saved.remove(position);
        t.writes += 1;
        Ok(removed.job_id)
    }

    async fn find_saved_job_post(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<SavedJobPost>, StoreError> {
        let t = self.tables.lock().unwrap();
        Ok(t
            .saved
            .iter()
            .find(|s| s.user_id == user_id && s.job_id == job_id)
            .cloned())
    }

    async fn list_saved_job_posts(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<JobPostListing>, StoreError> {
        let t = self.tables.lock().unwrap();
        let mut saved: Vec<&SavedJobPost> =
            t.saved.iter().filter(|s| s.user_id == user_id).collect();
        saved.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(saved
            .into_iter()
            .filter_map(|s| t.job_posts.iter().find(|j| j.id == s.job_id))
            .filter_map(|j| t.listing(j))
            .collect())
    }
}
