use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::job_post::{JobPost, JobPostDraft, JobPostListing};
use crate::models::profile::{Company, JobSeeker, NewCompany, NewJobSeeker};
use crate::models::saved_job_post::SavedJobPost;
use crate::models::user::{NewAccount, NewUser, Session, User, UserType};
use crate::store::{Store, StoreError, ALREADY_ONBOARDED};

const LISTING_COLUMNS: &str = r#"
    j.*,
    c.name AS company_name,
    c.logo AS company_logo,
    c.location AS company_location
"#;

/// PostgreSQL-backed record store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Flags the user as onboarded with the given role inside `tx`.
    ///
    /// The `NOT onboarding_completed` filter takes the row lock, so a user who
    /// already holds either profile cannot onboard again, even concurrently.
    async fn mark_onboarded(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: Uuid,
        user_type: UserType,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET onboarding_completed = TRUE, user_type = $2, updated_at = now()
            WHERE id = $1 AND NOT onboarding_completed
            "#,
        )
        .bind(user_id)
        .bind(user_type)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&mut **tx)
            .await?;
        if exists {
            Err(StoreError::ConstraintViolation(
                ALREADY_ONBOARDED.to_string(),
            ))
        } else {
            Err(StoreError::NotFound(format!("User {user_id}")))
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_user_by_account(
        &self,
        provider: &str,
        provider_account_id: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(sqlx::query_as::<_, User>(
            r#"
            SELECT u.*
            FROM users u
            JOIN accounts a ON a.user_id = u.id
            WHERE a.provider = $1 AND a.provider_account_id = $2
            "#,
        )
        .bind(provider)
        .bind(provider_account_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn create_user_with_account(
        &self,
        user: &NewUser,
        account: &NewAccount,
    ) -> Result<User, StoreError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, image) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.image)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO accounts
                (user_id, provider, provider_account_id, access_token, token_type, scope)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(created.id)
        .bind(&account.provider)
        .bind(&account.provider_account_id)
        .bind(&account.access_token)
        .bind(&account.token_type)
        .bind(&account.scope)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn create_session(
        &self,
        user_id: Uuid,
        session_token: &str,
        expires: DateTime<Utc>,
    ) -> Result<Session, StoreError> {
        Ok(sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (session_token, user_id, expires) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(session_token)
        .bind(user_id)
        .bind(expires)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_live_session(
        &self,
        session_token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<(Session, User)>, StoreError> {
        let session: Option<Session> = sqlx::query_as(
            "SELECT * FROM sessions WHERE session_token = $1 AND expires > $2",
        )
        .bind(session_token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        let Some(session) = session else {
            return Ok(None);
        };
        let user = self.find_user(session.user_id).await?;
        Ok(user.map(|u| (session, u)))
    }

    async fn delete_session(&self, session_token: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE session_token = $1")
            .bind(session_token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn complete_company_onboarding(
        &self,
        user_id: Uuid,
        company: &NewCompany,
    ) -> Result<Company, StoreError> {
        let mut tx = self.pool.begin().await?;
        Self::mark_onboarded(&mut tx, user_id, UserType::Company).await?;

        let created = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (user_id, name, location, about, logo, website, x_account)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&company.name)
        .bind(&company.location)
        .bind(&company.about)
        .bind(&company.logo)
        .bind(&company.website)
        .bind(&company.x_account)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn complete_job_seeker_onboarding(
        &self,
        user_id: Uuid,
        job_seeker: &NewJobSeeker,
    ) -> Result<JobSeeker, StoreError> {
        let mut tx = self.pool.begin().await?;
        Self::mark_onboarded(&mut tx, user_id, UserType::JobSeeker).await?;

        let created = sqlx::query_as::<_, JobSeeker>(
            r#"
            INSERT INTO job_seekers (user_id, name, about, resume)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&job_seeker.name)
        .bind(&job_seeker.about)
        .bind(&job_seeker.resume)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn find_company_by_user(&self, user_id: Uuid) -> Result<Option<Company>, StoreError> {
        Ok(
            sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_job_post(
        &self,
        company_id: Uuid,
        draft: &JobPostDraft,
    ) -> Result<JobPost, StoreError> {
        Ok(sqlx::query_as::<_, JobPost>(
            r#"
            INSERT INTO job_posts
                (company_id, job_title, job_description, employment_type, location,
                 salary_from, salary_to, listing_duration, benefits)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(&draft.job_title)
        .bind(&draft.job_description)
        .bind(draft.employment_type)
        .bind(&draft.location)
        .bind(draft.salary_from)
        .bind(draft.salary_to)
        .bind(draft.listing_duration)
        .bind(&draft.benefits)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_owned_job_post(
        &self,
        job_id: Uuid,
        owner_id: Uuid,
        draft: &JobPostDraft,
    ) -> Result<JobPost, StoreError> {
        let updated: Option<JobPost> = sqlx::query_as(
            r#"
            UPDATE job_posts AS j
            SET job_title = $3,
                job_description = $4,
                employment_type = $5,
                location = $6,
                salary_from = $7,
                salary_to = $8,
                listing_duration = $9,
                benefits = $10,
                updated_at = now()
            FROM companies c
            WHERE j.id = $1 AND j.company_id = c.id AND c.user_id = $2
            RETURNING j.*
            "#,
        )
        .bind(job_id)
        .bind(owner_id)
        .bind(&draft.job_title)
        .bind(&draft.job_description)
        .bind(draft.employment_type)
        .bind(&draft.location)
        .bind(draft.salary_from)
        .bind(draft.salary_to)
        .bind(draft.listing_duration)
        .bind(&draft.benefits)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or_else(|| StoreError::NotFound(format!("Job post {job_id}")))
    }

    async fn delete_owned_job_post(
        &self,
        job_id: Uuid,
        owner_id: Uuid,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM job_posts AS j
            USING companies c
            WHERE j.id = $1 AND j.company_id = c.id AND c.user_id = $2
            "#,
        )
        .bind(job_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("Job post {job_id}")));
        }
        Ok(())
    }

    async fn find_job_post(
        &self,
        job_id: Uuid,
    ) -> Result<Option<(JobPost, Company)>, StoreError> {
        let job: Option<JobPost> = sqlx::query_as("SELECT * FROM job_posts WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(job) = job else {
            return Ok(None);
        };
        let company: Company = sqlx::query_as("SELECT * FROM companies WHERE id = $1")
            .bind(job.company_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(Some((job, company)))
    }

    async fn list_job_posts(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<JobPostListing>, StoreError> {
        let sql = format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM job_posts j
            JOIN companies c ON c.id = j.company_id
            ORDER BY j.created_at DESC
            LIMIT $1 OFFSET $2
            "#
        );
        Ok(sqlx::query_as::<_, JobPostListing>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_company_job_posts(&self, owner_id: Uuid) -> Result<Vec<JobPost>, StoreError> {
        Ok(sqlx::query_as::<_, JobPost>(
            r#"
            SELECT j.*
            FROM job_posts j
            JOIN companies c ON c.id = j.company_id
            WHERE c.user_id = $1
            ORDER BY j.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_saved_job_post(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<SavedJobPost, StoreError> {
        Ok(sqlx::query_as::<_, SavedJobPost>(
            "INSERT INTO saved_job_posts (user_id, job_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn delete_owned_saved_job_post(
        &self,
        saved_job_post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Uuid, StoreError> {
        let job_id: Option<Uuid> = sqlx::query_scalar(
            "DELETE FROM saved_job_posts WHERE id = $1 AND user_id = $2 RETURNING job_id",
        )
        .bind(saved_job_post_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        job_id.ok_or_else(|| StoreError::NotFound(format!("Saved job post {saved_job_post_id}")))
    }

    async fn find_saved_job_post(
        &self,
        user_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<SavedJobPost>, StoreError> {
        Ok(sqlx::query_as::<_, SavedJobPost>(
            "SELECT * FROM saved_job_posts WHERE user_id = $1 AND job_id = $2",
        )
        .bind(user_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_saved_job_posts(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<JobPostListing>, StoreError> {
        let sql = format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM saved_job_posts s
            JOIN job_posts j ON j.id = s.job_id
            JOIN companies c ON c.id = j.company_id
            WHERE s.user_id = $1
            ORDER BY s.created_at DESC
            "#
        );
        Ok(sqlx::query_as::<_, JobPostListing>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?)
    }
}
