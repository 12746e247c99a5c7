use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub location: String,
    pub about: String,
    pub logo: String,
    pub website: String,
    pub x_account: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated company onboarding form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompany {
    pub name: String,
    pub location: String,
    pub about: String,
    pub logo: String,
    pub website: String,
    pub x_account: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobSeeker {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub about: String,
    pub resume: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated job-seeker onboarding form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobSeeker {
    pub name: String,
    pub about: String,
    pub resume: String,
}
