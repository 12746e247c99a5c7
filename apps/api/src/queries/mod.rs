//! Read-side queries behind the pages the mutations navigate to: the public
//! job board, a single posting, the company's own postings and the caller's
//! favorites.

pub mod handlers;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job_post::{JobPost, JobPostListing};
use crate::models::profile::Company;
use crate::models::user::User;
use crate::store::Store;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 50;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl Pagination {
    /// Page number, 1-based; anything below 1 is the first page.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.page_size())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPostPage {
    pub items: Vec<JobPostListing>,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPostDetail {
    pub job: JobPost,
    pub company: Company,
    /// The viewer's bookmark of this posting; `None` when signed out or unsaved.
    pub saved_job_post_id: Option<Uuid>,
}

pub async fn list_job_posts(
    store: &dyn Store,
    pagination: Pagination,
) -> Result<JobPostPage, AppError> {
    let page_size = pagination.page_size();
    let items = store
        .list_job_posts(page_size, pagination.offset())
        .await?;

    Ok(JobPostPage {
        items,
        page: pagination.page(),
        page_size,
    })
}

pub async fn get_job_post(
    store: &dyn Store,
    viewer: Option<&User>,
    job_id: Uuid,
) -> Result<JobPostDetail, AppError> {
    let (job, company) = store
        .find_job_post(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("job post {job_id}")))?;

    let saved_job_post_id = match viewer {
        Some(user) => store
            .find_saved_job_post(user.id, job_id)
            .await?
            .map(|saved| saved.id),
        None => None,
    };

    Ok(JobPostDetail {
        job,
        company,
        saved_job_post_id,
    })
}

/// Postings of the caller's company. Empty when the caller has none.
pub async fn list_my_job_posts(store: &dyn Store, user: &User) -> Result<Vec<JobPost>, AppError> {
    Ok(store.list_company_job_posts(user.id).await?)
}

pub async fn list_saved_job_posts(
    store: &dyn Store,
    user: &User,
) -> Result<Vec<JobPostListing>, AppError> {
    Ok(store.list_saved_job_posts(user.id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::job_posts::create_job_post;
    use crate::actions::saved_job_posts::save_job_post;
    use crate::actions::test_support::{company_user, job_form};
    use crate::store::memory::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_pagination_defaults() {
        let p = Pagination::default();
        assert_eq!(p.page(), 1);
        assert_eq!(p.page_size(), 20);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_clamps_out_of_range_values() {
        let p = Pagination {
            page: Some(0),
            page_size: Some(500),
        };
        assert_eq!(p.page(), 1);
        assert_eq!(p.page_size(), 50);

        let p = Pagination {
            page: Some(3),
            page_size: Some(0),
        };
        assert_eq!(p.page_size(), 1);
        assert_eq!(p.offset(), 2);
    }

    #[tokio::test]
    async fn test_list_job_posts_newest_first_with_company_header() {
        let store = MemoryStore::new();
        let owner = company_user(&store, "Freightly").await;
        create_job_post(&store, &owner, &job_form()).await.unwrap();
        let mut second = job_form();
        second["jobTitle"] = json!("Platform Engineer");
        create_job_post(&store, &owner, &second).await.unwrap();

        let page = list_job_posts(&store, Pagination::default()).await.unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].job.job_title, "Platform Engineer");
        assert_eq!(page.items[0].company_name, "Freightly");
        assert_eq!(page.items[1].job.job_title, "Backend Engineer");
    }

    #[tokio::test]
    async fn test_list_job_posts_pages() {
        let store = MemoryStore::new();
        let owner = company_user(&store, "Freightly").await;
        for _ in 0..3 {
            create_job_post(&store, &owner, &job_form()).await.unwrap();
        }

        let pagination = Pagination {
            page: Some(2),
            page_size: Some(2),
        };
        let page = list_job_posts(&store, pagination).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 2);
    }

    #[tokio::test]
    async fn test_get_job_post_reports_viewer_bookmark() {
        let store = MemoryStore::new();
        let owner = company_user(&store, "Freightly").await;
        create_job_post(&store, &owner, &job_form()).await.unwrap();
        let job_id = store.job_posts()[0].id;
        let seeker = store.seed_user("Seeker");

        let anonymous = get_job_post(&store, None, job_id).await.unwrap();
        assert_eq!(anonymous.company.name, "Freightly");
        assert_eq!(anonymous.saved_job_post_id, None);

        let unsaved = get_job_post(&store, Some(&seeker), job_id).await.unwrap();
        assert_eq!(unsaved.saved_job_post_id, None);

        save_job_post(&store, &seeker, job_id).await.unwrap();
        let saved_id = store.saved_job_posts()[0].id;
        let saved = get_job_post(&store, Some(&seeker), job_id).await.unwrap();
        assert_eq!(saved.saved_job_post_id, Some(saved_id));
    }

    #[tokio::test]
    async fn test_get_unknown_job_post_is_not_found() {
        let store = MemoryStore::new();
        let err = get_job_post(&store, None, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_my_job_posts_only_lists_own_company() {
        let store = MemoryStore::new();
        let owner = company_user(&store, "Freightly").await;
        let rival = company_user(&store, "Rival").await;
        create_job_post(&store, &owner, &job_form()).await.unwrap();
        create_job_post(&store, &rival, &job_form()).await.unwrap();
        let seeker = store.seed_user("Seeker");

        let mine = list_my_job_posts(&store, &owner).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].company_id, store.companies()[0].id);

        assert!(list_my_job_posts(&store, &seeker).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_saved_job_posts_lists_bookmarks() {
        let store = MemoryStore::new();
        let owner = company_user(&store, "Freightly").await;
        create_job_post(&store, &owner, &job_form()).await.unwrap();
        let job_id = store.job_posts()[0].id;
        let seeker = store.seed_user("Seeker");

        assert!(list_saved_job_posts(&store, &seeker).await.unwrap().is_empty());

        save_job_post(&store, &seeker, job_id).await.unwrap();
        let saved = list_saved_job_posts(&store, &seeker).await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].job.id, job_id);
        assert_eq!(saved[0].company_name, "Freightly");
    }
}
