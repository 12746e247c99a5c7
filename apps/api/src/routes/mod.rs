pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::actions::handlers as actions;
use crate::auth::handlers as auth;
use crate::queries::handlers as queries;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Onboarding
        .route(
            "/api/onboarding/company",
            post(actions::handle_onboard_company),
        )
        .route(
            "/api/onboarding/job-seeker",
            post(actions::handle_onboard_job_seeker),
        )
        // Job posts
        .route(
            "/api/jobs",
            get(queries::handle_list_job_posts).post(actions::handle_create_job_post),
        )
        .route(
            "/api/jobs/:job_id",
            get(queries::handle_get_job_post)
                .put(actions::handle_update_job_post)
                .delete(actions::handle_delete_job_post),
        )
        .route("/api/my-jobs", get(queries::handle_list_my_job_posts))
        // Favorites
        .route("/api/jobs/:job_id/save", post(actions::handle_save_job_post))
        .route(
            "/api/saved-jobs/:saved_job_post_id",
            delete(actions::handle_unsave_job_post),
        )
        .route("/api/favorites", get(queries::handle_list_saved_job_posts))
        // Auth
        .route("/api/auth/signin/:provider", get(auth::handle_sign_in))
        .route("/api/auth/callback/:provider", get(auth::handle_callback))
        .route("/api/auth/signout", post(auth::handle_sign_out))
        .route("/api/auth/session", get(auth::handle_session))
        .with_state(state)
}
