pub mod job_post;
pub mod profile;
pub mod saved_job_post;
pub mod user;
