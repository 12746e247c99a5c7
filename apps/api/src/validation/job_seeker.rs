use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::models::profile::NewJobSeeker;
use crate::validation::{parse_form, trim, Form, ValidationErrors};

/// Job-seeker onboarding form. `resume` is the uploaded file's URL.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobSeekerForm {
    #[validate(
        required(message = "Required"),
        length(min = 2, message = "Must contain at least 2 characters")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Required"),
        length(min = 10, message = "Please tell us a bit about yourself")
    )]
    pub about: Option<String>,

    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Please upload a resume")
    )]
    pub resume: Option<String>,
}

impl Form for JobSeekerForm {
    type Record = NewJobSeeker;

    const FIELDS: &'static [&'static str] = &["name", "about", "resume"];

    fn normalize(&mut self) {
        trim(&mut self.name);
        trim(&mut self.about);
        trim(&mut self.resume);
    }

    fn into_record(self) -> Option<NewJobSeeker> {
        Some(NewJobSeeker {
            name: self.name?,
            about: self.about?,
            resume: self.resume?,
        })
    }
}

/// Validates the job-seeker onboarding form.
pub fn parse_job_seeker(input: &Value) -> Result<NewJobSeeker, ValidationErrors> {
    parse_form::<JobSeekerForm>(input)
}
