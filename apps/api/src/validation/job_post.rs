use std::borrow::Cow;

use serde::Deserialize;
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::models::job_post::{EmploymentType, JobPostDraft, ListingDuration};
use crate::validation::{parse_form, trim, Form, ValidationErrors};

/// Benefit ids a posting may advertise.
pub const BENEFITS: &[&str] = &[
    "401k",
    "medical",
    "dental",
    "vision",
    "flexible",
    "remote",
    "pension",
    "life",
    "parental",
    "mental",
    "gym",
    "childcare",
    "stock",
    "training",
    "vacation",
    "pet",
    "parking",
    "bonus",
    "transport",
    "meals",
];

/// Job posting form shared by create and update.
///
/// `salaryFrom <= salaryTo` is not checked.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobPostForm {
    #[validate(
        required(message = "Required"),
        length(min = 2, message = "Must contain at least 2 characters")
    )]
    pub job_title: Option<String>,

    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Job description is required")
    )]
    pub job_description: Option<String>,

    #[validate(required(message = "Required"), custom(function = "known_employment_type"))]
    pub employment_type: Option<String>,

    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Location is required")
    )]
    pub location: Option<String>,

    #[validate(
        required(message = "Required"),
        range(min = 1, max = 2147483647, message = "Must be a whole number of at least 1")
    )]
    pub salary_from: Option<i64>,

    #[validate(
        required(message = "Required"),
        range(min = 1, max = 2147483647, message = "Must be a whole number of at least 1")
    )]
    pub salary_to: Option<i64>,

    #[validate(required(message = "Required"), custom(function = "supported_listing_duration"))]
    pub listing_duration: Option<i64>,

    #[validate(
        required(message = "Please select at least one benefit"),
        length(min = 1, message = "Please select at least one benefit"),
        custom(function = "known_benefits")
    )]
    pub benefits: Option<Vec<String>>,
}

fn rule_failed(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Owned(message));
    err
}

fn known_employment_type(value: &str) -> Result<(), ValidationError> {
    match value.parse::<EmploymentType>() {
        Ok(_) => Ok(()),
        Err(()) => {
            let expected = EmploymentType::ALL.map(|t| t.as_str()).join(", ");
            Err(rule_failed("employment_type", format!("Expected one of: {expected}")))
        }
    }
}

fn listing_duration_of(days: i64) -> Option<ListingDuration> {
    i32::try_from(days)
        .ok()
        .and_then(|d| ListingDuration::try_from(d).ok())
}

fn supported_listing_duration(days: i64) -> Result<(), ValidationError> {
    if listing_duration_of(days).is_some() {
        return Ok(());
    }
    let expected = ListingDuration::ALL
        .map(|d| d.days().to_string())
        .join(", ");
    Err(rule_failed("listing_duration", format!("Expected one of: {expected}")))
}

fn known_benefits(picked: &[String]) -> Result<(), ValidationError> {
    match picked.iter().find(|b| !BENEFITS.contains(&b.as_str())) {
        Some(unknown) => Err(rule_failed("benefit", format!("Unknown benefit '{unknown}'"))),
        None => Ok(()),
    }
}

impl Form for JobPostForm {
    type Record = JobPostDraft;

    const FIELDS: &'static [&'static str] = &[
        "jobTitle",
        "jobDescription",
        "employmentType",
        "location",
        "salaryFrom",
        "salaryTo",
        "listingDuration",
        "benefits",
    ];

    fn normalize(&mut self) {
        trim(&mut self.job_title);
        trim(&mut self.job_description);
        trim(&mut self.employment_type);
        trim(&mut self.location);
    }

    fn into_record(self) -> Option<JobPostDraft> {
        let mut benefits: Vec<String> = Vec::new();
        for benefit in self.benefits? {
            if !benefits.contains(&benefit) {
                benefits.push(benefit);
            }
        }

        Some(JobPostDraft {
            job_title: self.job_title?,
            job_description: self.job_description?,
            employment_type: self.employment_type?.parse().ok()?,
            location: self.location?,
            salary_from: i32::try_from(self.salary_from?).ok()?,
            salary_to: i32::try_from(self.salary_to?).ok()?,
            listing_duration: listing_duration_of(self.listing_duration?)?,
            benefits,
        })
    }
}

/// Validates the job posting form shared by create and update.
pub fn parse_job_post(input: &Value) -> Result<JobPostDraft, ValidationErrors> {
    parse_form::<JobPostForm>(input)
}
