use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employment_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl EmploymentType {
    pub const ALL: [EmploymentType; 4] = [
        EmploymentType::FullTime,
        EmploymentType::PartTime,
        EmploymentType::Contract,
        EmploymentType::Internship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "FULL_TIME",
            EmploymentType::PartTime => "PART_TIME",
            EmploymentType::Contract => "CONTRACT",
            EmploymentType::Internship => "INTERNSHIP",
        }
    }
}

impl FromStr for EmploymentType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmploymentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How long a posting stays listed, in days. Stored as the day count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(into = "i32", try_from = "i32")]
#[repr(i32)]
pub enum ListingDuration {
    Days30 = 30,
    Days60 = 60,
    Days90 = 90,
}

impl ListingDuration {
    pub const ALL: [ListingDuration; 3] = [
        ListingDuration::Days30,
        ListingDuration::Days60,
        ListingDuration::Days90,
    ];

    pub fn days(self) -> i32 {
        self as i32
    }
}

impl From<ListingDuration> for i32 {
    fn from(value: ListingDuration) -> Self {
        value.days()
    }
}

impl TryFrom<i32> for ListingDuration {
    type Error = String;

    fn try_from(days: i32) -> Result<Self, Self::Error> {
        ListingDuration::ALL
            .into_iter()
            .find(|d| d.days() == days)
            .ok_or_else(|| format!("unsupported listing duration: {days} days"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobPost {
    pub id: Uuid,
    pub company_id: Uuid,
    pub job_title: String,
    pub job_description: String,
    pub employment_type: EmploymentType,
    pub location: String,
    pub salary_from: i32,
    pub salary_to: i32,
    pub listing_duration: ListingDuration,
    pub benefits: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated job posting form, used for both create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPostDraft {
    pub job_title: String,
    pub job_description: String,
    pub employment_type: EmploymentType,
    pub location: String,
    pub salary_from: i32,
    pub salary_to: i32,
    pub listing_duration: ListingDuration,
    pub benefits: Vec<String>,
}

/// A posting as shown in public and favorites lists, with its company header.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobPostListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: JobPost,
    pub company_name: String,
    pub company_logo: String,
    pub company_location: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employment_type_parses_wire_names() {
        assert_eq!("FULL_TIME".parse::<EmploymentType>(), Ok(EmploymentType::FullTime));
        assert_eq!("INTERNSHIP".parse::<EmploymentType>(), Ok(EmploymentType::Internship));
        assert!("full-time".parse::<EmploymentType>().is_err());
    }

    #[test]
    fn test_listing_duration_from_days() {
        assert_eq!(ListingDuration::try_from(60), Ok(ListingDuration::Days60));
        assert!(ListingDuration::try_from(45).is_err());
    }

    #[test]
    fn test_listing_duration_serializes_as_day_count() {
        let json = serde_json::to_value(ListingDuration::Days90).unwrap();
        assert_eq!(json, serde_json::json!(90));
    }
}
