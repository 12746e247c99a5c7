//! Schema validation: turns untrusted JSON form payloads into typed records.
//!
//! Each form is a `Deserialize + Validate` struct with camelCase wire names.
//! Every field is checked and the first failing rule per field is reported.
//! A record is produced only when no field failed, so callers never see a
//! partially validated value.

pub mod company;
pub mod job_post;
pub mod job_seeker;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use validator::Validate;

pub use company::parse_company;
pub use job_post::parse_job_post;
pub use job_seeker::parse_job_seeker;

/// Field name used for failures that are not tied to a single field.
pub const ROOT_FIELD: &str = "$";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    fn root(message: impl Into<String>) -> Self {
        Self {
            field: ROOT_FIELD.to_string(),
            message: message.into(),
        }
    }
}

/// All field-level failures found in one payload.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("invalid input: {}", summarize(.issues))]
pub struct ValidationErrors {
    pub issues: Vec<FieldIssue>,
}

impl ValidationErrors {
    #[cfg(test)]
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.field.as_str()).collect()
    }

    fn root(message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue::root(message)],
        }
    }

    /// Keeps the first failure of each field, ordered as the form lists them.
    fn from_report(report: &validator::ValidationErrors, order: &[&str]) -> Self {
        let mut issues: Vec<FieldIssue> = report
            .field_errors()
            .into_iter()
            .filter_map(|(field, errors)| {
                let first = errors.first()?;
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| first.code.to_string());
                Some(FieldIssue {
                    field: camel_case(&field.to_string()),
                    message,
                })
            })
            .collect();

        let position = |field: &str| order.iter().position(|f| *f == field).unwrap_or(order.len());
        issues.sort_by_key(|issue| position(&issue.field));
        Self { issues }
    }
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{}: {}", i.field, i.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Rust field name to the form's wire name (`salary_from` -> `salaryFrom`).
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Trims a required string in place.
pub(crate) fn trim(value: &mut Option<String>) {
    if let Some(s) = value {
        *s = s.trim().to_string();
    }
}

/// Trims an optional string; blank counts as absent.
pub(crate) fn trim_optional(value: &mut Option<String>) {
    trim(value);
    if value.as_deref() == Some("") {
        *value = None;
    }
}

/// A form payload that validates into a typed record.
pub(crate) trait Form: DeserializeOwned + Validate {
    type Record;

    /// Wire names in the order the form presents them.
    const FIELDS: &'static [&'static str];

    /// Canonicalizes raw input (trimming) before the rules run.
    fn normalize(&mut self);

    /// Builds the record. Only called after validation passed.
    fn into_record(self) -> Option<Self::Record>;
}

pub(crate) fn parse_form<F: Form>(input: &Value) -> Result<F::Record, ValidationErrors> {
    if !input.is_object() {
        return Err(ValidationErrors::root("Expected an object"));
    }

    let mut form: F = serde_json::from_value(input.clone())
        .map_err(|e| ValidationErrors::root(e.to_string()))?;
    form.normalize();

    if let Err(report) = form.validate() {
        return Err(ValidationErrors::from_report(&report, F::FIELDS));
    }

    form.into_record()
        .ok_or_else(|| ValidationErrors::root("Invalid input"))
}
