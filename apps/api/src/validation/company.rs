use serde::Deserialize;
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::models::profile::NewCompany;
use crate::validation::{parse_form, trim, trim_optional, Form, ValidationErrors};

/// Company onboarding form as submitted.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyForm {
    #[validate(
        required(message = "Required"),
        length(min = 2, message = "Must contain at least 2 characters")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Location is required")
    )]
    pub location: Option<String>,

    #[validate(
        required(message = "Required"),
        length(min = 10, message = "Please provide some information about your company")
    )]
    pub about: Option<String>,

    #[validate(
        required(message = "Required"),
        length(min = 1, message = "Please upload a logo")
    )]
    pub logo: Option<String>,

    #[validate(
        required(message = "Required"),
        url(message = "Invalid URL"),
        custom(function = "http_scheme")
    )]
    pub website: Option<String>,

    pub x_account: Option<String>,
}

/// `url` accepts any scheme; a company website must be browsable.
pub(crate) fn http_scheme(value: &str) -> Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => {
            let mut err = ValidationError::new("http_url");
            err.message = Some("Invalid URL".into());
            Err(err)
        }
    }
}

impl Form for CompanyForm {
    type Record = NewCompany;

    const FIELDS: &'static [&'static str] =
        &["name", "location", "about", "logo", "website", "xAccount"];

    fn normalize(&mut self) {
        trim(&mut self.name);
        trim(&mut self.location);
        trim(&mut self.about);
        trim(&mut self.logo);
        trim(&mut self.website);
        trim_optional(&mut self.x_account);
    }

    fn into_record(self) -> Option<NewCompany> {
        Some(NewCompany {
            name: self.name?,
            location: self.location?,
            about: self.about?,
            logo: self.logo?,
            website: self.website?,
            x_account: self.x_account,
        })
    }
}

/// Validates the company onboarding form.
pub fn parse_company(input: &Value) -> Result<NewCompany, ValidationErrors> {
    parse_form::<CompanyForm>(input)
}
